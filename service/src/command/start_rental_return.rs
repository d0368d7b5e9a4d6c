//! [`Command`] for starting a [`Rental`] return.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, Rental},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for announcing the return of an active (or overdue)
/// [`Rental`]'s vehicle, pending settlement.
#[derive(Clone, Copy, Debug)]
pub struct StartRentalReturn {
    /// ID of the [`Rental`] being returned.
    pub id: rental::Id,
}

impl<Db> Command<StartRentalReturn> for Service<Db>
where
    Db: Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        StartRentalReturn { id }: StartRentalReturn,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let mut rental = self
            .database()
            .execute(Select(By::<Option<Rental>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(id))
            .map_err(tracerr::wrap!())?;
        rental
            .start_return()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Update(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(rental)
    }
}

/// Error of [`StartRentalReturn`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// [`Rental`] cannot start its return in its current status.
    #[display("{_0}")]
    #[from]
    Rental(rental::TransitionError),
}
