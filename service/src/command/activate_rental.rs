//! [`Command`] for activating a [`Rental`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        rental,
        vehicle::{self, Kilometers},
        Rental, Vehicle,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for activating a reserved [`Rental`] at vehicle handover.
///
/// Records the start odometer reading and flips the [`Vehicle`] to rented.
#[derive(Clone, Copy, Debug)]
pub struct ActivateRental {
    /// ID of the [`Rental`] to activate.
    pub id: rental::Id,

    /// Odometer reading at handover.
    pub start_km: Kilometers,
}

impl<Db> Command<ActivateRental> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Rental, rental::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Vehicle>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ActivateRental { id, start_km }: ActivateRental,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(id))
            .map_err(tracerr::wrap!())?;
        rental
            .activate(start_km)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let mut vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(rental.vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(rental.vehicle_id))
            .map_err(tracerr::wrap!())?;
        vehicle
            .change_status(vehicle::Status::Rented)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        vehicle
            .update_kilometers(start_km)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(vehicle))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(rental)
    }
}

/// Error of [`ActivateRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// [`Rental`] cannot be activated in its current status.
    #[display("{_0}")]
    #[from]
    Rental(rental::TransitionError),

    /// [`Vehicle`] cannot be handed over in its current status.
    #[display("{_0}")]
    #[from]
    Vehicle(vehicle::TransitionError),

    /// Provided odometer reading regresses the [`Vehicle`]'s one.
    #[display("{_0}")]
    #[from]
    Odometer(vehicle::OdometerError),
}
