//! [`Command`] for completing a [`Rental`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        pricing::KmPackage,
        rental,
        vehicle::{self, Kilometers},
        Rental, Vehicle,
    },
    infra::{database, Database},
    read::pricing::Applicable,
    Service,
};

use super::Command;

/// [`Command`] for settling a returned [`Rental`].
///
/// Prices the kilometers driven beyond the applicable [`KmPackage`]'s
/// allowance (zero when no package applies), fixes the charge on the
/// [`Rental`] and frees the [`Vehicle`].
#[derive(Clone, Copy, Debug)]
pub struct CompleteRental {
    /// ID of the [`Rental`] to complete.
    pub id: rental::Id,

    /// Odometer reading at return.
    pub end_km: Kilometers,
}

impl<Db> Command<CompleteRental> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Applicable<KmPackage>>, rental::Kind>>,
            Ok = Option<Applicable<KmPackage>>,
            Err = Traced<database::Error>,
        >,
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
        CompleteRental { id, end_km }: CompleteRental,
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

        let driven_km = rental
            .start_km
            .map_or(0, |start| end_km.saturating_sub(start));
        let extra_km_charge = self
            .database()
            .execute(Select(By::<Option<Applicable<KmPackage>>, _>::new(
                rental.kind,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .map_or(Money::zero(rental.total_price.currency), |p| {
                p.0.extra_km_cost(driven_km)
            });

        rental
            .complete(
                rental::CompletionDateTime::now(),
                end_km,
                extra_km_charge,
            )
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let mut vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(rental.vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(rental.vehicle_id))
            .map_err(tracerr::wrap!())?;
        vehicle
            .change_status(vehicle::Status::Available)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        vehicle
            .update_kilometers(end_km)
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

/// Error of [`CompleteRental`] [`Command`] execution.
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

    /// [`Rental`] cannot be completed.
    #[display("{_0}")]
    #[from]
    Rental(rental::CompletionError),

    /// [`Vehicle`] cannot be freed in its current status.
    #[display("{_0}")]
    #[from]
    Vehicle(vehicle::TransitionError),

    /// Provided odometer reading regresses the [`Vehicle`]'s one.
    #[display("{_0}")]
    #[from]
    Odometer(vehicle::OdometerError),
}
