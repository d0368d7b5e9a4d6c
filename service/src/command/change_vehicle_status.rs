//! [`Command`] for changing a [`Vehicle`] status.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for transitioning a [`Vehicle`] into another
/// [`vehicle::Status`] (maintenance, damage, withdrawal, sale).
#[derive(Clone, Copy, Debug)]
pub struct ChangeVehicleStatus {
    /// ID of the [`Vehicle`] to transition.
    pub id: vehicle::Id,

    /// [`vehicle::Status`] to transition into.
    pub status: vehicle::Status,
}

impl<Db> Command<ChangeVehicleStatus> for Service<Db>
where
    Db: Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Update<Vehicle>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Vehicle;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ChangeVehicleStatus { id, status }: ChangeVehicleStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let mut vehicle = self
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(id))
            .map_err(tracerr::wrap!())?;
        vehicle
            .change_status(status)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Update(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(vehicle)
    }
}

/// Error of [`ChangeVehicleStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// Requested transition is not allowed.
    #[display("{_0}")]
    #[from]
    Vehicle(vehicle::TransitionError),
}
