//! [`Command`] for moving a [`Vehicle`] between branches.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{branch, vehicle, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for reassigning an available [`Vehicle`] to another branch.
#[derive(Clone, Copy, Debug)]
pub struct ChangeVehicleBranch {
    /// ID of the [`Vehicle`] to reassign.
    pub id: vehicle::Id,

    /// ID of the branch to reassign the [`Vehicle`] to.
    pub branch_id: branch::Id,
}

impl<Db> Command<ChangeVehicleBranch> for Service<Db>
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
        ChangeVehicleBranch { id, branch_id }: ChangeVehicleBranch,
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
            .change_branch(branch_id)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Update(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(vehicle)
    }
}

/// Error of [`ChangeVehicleBranch`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// [`Vehicle`] is engaged and cannot move between branches.
    #[display("{_0}")]
    #[from]
    Engaged(vehicle::BranchChangeError),
}
