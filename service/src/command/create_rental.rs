//! [`Command`] for creating a new [`Rental`].

use common::{
    operations::{By, Insert, Select},
    Money,
};
use derive_more::{Display, Error, From};
use time::Date;
use tracerr::Traced;

use crate::{
    domain::{branch, customer, rental, vehicle, Rental, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Rental`] in the draft status.
///
/// Money fields are fixed from an already priced quote and are never
/// recomputed afterwards.
#[derive(Clone, Copy, Debug)]
pub struct CreateRental {
    /// ID of the [`Vehicle`] to rent out.
    pub vehicle_id: vehicle::Id,

    /// ID of the renting customer.
    pub customer_id: customer::Id,

    /// ID of the pickup branch.
    pub pickup_branch_id: branch::Id,

    /// ID of the return branch.
    pub return_branch_id: branch::Id,

    /// [`rental::Kind`] of the new [`Rental`].
    pub kind: rental::Kind,

    /// First day of the new [`Rental`].
    pub starts_on: Date,

    /// Last day of the new [`Rental`].
    pub ends_on: Date,

    /// Quoted daily price.
    pub daily_price: Money,

    /// Quoted total price, discounts already subtracted.
    pub total_price: Money,

    /// Quoted discount amount.
    pub discount_amount: Money,
}

impl<Db> Command<CreateRental> for Service<Db>
where
    Db: Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Insert<Rental>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRental {
            vehicle_id,
            customer_id,
            pickup_branch_id,
            return_branch_id,
            kind,
            starts_on,
            ends_on,
            daily_price,
            total_price,
            discount_amount,
        } = cmd;

        if ends_on < starts_on {
            return Err(tracerr::new!(E::InvalidDateSpan {
                starts_on,
                ends_on,
            }));
        }

        self.database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(vehicle_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let rental = Rental {
            id: rental::Id::new(),
            vehicle_id,
            customer_id,
            pickup_branch_id,
            return_branch_id,
            kind,
            starts_on,
            ends_on,
            status: rental::Status::Draft,
            start_km: None,
            end_km: None,
            daily_price,
            total_price,
            discount_amount,
            extra_km_charge: None,
            created_at: rental::CreationDateTime::now(),
            completed_at: None,
            cancelled_at: None,
        };
        self.database()
            .execute(Insert(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(rental)
    }
}

/// Error of [`CreateRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// The last day of the [`Rental`] precedes the first one.
    #[display("`Rental` cannot end ({ends_on}) before it starts ({starts_on})")]
    InvalidDateSpan {
        /// First day of the rejected span.
        starts_on: Date,

        /// Last day of the rejected span.
        ends_on: Date,
    },
}
