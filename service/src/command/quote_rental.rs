//! [`Command`] for pricing a short rental.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use time::Date;
use tracerr::Traced;

use crate::{
    domain::{
        category, customer, pricing::PricingRule, rental, vehicle, Category,
        CustomerContract, Vehicle,
    },
    infra::{database, Database},
    pricing::{strategy, Chain, Context, RentalQuote, Strategy},
    read::contract::Active,
    Service,
};

use super::Command;

/// [`Command`] for pricing a short (daily, weekly or monthly) rental.
///
/// Runs the resolution chain only: short rentals carry no discount layer.
#[derive(Clone, Copy, Debug)]
pub struct QuoteRental {
    /// ID of the [`Vehicle`] to quote.
    pub vehicle_id: vehicle::Id,

    /// ID of the quoted customer, if known.
    pub customer_id: Option<customer::Id>,

    /// [`rental::Kind`] to quote.
    pub kind: rental::Kind,

    /// First day of the quoted rental.
    pub starts_on: Date,

    /// Last day of the quoted rental.
    pub ends_on: Date,

    /// Explicitly requested day count, overriding the date span.
    pub total_days: Option<u32>,
}

impl<Db> Command<QuoteRental> for Service<Db>
where
    Db: Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Category>, category::Id>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    Option<Active<CustomerContract>>,
                    (customer::Id, category::Id, Date),
                >,
            >,
            Ok = Option<Active<CustomerContract>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<PricingRule>, category::Id>>,
            Ok = Vec<PricingRule>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = RentalQuote;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: QuoteRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let QuoteRental {
            vehicle_id,
            customer_id,
            kind,
            starts_on,
            ends_on,
            total_days,
        } = cmd;

        if kind == rental::Kind::Leasing {
            return Err(tracerr::new!(E::LeasingKind));
        }

        let vehicle = self
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(vehicle_id))
            .map_err(tracerr::wrap!())?;

        let category = self
            .database()
            .execute(Select(By::<Option<Category>, _>::new(
                vehicle.category_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CategoryNotExists(vehicle.category_id))
            .map_err(tracerr::wrap!())?;

        let rules = self
            .database()
            .execute(Select(By::<Vec<PricingRule>, _>::new(category.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Monthly rentals honor the customer's negotiated contract price.
        let contract = match customer_id {
            Some(customer_id) if kind == rental::Kind::Monthly => self
                .database()
                .execute(Select(
                    By::<Option<Active<CustomerContract>>, _>::new((
                        customer_id,
                        category.id,
                        starts_on,
                    )),
                ))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?,
            _ => None,
        };

        let cx = Context {
            vehicle_id,
            category_id: category.id,
            customer_id,
            kind,
            starts_on,
            ends_on,
            total_days,
            term_months: None,
            vehicle_daily_price: vehicle.daily_price,
            vehicle_weekly_price: vehicle.weekly_price,
            vehicle_monthly_price: vehicle.monthly_price,
            category_default_daily_price: category.default_daily_price,
        };
        let mut strategies: Vec<Box<dyn Strategy + Send + Sync>> = vec![
            Box::new(strategy::Daily),
            Box::new(strategy::Weekly),
            Box::new(strategy::Monthly),
            Box::new(strategy::RuleBased { rules }),
        ];
        if let Some(Active(contract)) = contract {
            strategies.push(Box::new(strategy::Contract { contract }));
        }
        let resolved = Chain::new(strategies).resolve(&cx);

        Ok(RentalQuote::new(
            kind,
            cx.total_days(),
            resolved.price,
            resolved.source,
        ))
    }
}

/// Error of [`QuoteRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// [`Category`] with the provided ID does not exist.
    #[display("`Category(id: {_0})` does not exist")]
    CategoryNotExists(#[error(not(source))] category::Id),

    /// Leases are priced by [`QuoteLeasing`], not this [`Command`].
    ///
    /// [`QuoteLeasing`]: super::QuoteLeasing
    #[display("leases are priced by the `QuoteLeasing` command")]
    LeasingKind,
}
