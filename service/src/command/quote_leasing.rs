//! [`Command`] for pricing a lease.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use time::Date;
use tracerr::Traced;

use crate::{
    domain::{
        category, customer,
        pricing::{Campaign, LeasingPlan, PricingRule, TermDiscount},
        rental, vehicle, Category, CustomerContract, Vehicle,
    },
    infra::{database, Database},
    pricing::{discount, strategy, Chain, Context, LeasingQuote, Strategy},
    read::{contract::Active, pricing::Applicable},
    Service,
};

use super::Command;

/// [`Command`] for pricing a lease.
///
/// Full rate resolution: strategy chain over the customer's contract, the
/// published plan and the category rules, then the discount layer (best
/// term discount plus every applicable campaign) on top.
#[derive(Clone, Copy, Debug)]
pub struct QuoteLeasing {
    /// ID of the [`Vehicle`] to quote.
    pub vehicle_id: vehicle::Id,

    /// ID of the quoted customer, if known.
    pub customer_id: Option<customer::Id>,

    /// First day of the quoted lease.
    pub starts_on: Date,

    /// Last day of the quoted lease.
    pub ends_on: Date,

    /// Explicitly requested term, in months, overriding the date span.
    pub term_months: Option<u32>,
}

impl<Db> Command<QuoteLeasing> for Service<Db>
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
            Select<
                By<Option<Applicable<LeasingPlan>>, (category::Id, u32, Date)>,
            >,
            Ok = Option<Applicable<LeasingPlan>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<PricingRule>, category::Id>>,
            Ok = Vec<PricingRule>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<TermDiscount>, category::Id>>,
            Ok = Vec<TermDiscount>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Campaign>, Date>>,
            Ok = Vec<Campaign>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = LeasingQuote;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: QuoteLeasing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let QuoteLeasing {
            vehicle_id,
            customer_id,
            starts_on,
            ends_on,
            term_months,
        } = cmd;

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

        let cx = Context {
            vehicle_id,
            category_id: category.id,
            customer_id,
            kind: rental::Kind::Leasing,
            starts_on,
            ends_on,
            total_days: None,
            term_months,
            vehicle_daily_price: vehicle.daily_price,
            vehicle_weekly_price: vehicle.weekly_price,
            vehicle_monthly_price: vehicle.monthly_price,
            category_default_daily_price: category.default_daily_price,
        };
        let term = cx.effective_term_months();

        let contract = match customer_id {
            Some(customer_id) => self
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
            None => None,
        };
        let plan = self
            .database()
            .execute(Select(By::<Option<Applicable<LeasingPlan>>, _>::new((
                category.id,
                term,
                starts_on,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let rules = self
            .database()
            .execute(Select(By::<Vec<PricingRule>, _>::new(category.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let included_km_per_month = contract
            .as_ref()
            .map(|Active(c)| c.included_km_per_month)
            .or_else(|| {
                plan.as_ref().map(|Applicable(p)| p.included_km_per_month)
            })
            .unwrap_or(0);

        let mut strategies: Vec<Box<dyn Strategy + Send + Sync>> =
            vec![Box::new(strategy::RuleBased { rules })];
        if let Some(Active(contract)) = contract {
            strategies.push(Box::new(strategy::Contract { contract }));
        }
        if let Some(Applicable(plan)) = plan {
            strategies.push(Box::new(strategy::Plan { plan }));
        }
        let resolved = Chain::new(strategies).resolve(&cx);

        let term_discounts = self
            .database()
            .execute(Select(By::<Vec<TermDiscount>, _>::new(category.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let best_term_discount =
            TermDiscount::best_for(&term_discounts, category.id, term);
        let campaigns = self
            .database()
            .execute(Select(By::<Vec<Campaign>, _>::new(starts_on)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .filter(|c| {
                c.applies_to(
                    rental::Kind::Leasing,
                    category.id,
                    starts_on,
                    term,
                )
            })
            .collect::<Vec<_>>();

        let composition = discount::compose(
            resolved.price,
            best_term_discount,
            &campaigns,
        );

        Ok(LeasingQuote::new(
            term,
            resolved.price,
            composition,
            included_km_per_month,
            resolved.source,
        ))
    }
}

/// Error of [`QuoteLeasing`] [`Command`] execution.
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
}
