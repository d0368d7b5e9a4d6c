//! Pricing [`Strategy`] definitions and the resolution [`Chain`].

use std::fmt;

use common::Money;

use crate::{
    domain::{
        pricing::{LeasingPlan, PricingRule},
        rental, CustomerContract,
    },
    pricing::{calendar, Context},
};

/// Single price-resolution rule of the [`Chain`].
///
/// A [`Strategy`] is a pure function of the [`Context`]: it either returns
/// a price or abstains with [`None`]. Abstention is not an error, it just
/// passes the quote down the chain.
pub trait Strategy {
    /// Returns the [`Source`] tag of prices produced by this [`Strategy`].
    fn source(&self) -> Source;

    /// Returns the priority of this [`Strategy`]. Higher goes first.
    fn priority(&self) -> u16;

    /// Prices the provided [`Context`], or abstains.
    fn evaluate(&self, cx: &Context) -> Option<Money>;
}

/// Ordered, immutable list of [`Strategy`]s.
///
/// Built once per quote from pre-fetched rows and evaluated in descending
/// priority; the first non-abstaining [`Strategy`] wins. A [`Chain`] always
/// ends with the unconditional [`CategoryDefault`], so resolution is total.
pub struct Chain(Vec<Box<dyn Strategy + Send + Sync>>);

impl Chain {
    /// Creates a new [`Chain`] out of the provided [`Strategy`]s.
    ///
    /// The strategies are sorted by descending priority, and a
    /// [`CategoryDefault`] is appended unless one is present already.
    #[must_use]
    pub fn new(mut strategies: Vec<Box<dyn Strategy + Send + Sync>>) -> Self {
        if !strategies
            .iter()
            .any(|s| s.source() == Source::CategoryDefault)
        {
            strategies.push(Box::new(CategoryDefault));
        }
        strategies.sort_by(|a, b| b.priority().cmp(&a.priority()));
        Self(strategies)
    }

    /// Resolves the base price of the provided [`Context`].
    #[must_use]
    pub fn resolve(&self, cx: &Context) -> Resolution {
        for s in &self.0 {
            if let Some(price) = s.evaluate(cx) {
                return Resolution {
                    price,
                    source: s.source(),
                };
            }
        }
        // Unreachable: `CategoryDefault` never abstains.
        Resolution {
            price: CategoryDefault::fallback(cx),
            source: Source::CategoryDefault,
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|s| s.source()))
            .finish()
    }
}

/// Outcome of a [`Chain`] resolution.
#[derive(Clone, Copy, Debug)]
pub struct Resolution {
    /// Resolved base price.
    pub price: Money,

    /// [`Source`] the price came from.
    pub source: Source,
}

/// Origin of a resolved price, as reported on quotes.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    /// Unconditional category default fallback.
    CategoryDefault,

    /// Category- and kind-scoped [`PricingRule`].
    PricingRule,

    /// Vehicle's own daily price.
    Daily,

    /// Vehicle's own weekly price.
    Weekly,

    /// Vehicle's own monthly price.
    Monthly,

    /// Published [`LeasingPlan`].
    LeasingPlan,

    /// Negotiated [`CustomerContract`].
    CustomerContract,
}

/// Unconditional fallback [`Strategy`] pricing off the category default.
#[derive(Clone, Copy, Debug, Default)]
pub struct CategoryDefault;

impl CategoryDefault {
    /// Prices the provided [`Context`] off its category default daily
    /// price: per day for short rentals, per 30-day month for leases.
    #[must_use]
    pub fn fallback(cx: &Context) -> Money {
        let default = cx.category_default_daily_price;
        match cx.kind {
            rental::Kind::Leasing => {
                default * 30_u32 * cx.effective_term_months()
            }
            rental::Kind::Daily
            | rental::Kind::Weekly
            | rental::Kind::Monthly => default * cx.total_days(),
        }
    }
}

impl Strategy for CategoryDefault {
    fn source(&self) -> Source {
        Source::CategoryDefault
    }

    fn priority(&self) -> u16 {
        1
    }

    fn evaluate(&self, cx: &Context) -> Option<Money> {
        Some(Self::fallback(cx))
    }
}

/// [`Strategy`] applying the first matching [`PricingRule`].
///
/// The rule prices off the category default for the whole span and takes
/// its own percentage off, if it carries one.
#[derive(Debug)]
pub struct RuleBased {
    /// Candidate [`PricingRule`]s, in lookup order.
    pub rules: Vec<PricingRule>,
}

impl Strategy for RuleBased {
    fn source(&self) -> Source {
        Source::PricingRule
    }

    fn priority(&self) -> u16 {
        2
    }

    fn evaluate(&self, cx: &Context) -> Option<Money> {
        let days = cx.total_days();
        let rule = self.rules.iter().find(|r| {
            r.matches(cx.category_id, cx.kind, days, cx.starts_on)
        })?;

        let base = cx.category_default_daily_price * days;
        Some(match rule.discount_percent {
            Some(pct) => base - pct.of(base),
            None => base,
        })
    }
}

/// [`Strategy`] billing a daily rental at the vehicle's own daily price.
#[derive(Clone, Copy, Debug, Default)]
pub struct Daily;

impl Strategy for Daily {
    fn source(&self) -> Source {
        Source::Daily
    }

    fn priority(&self) -> u16 {
        100
    }

    fn evaluate(&self, cx: &Context) -> Option<Money> {
        (cx.kind == rental::Kind::Daily)
            .then(|| Some(cx.vehicle_daily_price? * cx.total_days()))
            .flatten()
    }
}

/// [`Strategy`] billing a weekly rental at the vehicle's own weekly price,
/// with remainder days billed daily.
#[derive(Clone, Copy, Debug, Default)]
pub struct Weekly;

impl Strategy for Weekly {
    fn source(&self) -> Source {
        Source::Weekly
    }

    fn priority(&self) -> u16 {
        100
    }

    fn evaluate(&self, cx: &Context) -> Option<Money> {
        if cx.kind != rental::Kind::Weekly {
            return None;
        }
        let weekly = cx.vehicle_weekly_price?;
        let (weeks, days) = calendar::weeks_and_days(cx.total_days());
        Some(weekly * weeks + cx.daily_price() * days)
    }
}

/// [`Strategy`] billing a monthly rental at the vehicle's own monthly
/// price, calendar-based, with remainder days billed daily.
#[derive(Clone, Copy, Debug, Default)]
pub struct Monthly;

impl Strategy for Monthly {
    fn source(&self) -> Source {
        Source::Monthly
    }

    fn priority(&self) -> u16 {
        100
    }

    fn evaluate(&self, cx: &Context) -> Option<Money> {
        if cx.kind != rental::Kind::Monthly {
            return None;
        }
        let monthly = cx.vehicle_monthly_price?;
        let (months, days) =
            calendar::months_and_days(cx.starts_on, cx.ends_on);
        Some(monthly * months + cx.daily_price() * days)
    }
}

/// [`Strategy`] billing a lease at a published [`LeasingPlan`]'s monthly
/// base price.
#[derive(Clone, Debug)]
pub struct Plan {
    /// Pre-fetched candidate [`LeasingPlan`].
    pub plan: LeasingPlan,
}

impl Strategy for Plan {
    fn source(&self) -> Source {
        Source::LeasingPlan
    }

    fn priority(&self) -> u16 {
        200
    }

    fn evaluate(&self, cx: &Context) -> Option<Money> {
        if cx.kind != rental::Kind::Leasing {
            return None;
        }
        let term = cx.effective_term_months();
        self.plan
            .is_applicable(cx.category_id, term, cx.starts_on)
            .then(|| self.plan.monthly_base_price * term)
    }
}

/// [`Strategy`] billing a lease at a [`CustomerContract`]'s negotiated
/// monthly price. The strongest price source.
#[derive(Clone, Debug)]
pub struct Contract {
    /// Pre-fetched candidate [`CustomerContract`].
    pub contract: CustomerContract,
}

impl Strategy for Contract {
    fn source(&self) -> Source {
        Source::CustomerContract
    }

    fn priority(&self) -> u16 {
        300
    }

    fn evaluate(&self, cx: &Context) -> Option<Money> {
        if !matches!(cx.kind, rental::Kind::Leasing | rental::Kind::Monthly) {
            return None;
        }
        let customer_id = cx.customer_id?;
        (self.contract.customer_id == customer_id
            && self.contract.category_id == cx.category_id
            && self.contract.is_active_on(cx.starts_on))
        .then(|| {
            self.contract.monthly_price * cx.effective_term_months()
        })
    }
}
