//! Price calculation [`Context`].

use common::{Currency, Money};
use time::Date;

use crate::{
    domain::{category, customer, rental, vehicle},
    pricing::calendar,
};

/// Immutable input of a single rate resolution.
///
/// Built once per quote from rows the caller has already fetched, then
/// handed to the strategy [`Chain`]. Strategies only ever read it, so one
/// [`Context`] may be shared freely across threads.
///
/// [`Chain`]: crate::pricing::Chain
#[derive(Clone, Debug)]
pub struct Context {
    /// ID of the quoted [`vehicle::Vehicle`].
    pub vehicle_id: vehicle::Id,

    /// ID of the vehicle's [`category::Category`].
    pub category_id: category::Id,

    /// ID of the quoted customer, if known.
    pub customer_id: Option<customer::Id>,

    /// [`rental::Kind`] being quoted.
    pub kind: rental::Kind,

    /// First day of the quoted span.
    pub starts_on: Date,

    /// Last day of the quoted span.
    pub ends_on: Date,

    /// Explicitly requested day count, overriding the date span.
    pub total_days: Option<u32>,

    /// Explicitly requested term, in months, overriding the date span.
    pub term_months: Option<u32>,

    /// Vehicle's own daily price, overriding the category default.
    pub vehicle_daily_price: Option<Money>,

    /// Vehicle's own weekly price.
    pub vehicle_weekly_price: Option<Money>,

    /// Vehicle's own monthly price.
    pub vehicle_monthly_price: Option<Money>,

    /// Default daily price of the vehicle's [`category::Category`].
    pub category_default_daily_price: Money,
}

impl Context {
    /// Returns the [`Currency`] this [`Context`] is quoted in.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.category_default_daily_price.currency
    }

    /// Returns the total number of rented days, counting both the first and
    /// the last day.
    ///
    /// An explicitly provided day count takes precedence over the date
    /// span.
    #[must_use]
    pub fn total_days(&self) -> u32 {
        self.total_days.unwrap_or_else(|| {
            u32::try_from((self.ends_on - self.starts_on).whole_days())
                .unwrap_or(0)
                .saturating_add(1)
        })
    }

    /// Returns the effective term of this quote, in months.
    ///
    /// An explicitly provided term takes precedence; otherwise the term is
    /// the number of whole calendar months in the date span, and never less
    /// than 1 (a lease shorter than a month is still billed one).
    #[must_use]
    pub fn effective_term_months(&self) -> u32 {
        self.term_months.unwrap_or_else(|| {
            let (months, _) =
                calendar::months_and_days(self.starts_on, self.ends_on);
            months.max(1)
        })
    }

    /// Returns the daily price to bill remainder days at: the vehicle's own
    /// daily price if set, the category default otherwise.
    #[must_use]
    pub fn daily_price(&self) -> Money {
        self.vehicle_daily_price
            .unwrap_or(self.category_default_daily_price)
    }
}

#[cfg(test)]
mod spec {
    use common::{Currency, Money};
    use time::macros::date;

    use super::{category, rental, vehicle, Context};

    fn context() -> Context {
        Context {
            vehicle_id: vehicle::Id::new(),
            category_id: category::Id::new(),
            customer_id: None,
            kind: rental::Kind::Daily,
            starts_on: date!(2025 - 03 - 01),
            ends_on: date!(2025 - 03 - 05),
            total_days: None,
            term_months: None,
            vehicle_daily_price: None,
            vehicle_weekly_price: None,
            vehicle_monthly_price: None,
            category_default_daily_price: Money::new(
                "1000".parse().unwrap(),
                Currency::Try,
            ),
        }
    }

    #[test]
    fn total_days_is_inclusive_and_overridable() {
        let mut cx = context();
        assert_eq!(cx.total_days(), 5);

        cx.total_days = Some(10);
        assert_eq!(cx.total_days(), 10);
    }

    #[test]
    fn term_from_span_is_at_least_one_month() {
        let mut cx = context();
        assert_eq!(cx.effective_term_months(), 1);

        cx.ends_on = date!(2027 - 03 - 01);
        assert_eq!(cx.effective_term_months(), 24);

        cx.term_months = Some(36);
        assert_eq!(cx.effective_term_months(), 36);
    }

    #[test]
    fn daily_price_prefers_the_vehicle_override() {
        let mut cx = context();
        assert_eq!(cx.daily_price(), cx.category_default_daily_price);

        let own = Money::new("1200".parse().unwrap(), Currency::Try);
        cx.vehicle_daily_price = Some(own);
        assert_eq!(cx.daily_price(), own);
    }
}
