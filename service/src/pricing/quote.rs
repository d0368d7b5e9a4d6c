//! Outbound quote shapes.

use common::Money;
use rust_decimal::Decimal;

use crate::{
    domain::{pricing, rental, vehicle::Kilometers},
    pricing::{discount::Composition, Source},
};

/// Single labelled line of a quote breakdown.
#[derive(Clone, Debug)]
pub struct BreakdownLine {
    /// Human-readable label of this line.
    pub description: String,

    /// Amount of this line.
    pub amount: Money,
}

impl BreakdownLine {
    /// Creates a new [`BreakdownLine`].
    #[must_use]
    pub fn new(description: impl Into<String>, amount: Money) -> Self {
        Self {
            description: description.into(),
            amount,
        }
    }
}

/// Single discount applied to a quote, as reported to the customer.
#[derive(Clone, Debug)]
pub struct AppliedDiscount {
    /// Name of the discount (campaign name, or a term discount label).
    pub name: String,

    /// Applied [`pricing::Discount`], carrying its kind and value.
    pub discount: pricing::Discount,

    /// Amount this discount saved.
    pub saved: Money,
}

impl AppliedDiscount {
    /// Returns the [`pricing::Kind`] of this [`AppliedDiscount`].
    #[must_use]
    pub fn kind(&self) -> pricing::Kind {
        self.discount.kind()
    }
}

/// Priced short-rental quote.
///
/// Short rentals carry no discount layer: the resolved base price is the
/// total.
#[derive(Clone, Debug)]
pub struct RentalQuote {
    /// [`rental::Kind`] quoted.
    pub kind: rental::Kind,

    /// Total number of rented days.
    pub total_days: u32,

    /// Effective per-day price, rounded half-up to 2 decimal places.
    pub daily_price: Money,

    /// Total price of the rental.
    pub total_price: Money,

    /// [`Source`] the price came from.
    pub source: Source,

    /// Ordered breakdown of the total.
    pub breakdown: Vec<BreakdownLine>,
}

impl RentalQuote {
    /// Creates a new [`RentalQuote`] out of a resolved total.
    #[must_use]
    pub fn new(
        kind: rental::Kind,
        total_days: u32,
        total_price: Money,
        source: Source,
    ) -> Self {
        let daily_price = divide(total_price, total_days.max(1));
        let breakdown = vec![
            BreakdownLine::new(
                format!("Base Price ({total_days} days)"),
                total_price,
            ),
            BreakdownLine::new("Final Total", total_price),
        ];
        Self {
            kind,
            total_days,
            daily_price,
            total_price,
            source,
            breakdown,
        }
    }
}

/// Priced leasing quote.
#[derive(Clone, Debug)]
pub struct LeasingQuote {
    /// Term quoted, in months.
    pub term_months: u32,

    /// Resolved base price of the whole term, before discounts.
    pub base_price: Money,

    /// Discounts applied, in application order.
    pub applied_discounts: Vec<AppliedDiscount>,

    /// Total amount the discounts saved.
    pub total_discount: Money,

    /// Base price after all discounts.
    pub net_price: Money,

    /// Per-month net price, rounded half-up to 2 decimal places.
    pub monthly_price: Money,

    /// Kilometers included per month.
    pub included_km_per_month: Kilometers,

    /// [`Source`] the base price came from.
    pub source: Source,

    /// Ordered breakdown of the net total.
    pub breakdown: Vec<BreakdownLine>,
}

impl LeasingQuote {
    /// Creates a new [`LeasingQuote`] out of a resolved base price and the
    /// discount [`Composition`] taken off it.
    #[must_use]
    pub fn new(
        term_months: u32,
        base_price: Money,
        composition: Composition,
        included_km_per_month: Kilometers,
        source: Source,
    ) -> Self {
        let Composition {
            applied,
            total_off,
            net,
        } = composition;

        let mut breakdown = vec![BreakdownLine::new(
            format!("Base Price ({term_months} months)"),
            base_price,
        )];
        // Discount lines are negative, so the breakdown sums to the final
        // total.
        for d in &applied {
            breakdown.push(BreakdownLine::new(d.name.clone(), -d.saved));
        }
        breakdown.push(BreakdownLine::new("Final Total", net));

        Self {
            term_months,
            base_price,
            applied_discounts: applied,
            total_discount: total_off,
            net_price: net,
            monthly_price: divide(net, term_months.max(1)),
            included_km_per_month,
            source,
            breakdown,
        }
    }

    /// Returns the per-month billing schedule of this [`LeasingQuote`].
    ///
    /// Every month is billed the rounded [`monthly_price`], except the last
    /// one, which absorbs the rounding residue so that the schedule sums
    /// exactly to [`net_price`].
    ///
    /// [`monthly_price`]: LeasingQuote::monthly_price
    /// [`net_price`]: LeasingQuote::net_price
    #[must_use]
    pub fn monthly_schedule(&self) -> Vec<Money> {
        let term = self.term_months.max(1);
        let mut schedule = vec![self.monthly_price; term as usize];
        if let Some(last) = schedule.last_mut() {
            *last = self.net_price - self.monthly_price * (term - 1);
        }
        schedule
    }
}

/// Divides the provided amount evenly, rounding half-up to 2 decimal
/// places.
fn divide(amount: Money, by: u32) -> Money {
    Money::new(amount.amount / Decimal::from(by), amount.currency)
        .round_2dp()
}

#[cfg(test)]
mod spec {
    use common::{Currency, Money, Percent};

    use crate::{
        domain::{pricing::Discount, rental},
        pricing::{discount::Composition, Source},
    };

    use super::{AppliedDiscount, LeasingQuote, RentalQuote};

    fn try_lira(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Try)
    }

    fn no_discounts(base: Money) -> Composition {
        Composition {
            applied: Vec::new(),
            total_off: Money::zero(base.currency),
            net: base,
        }
    }

    #[test]
    fn rental_breakdown_shape() {
        let q = RentalQuote::new(
            rental::Kind::Daily,
            5,
            try_lira("5000"),
            Source::Daily,
        );

        assert_eq!(q.daily_price, try_lira("1000"));
        assert_eq!(q.breakdown.len(), 2);
        assert_eq!(q.breakdown[0].description, "Base Price (5 days)");
        assert_eq!(q.breakdown[0].amount, try_lira("5000"));
        assert_eq!(q.breakdown[1].description, "Final Total");
        assert_eq!(q.breakdown[1].amount, try_lira("5000"));
    }

    #[test]
    fn leasing_quote_carries_discounts_into_the_breakdown() {
        let base = try_lira("288000");
        let discount = AppliedDiscount {
            name: "Spring".into(),
            discount: Discount::Percentage(
                Percent::new("10".parse().unwrap()).unwrap(),
            ),
            saved: try_lira("28800"),
        };
        let q = LeasingQuote::new(
            24,
            base,
            Composition {
                applied: vec![discount],
                total_off: try_lira("28800"),
                net: try_lira("259200"),
            },
            2_000,
            Source::CustomerContract,
        );

        assert_eq!(q.net_price, try_lira("259200"));
        assert_eq!(q.monthly_price, try_lira("10800"));
        assert_eq!(q.breakdown.len(), 3);
        assert_eq!(q.breakdown[1].description, "Spring");
        assert_eq!(q.breakdown[1].amount, try_lira("-28800"));
        assert_eq!(q.breakdown[2].amount, try_lira("259200"));

        // All lines but the final total sum to the final total.
        let lines = q
            .breakdown
            .iter()
            .take(q.breakdown.len() - 1)
            .fold(Money::zero(Currency::Try), |acc, l| acc + l.amount);
        assert_eq!(lines, q.net_price);
    }

    #[test]
    fn last_month_absorbs_the_rounding_residue() {
        // 100000 / 7 months = 14285.71 rounded; the last month makes the
        // schedule sum exactly.
        let base = try_lira("100000");
        let q = LeasingQuote::new(
            7,
            base,
            no_discounts(base),
            0,
            Source::LeasingPlan,
        );

        assert_eq!(q.monthly_price, try_lira("14285.71"));
        let schedule = q.monthly_schedule();
        assert_eq!(schedule.len(), 7);
        assert_eq!(schedule[6], try_lira("14285.74"));

        let sum = schedule
            .into_iter()
            .fold(Money::zero(Currency::Try), |acc, m| acc + m);
        assert_eq!(sum, q.net_price);
    }

    #[test]
    fn even_division_has_no_residue() {
        let base = try_lira("240000");
        let q = LeasingQuote::new(
            24,
            base,
            no_discounts(base),
            0,
            Source::LeasingPlan,
        );

        assert_eq!(q.monthly_price, try_lira("10000"));
        assert!(q.monthly_schedule().iter().all(|m| *m == try_lira("10000")));
    }
}
