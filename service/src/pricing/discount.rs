//! Discount composition.

use common::Money;

use crate::{
    domain::pricing::{Campaign, TermDiscount},
    pricing::quote::AppliedDiscount,
};

/// Outcome of taking discounts off a base price.
#[derive(Clone, Debug)]
pub struct Composition {
    /// Discounts applied, in application order.
    pub applied: Vec<AppliedDiscount>,

    /// Total amount taken off the base.
    pub total_off: Money,

    /// Base price after all discounts.
    pub net: Money,
}

/// Takes the provided discounts off the `base` price.
///
/// At most one term discount applies (the caller picks the best one via
/// [`TermDiscount::best_for`]); every provided campaign applies on top.
/// Each amount is computed against the ORIGINAL base and the amounts are
/// summed, never compounded: two 10% campaigns together take 20% of the
/// base off, not 19%.
#[must_use]
pub fn compose(
    base: Money,
    term_discount: Option<&TermDiscount>,
    campaigns: &[Campaign],
) -> Composition {
    let mut applied = Vec::new();
    let mut total_off = Money::zero(base.currency);

    if let Some(d) = term_discount {
        let saved = d.discount.amount_off(base);
        total_off = total_off + saved;
        applied.push(AppliedDiscount {
            name: format!("Term Discount ({} months)", d.term_months),
            discount: d.discount,
            saved,
        });
    }
    for c in campaigns {
        let saved = c.discount.amount_off(base);
        total_off = total_off + saved;
        applied.push(AppliedDiscount {
            name: c.name.to_string(),
            discount: c.discount,
            saved,
        });
    }

    Composition {
        applied,
        total_off,
        net: base - total_off,
    }
}

#[cfg(test)]
mod spec {
    use common::{Currency, Money, Percent};
    use time::macros::date;

    use crate::domain::{
        pricing::{
            campaign::{self, Campaign},
            term_discount::{self, TermDiscount},
            Discount,
        },
        rental,
    };

    use super::compose;

    fn try_lira(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Try)
    }

    fn pct(s: &str) -> Discount {
        Discount::Percentage(Percent::new(s.parse().unwrap()).unwrap())
    }

    fn fixed(s: &str) -> Discount {
        Discount::FixedAmount(try_lira(s))
    }

    fn campaign(name: &str, discount: Discount) -> Campaign {
        Campaign {
            id: campaign::Id::new(),
            name: campaign::Name::new(name).unwrap(),
            discount,
            applicable_rental_kinds: vec![rental::Kind::Leasing],
            valid_from: date!(2025 - 01 - 01),
            valid_to: date!(2025 - 12 - 31),
            min_term_months: None,
            category_id: None,
            active: true,
        }
    }

    #[test]
    fn campaigns_are_additive_not_compounded() {
        let campaigns = [
            campaign("First", pct("10")),
            campaign("Second", pct("10")),
        ];
        let c = compose(try_lira("1000"), None, &campaigns);

        assert_eq!(c.total_off, try_lira("200"));
        assert_eq!(c.net, try_lira("800"));
        assert_eq!(c.applied.len(), 2);
        assert_eq!(c.applied[0].saved, try_lira("100"));
        assert_eq!(c.applied[1].saved, try_lira("100"));
    }

    #[test]
    fn term_discount_stacks_with_campaigns_against_the_original_base() {
        let term = TermDiscount {
            id: term_discount::Id::new(),
            category_id: None,
            term_months: 24,
            discount: pct("15"),
            active: true,
        };
        let campaigns = [campaign("Spring", fixed("500"))];
        let c = compose(try_lira("10000"), Some(&term), &campaigns);

        assert_eq!(c.total_off, try_lira("2000"));
        assert_eq!(c.net, try_lira("8000"));
        assert_eq!(c.applied[0].name, "Term Discount (24 months)");
        assert_eq!(c.applied[1].name, "Spring");
    }

    #[test]
    fn no_discounts_leave_the_base_untouched() {
        let c = compose(try_lira("1000"), None, &[]);
        assert!(c.applied.is_empty());
        assert_eq!(c.total_off, try_lira("0"));
        assert_eq!(c.net, try_lira("1000"));
    }
}
