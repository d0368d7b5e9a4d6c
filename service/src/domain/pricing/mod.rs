//! Pricing catalogue definitions.
//!
//! These are the persisted inputs of rate resolution: published price list
//! cells ([`LeasingPlan`]), scoped rules ([`PricingRule`]), discounts
//! ([`TermDiscount`], [`Campaign`]) and kilometer schedules ([`KmBundle`],
//! [`KmPackage`]). The resolution itself lives in [`crate::pricing`].

pub mod campaign;
pub mod km_bundle;
pub mod km_package;
pub mod leasing_plan;
pub mod rule;
pub mod term_discount;

use common::{define_kind, Money, Percent};
use derive_more::Display;

#[doc(inline)]
pub use self::{
    campaign::Campaign, km_bundle::KmBundle, km_package::KmPackage,
    leasing_plan::LeasingPlan, rule::PricingRule,
    term_discount::TermDiscount,
};

/// Value of a discount, either relative or absolute.
#[derive(Clone, Copy, Debug, Display, PartialEq)]
pub enum Discount {
    /// Percentage of the base price.
    #[display("{_0}%")]
    Percentage(Percent),

    /// Fixed amount subtracted outright.
    #[display("{_0}")]
    FixedAmount(Money),
}

impl Discount {
    /// Returns the amount this [`Discount`] takes off the provided `base`
    /// price.
    ///
    /// A [`Discount::Percentage`] is computed against the `base` and rounded
    /// half-up to 2 decimal places. A [`Discount::FixedAmount`] is returned
    /// as is, regardless of the `base`.
    #[must_use]
    pub fn amount_off(&self, base: Money) -> Money {
        match self {
            Self::Percentage(pct) => pct.of(base),
            Self::FixedAmount(amount) => *amount,
        }
    }

    /// Returns the [`Kind`] of this [`Discount`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Percentage(_) => Kind::Percentage,
            Self::FixedAmount(_) => Kind::FixedAmount,
        }
    }
}

define_kind! {
    #[doc = "Kind of a [`Discount`]."]
    enum Kind {
        #[doc = "Percentage of the base price."]
        Percentage = 1,

        #[doc = "Fixed amount subtracted outright."]
        FixedAmount = 2,
    }
}

#[cfg(test)]
mod spec {
    use common::{Currency, Money, Percent};

    use super::{Discount, Kind};

    fn try_lira(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Try)
    }

    #[test]
    fn percentage_is_rounded_half_up() {
        let d = Discount::Percentage(
            Percent::new("12.5".parse().unwrap()).unwrap(),
        );
        assert_eq!(d.amount_off(try_lira("333.33")), try_lira("41.67"));
        assert_eq!(d.kind(), Kind::Percentage);
    }

    #[test]
    fn fixed_amount_ignores_the_base() {
        let d = Discount::FixedAmount(try_lira("500"));
        assert_eq!(d.amount_off(try_lira("100")), try_lira("500"));
        assert_eq!(d.amount_off(try_lira("100000")), try_lira("500"));
        assert_eq!(d.kind(), Kind::FixedAmount);
    }
}
