//! [`PricingRule`] definitions.

use common::Percent;
use derive_more::{Display, From, FromStr, Into};
use time::Date;
use uuid::Uuid;

use crate::domain::{category, rental};

/// Category- and rental-kind-scoped pricing rule.
///
/// A [`PricingRule`] adjusts the category default price for a day-count
/// range inside a validity window (e.g. "economy dailies of 7+ days get 5%
/// off in summer"). It's independent of vehicle and customer price override
/// layers and sits just above the category default in the resolution chain.
#[derive(Clone, Debug)]
pub struct PricingRule {
    /// ID of this [`PricingRule`].
    pub id: Id,

    /// ID of the [`category::Category`] this [`PricingRule`] is scoped to.
    pub category_id: category::Id,

    /// [`rental::Kind`] this [`PricingRule`] is scoped to.
    pub rental_kind: rental::Kind,

    /// Minimum rented day count this [`PricingRule`] covers.
    pub min_days: u32,

    /// Maximum rented day count this [`PricingRule`] covers, if bounded.
    pub max_days: Option<u32>,

    /// First day this [`PricingRule`] is valid on, if bounded.
    pub valid_from: Option<Date>,

    /// Last day this [`PricingRule`] is valid on, if bounded.
    pub valid_to: Option<Date>,

    /// Percentage taken off the category default price, if any.
    pub discount_percent: Option<Percent>,

    /// Indicator whether this [`PricingRule`] is in effect.
    pub active: bool,
}

impl PricingRule {
    /// Indicates whether this [`PricingRule`] matches a quote of the
    /// provided shape.
    #[must_use]
    pub fn matches(
        &self,
        category_id: category::Id,
        kind: rental::Kind,
        total_days: u32,
        on: Date,
    ) -> bool {
        self.active
            && self.category_id == category_id
            && self.rental_kind == kind
            && self.min_days <= total_days
            && self.max_days.is_none_or(|max| total_days <= max)
            && self.valid_from.is_none_or(|from| from <= on)
            && self.valid_to.is_none_or(|to| on <= to)
    }
}

/// ID of a [`PricingRule`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, FromStr, Hash, Into,
    PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}
