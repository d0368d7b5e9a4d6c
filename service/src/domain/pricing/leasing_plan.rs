//! [`LeasingPlan`] definitions.

use common::Money;
use derive_more::{Display, From, FromStr, Into};
use time::Date;
use uuid::Uuid;

use crate::domain::{category, vehicle::Kilometers};

/// Published leasing price list cell for a category and term.
///
/// A [`LeasingPlan`] is what every customer gets by default; a
/// [`CustomerContract`] overrides it per-customer.
///
/// [`CustomerContract`]: crate::domain::CustomerContract
#[derive(Clone, Debug)]
pub struct LeasingPlan {
    /// ID of this [`LeasingPlan`].
    pub id: Id,

    /// ID of the [`category::Category`] this [`LeasingPlan`] covers.
    pub category_id: category::Id,

    /// Term, in months, this [`LeasingPlan`] covers.
    pub term_months: u32,

    /// Monthly base price of this [`LeasingPlan`].
    pub monthly_base_price: Money,

    /// Kilometers included per month before extra-km charges apply.
    pub included_km_per_month: Kilometers,

    /// First day this [`LeasingPlan`] is valid on, if bounded.
    pub valid_from: Option<Date>,

    /// Last day this [`LeasingPlan`] is valid on, if bounded.
    pub valid_to: Option<Date>,

    /// Indicator whether this [`LeasingPlan`] is published.
    pub active: bool,
}

impl LeasingPlan {
    /// Indicates whether this [`LeasingPlan`] applies to the provided
    /// category, term and date.
    #[must_use]
    pub fn is_applicable(
        &self,
        category_id: category::Id,
        term_months: u32,
        on: Date,
    ) -> bool {
        self.active
            && self.category_id == category_id
            && self.term_months == term_months
            && self.valid_from.is_none_or(|from| from <= on)
            && self.valid_to.is_none_or(|to| on <= to)
    }
}

/// ID of a [`LeasingPlan`].
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
