//! [`TermDiscount`] definitions.

use derive_more::{Display, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::{category, pricing::Discount};

/// Discount keyed by contract length.
///
/// At most one [`TermDiscount`] is applied per quote: a category-specific
/// one beats a global one for the same term, and term discounts never stack
/// with each other (campaigns are a separate, stackable layer).
#[derive(Clone, Debug)]
pub struct TermDiscount {
    /// ID of this [`TermDiscount`].
    pub id: Id,

    /// ID of the [`category::Category`] this [`TermDiscount`] is scoped to,
    /// if any ([`None`] means all categories).
    pub category_id: Option<category::Id>,

    /// Exact term, in months, this [`TermDiscount`] rewards.
    pub term_months: u32,

    /// [`Discount`] granted by this [`TermDiscount`].
    pub discount: Discount,

    /// Indicator whether this [`TermDiscount`] is in effect.
    pub active: bool,
}

impl TermDiscount {
    /// Indicates whether this [`TermDiscount`] applies to the provided
    /// category and term.
    #[must_use]
    pub fn applies_to(
        &self,
        category_id: category::Id,
        term_months: u32,
    ) -> bool {
        self.active
            && self.term_months == term_months
            && self.category_id.is_none_or(|id| id == category_id)
    }

    /// Picks the best applicable [`TermDiscount`] out of the provided ones.
    ///
    /// "Best" means: applicable to the category and term, with a
    /// category-specific discount preferred over a global one.
    #[must_use]
    pub fn best_for(
        discounts: &[Self],
        category_id: category::Id,
        term_months: u32,
    ) -> Option<&Self> {
        let mut applicable = discounts
            .iter()
            .filter(|d| d.applies_to(category_id, term_months));
        applicable
            .clone()
            .find(|d| d.category_id.is_some())
            .or_else(|| applicable.next())
    }
}

/// ID of a [`TermDiscount`].
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

#[cfg(test)]
mod spec {
    use common::Percent;

    use super::{category, Discount, Id, TermDiscount};

    fn pct(s: &str) -> Discount {
        Discount::Percentage(Percent::new(s.parse().unwrap()).unwrap())
    }

    fn discount(
        category_id: Option<category::Id>,
        term_months: u32,
    ) -> TermDiscount {
        TermDiscount {
            id: Id::new(),
            category_id,
            term_months,
            discount: pct("10"),
            active: true,
        }
    }

    #[test]
    fn category_specific_beats_global_for_the_same_term() {
        let cat = category::Id::new();
        let global = discount(None, 24);
        let specific = discount(Some(cat), 24);

        let pool = [global.clone(), specific.clone()];
        let best = TermDiscount::best_for(&pool, cat, 24).unwrap();
        assert_eq!(best.id, specific.id);

        // Order in the pool must not matter.
        let pool = [specific.clone(), global.clone()];
        let best = TermDiscount::best_for(&pool, cat, 24).unwrap();
        assert_eq!(best.id, specific.id);
    }

    #[test]
    fn term_must_match_exactly() {
        let cat = category::Id::new();
        let pool = [discount(None, 12)];
        assert!(TermDiscount::best_for(&pool, cat, 24).is_none());
        assert!(TermDiscount::best_for(&pool, cat, 12).is_some());
    }

    #[test]
    fn inactive_and_foreign_category_discounts_are_skipped() {
        let cat = category::Id::new();

        let mut inactive = discount(None, 24);
        inactive.active = false;
        assert!(TermDiscount::best_for(&[inactive], cat, 24).is_none());

        let foreign = discount(Some(category::Id::new()), 24);
        assert!(TermDiscount::best_for(&[foreign], cat, 24).is_none());
    }
}
