//! [`Campaign`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
use time::Date;
use uuid::Uuid;

use crate::domain::{category, pricing::Discount, rental};

/// Time- and scope-bounded promotional discount.
///
/// Unlike [`TermDiscount`]s, [`Campaign`]s stack: every applicable one
/// contributes its own amount, computed against the original base price and
/// summed, never compounded.
///
/// [`TermDiscount`]: super::TermDiscount
#[derive(Clone, Debug)]
pub struct Campaign {
    /// ID of this [`Campaign`].
    pub id: Id,

    /// [`Name`] of this [`Campaign`].
    pub name: Name,

    /// [`Discount`] granted by this [`Campaign`].
    pub discount: Discount,

    /// [`rental::Kind`]s this [`Campaign`] applies to.
    pub applicable_rental_kinds: Vec<rental::Kind>,

    /// First day this [`Campaign`] is valid on.
    pub valid_from: Date,

    /// Last day this [`Campaign`] is valid on.
    pub valid_to: Date,

    /// Minimum term, in months, required to qualify, if any.
    pub min_term_months: Option<u32>,

    /// ID of the [`category::Category`] this [`Campaign`] is scoped to, if
    /// any ([`None`] means all categories).
    pub category_id: Option<category::Id>,

    /// Indicator whether this [`Campaign`] is in effect.
    pub active: bool,
}

impl Campaign {
    /// Indicates whether this [`Campaign`] applies to a quote of the
    /// provided shape.
    #[must_use]
    pub fn applies_to(
        &self,
        kind: rental::Kind,
        category_id: category::Id,
        on: Date,
        term_months: u32,
    ) -> bool {
        self.active
            && self.applicable_rental_kinds.contains(&kind)
            && self.valid_from <= on
            && on <= self.valid_to
            && self.category_id.is_none_or(|id| id == category_id)
            && self.min_term_months.is_none_or(|min| min <= term_months)
    }
}

/// ID of a [`Campaign`].
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

/// Name of a [`Campaign`], as shown on quotes and invoices.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

#[cfg(test)]
mod spec {
    use common::Percent;
    use time::macros::date;

    use super::{category, rental, Campaign, Discount, Id, Name};

    fn campaign() -> Campaign {
        Campaign {
            id: Id::new(),
            name: Name::new("Spring Leasing").unwrap(),
            discount: Discount::Percentage(
                Percent::new("10".parse().unwrap()).unwrap(),
            ),
            applicable_rental_kinds: vec![rental::Kind::Leasing],
            valid_from: date!(2025 - 03 - 01),
            valid_to: date!(2025 - 05 - 31),
            min_term_months: Some(12),
            category_id: None,
            active: true,
        }
    }

    #[test]
    fn applies_inside_scope() {
        let c = campaign();
        let cat = category::Id::new();
        assert!(c.applies_to(
            rental::Kind::Leasing,
            cat,
            date!(2025 - 04 - 15),
            24,
        ));
    }

    #[test]
    fn every_gate_rejects_on_its_own() {
        let c = campaign();
        let cat = category::Id::new();
        let on = date!(2025 - 04 - 15);

        assert!(!c.applies_to(rental::Kind::Daily, cat, on, 24));
        assert!(!c.applies_to(
            rental::Kind::Leasing,
            cat,
            date!(2025 - 06 - 01),
            24,
        ));
        assert!(!c.applies_to(rental::Kind::Leasing, cat, on, 6));

        let mut inactive = campaign();
        inactive.active = false;
        assert!(!inactive.applies_to(rental::Kind::Leasing, cat, on, 24));

        let mut scoped = campaign();
        scoped.category_id = Some(category::Id::new());
        assert!(!scoped.applies_to(rental::Kind::Leasing, cat, on, 24));
    }
}
