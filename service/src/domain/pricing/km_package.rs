//! [`KmPackage`] definitions.

use common::Money;
use derive_more::{Display, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::{rental, vehicle::Kilometers};

/// Flat kilometer allowance package.
///
/// The simple alternative to a tiered [`KmBundle`]: one allowance, one flat
/// rate beyond it, or unlimited mileage altogether.
///
/// [`KmBundle`]: super::KmBundle
#[derive(Clone, Debug)]
pub struct KmPackage {
    /// ID of this [`KmPackage`].
    pub id: Id,

    /// Free kilometer allowance of this [`KmPackage`].
    pub included_km: Kilometers,

    /// Price of every kilometer driven beyond the allowance.
    pub extra_km_price: Money,

    /// Indicator whether this [`KmPackage`] grants unlimited mileage.
    pub unlimited: bool,

    /// [`rental::Kind`]s this [`KmPackage`] applies to.
    pub applicable_rental_kinds: Vec<rental::Kind>,

    /// Indicator whether this [`KmPackage`] is in effect.
    pub active: bool,
}

impl KmPackage {
    /// Indicates whether this [`KmPackage`] applies to the provided
    /// [`rental::Kind`].
    #[must_use]
    pub fn is_applicable_for(&self, kind: rental::Kind) -> bool {
        self.active && self.applicable_rental_kinds.contains(&kind)
    }

    /// Returns the cost of the kilometers driven beyond the allowance of
    /// this [`KmPackage`].
    ///
    /// Zero when this [`KmPackage`] is unlimited or `actual_km` is within
    /// the allowance.
    #[must_use]
    pub fn extra_km_cost(&self, actual_km: Kilometers) -> Money {
        if self.unlimited {
            return Money::zero(self.extra_km_price.currency);
        }
        self.extra_km_price * actual_km.saturating_sub(self.included_km)
    }
}

/// ID of a [`KmPackage`].
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
    use common::{Currency, Money};

    use super::{rental, Id, KmPackage};

    fn try_lira(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Try)
    }

    fn package() -> KmPackage {
        KmPackage {
            id: Id::new(),
            included_km: 2_000,
            extra_km_price: try_lira("1.5"),
            unlimited: false,
            applicable_rental_kinds: vec![
                rental::Kind::Monthly,
                rental::Kind::Leasing,
            ],
            active: true,
        }
    }

    #[test]
    fn flat_overage() {
        let p = package();
        assert_eq!(p.extra_km_cost(2_500), try_lira("750"));
        assert_eq!(p.extra_km_cost(2_000), try_lira("0"));
        assert_eq!(p.extra_km_cost(0), try_lira("0"));
    }

    #[test]
    fn unlimited_short_circuits() {
        let mut p = package();
        p.unlimited = true;
        assert_eq!(p.extra_km_cost(1_000_000), try_lira("0"));
    }

    #[test]
    fn applicability_by_rental_kind() {
        let p = package();
        assert!(p.is_applicable_for(rental::Kind::Leasing));
        assert!(!p.is_applicable_for(rental::Kind::Daily));

        let mut inactive = package();
        inactive.active = false;
        assert!(!inactive.is_applicable_for(rental::Kind::Leasing));
    }
}
