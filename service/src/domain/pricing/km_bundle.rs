//! [`KmBundle`] definitions.
//!
//! [`KmBundle`]s are catalogue data: operators shape tiered tariffs here and
//! price against them from the host application. The built-in billing paths
//! charge the flat per-km rates carried on [`CustomerContract`]s and
//! [`KmPackage`]s instead.
//!
//! [`CustomerContract`]: crate::domain::CustomerContract
//! [`KmPackage`]: super::KmPackage

use common::{Currency, Money};
use derive_more::{Display, Error, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::vehicle::Kilometers;

/// Incremental per-kilometer pricing schedule.
///
/// A [`KmBundle`] grants a free [`included_km`] allowance and prices every
/// kilometer beyond it by walking its [`KmPricingTier`]s in order, charging
/// each consumed kilometer at the rate of the tier it falls into.
///
/// [`included_km`]: KmBundle::included_km
#[derive(Clone, Debug)]
pub struct KmBundle {
    /// ID of this [`KmBundle`].
    pub id: Id,

    /// [`Currency`] all charges of this [`KmBundle`] are in.
    pub currency: Currency,

    /// Free kilometer allowance before any tier is charged.
    pub included_km: Kilometers,

    /// Ordered [`KmPricingTier`]s of this [`KmBundle`].
    tiers: Vec<KmPricingTier>,
}

impl KmBundle {
    /// Creates a new [`KmBundle`] out of the provided tiers.
    ///
    /// The tiers are sorted by their [`sort_order`] and validated to form a
    /// contiguous ascending schedule: starting at 0 km, each tier picking up
    /// exactly where the previous one ends, only the last tier unbounded
    /// (and it must be unbounded, so every distance is priceable). An empty
    /// schedule is allowed and prices everything at zero.
    ///
    /// [`sort_order`]: KmPricingTier::sort_order
    ///
    /// # Errors
    ///
    /// If the tiers don't form such a schedule, or any tier's price is not
    /// in the provided [`Currency`].
    pub fn new(
        id: Id,
        currency: Currency,
        included_km: Kilometers,
        mut tiers: Vec<KmPricingTier>,
    ) -> Result<Self, TiersError> {
        use TiersError as E;

        tiers.sort_by_key(|t| t.sort_order);

        let mut expected_from = 0;
        for (i, tier) in tiers.iter().enumerate() {
            if tier.price_per_km.currency != currency {
                return Err(E::CurrencyMismatch {
                    expected: currency,
                    found: tier.price_per_km.currency,
                });
            }
            if tier.from_km != expected_from {
                return Err(E::NotContiguous {
                    expected_from,
                    found_from: tier.from_km,
                });
            }
            match tier.to_km {
                Some(to) if to <= tier.from_km => {
                    return Err(E::EmptyRange {
                        from_km: tier.from_km,
                        to_km: to,
                    });
                }
                Some(to) => {
                    if i == tiers.len() - 1 {
                        return Err(E::BoundedTail { to_km: to });
                    }
                    expected_from = to;
                }
                None => {
                    if i != tiers.len() - 1 {
                        return Err(E::UnboundedNotLast {
                            from_km: tier.from_km,
                        });
                    }
                }
            }
        }

        Ok(Self {
            id,
            currency,
            included_km,
            tiers,
        })
    }

    /// Returns the ordered [`KmPricingTier`]s of this [`KmBundle`].
    #[must_use]
    pub fn tiers(&self) -> &[KmPricingTier] {
        &self.tiers
    }

    /// Returns the cost of the kilometers driven beyond the allowance of
    /// this [`KmBundle`].
    ///
    /// Zero when `total_km` is within the allowance or the schedule is
    /// empty.
    #[must_use]
    pub fn extra_km_cost(&self, total_km: Kilometers) -> Money {
        self.extra_km_breakdown(total_km)
            .into_iter()
            .fold(Money::zero(self.currency), |sum, charge| sum + charge.cost)
    }

    /// Returns one [`TierCharge`] per [`KmPricingTier`] touched by the
    /// kilometers driven beyond the allowance of this [`KmBundle`].
    #[must_use]
    pub fn extra_km_breakdown(&self, total_km: Kilometers) -> Vec<TierCharge> {
        let mut remaining = total_km.saturating_sub(self.included_km);
        let mut charges = Vec::new();

        for tier in &self.tiers {
            if remaining == 0 {
                break;
            }
            let km = match tier.to_km {
                Some(to) => remaining.min(to - tier.from_km),
                None => remaining,
            };
            charges.push(TierCharge {
                from_km: tier.from_km,
                to_km: tier.to_km,
                km,
                price_per_km: tier.price_per_km,
                cost: tier.price_per_km * km,
            });
            remaining -= km;
        }

        charges
    }
}

/// Single tier of a [`KmBundle`] schedule.
#[derive(Clone, Copy, Debug)]
pub struct KmPricingTier {
    /// Kilometer this tier starts at (inclusive), counted from the first
    /// kilometer beyond the allowance.
    pub from_km: Kilometers,

    /// Kilometer this tier ends at (exclusive), or [`None`] if unbounded.
    pub to_km: Option<Kilometers>,

    /// Price of every kilometer falling into this tier.
    pub price_per_km: Money,

    /// Position of this tier in the schedule.
    pub sort_order: u32,
}

/// Charge incurred within a single [`KmPricingTier`].
#[derive(Clone, Copy, Debug)]
pub struct TierCharge {
    /// Kilometer the tier starts at.
    pub from_km: Kilometers,

    /// Kilometer the tier ends at, or [`None`] if unbounded.
    pub to_km: Option<Kilometers>,

    /// Kilometers charged within the tier.
    pub km: Kilometers,

    /// Price of every charged kilometer.
    pub price_per_km: Money,

    /// Total cost of the charged kilometers.
    pub cost: Money,
}

/// ID of a [`KmBundle`].
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

/// Error of validating a [`KmBundle`] tier schedule.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum TiersError {
    /// A tier's price is not in the [`KmBundle`]'s [`Currency`].
    #[display("tier priced in `{found}` in a `{expected}` bundle")]
    CurrencyMismatch {
        /// [`Currency`] of the [`KmBundle`].
        expected: Currency,

        /// [`Currency`] the offending tier is priced in.
        found: Currency,
    },

    /// A tier doesn't start where the previous one ends.
    #[display("tier starts at {found_from} km, expected {expected_from} km")]
    NotContiguous {
        /// Kilometer the tier is expected to start at.
        expected_from: Kilometers,

        /// Kilometer the offending tier starts at.
        found_from: Kilometers,
    },

    /// A tier ends at or before its start.
    #[display("tier {from_km}..{to_km} km covers no distance")]
    EmptyRange {
        /// Kilometer the offending tier starts at.
        from_km: Kilometers,

        /// Kilometer the offending tier ends at.
        to_km: Kilometers,
    },

    /// An unbounded tier is followed by further tiers.
    #[display("unbounded tier at {from_km} km is not the last one")]
    UnboundedNotLast {
        /// Kilometer the offending tier starts at.
        from_km: Kilometers,
    },

    /// The last tier is bounded, leaving distances beyond it unpriceable.
    #[display("last tier ends at {to_km} km, leaving the schedule bounded")]
    BoundedTail {
        /// Kilometer the last tier ends at.
        to_km: Kilometers,
    },
}

#[cfg(test)]
mod spec {
    use common::{Currency, Money};

    use super::{Id, KmBundle, KmPricingTier, TiersError};

    fn try_lira(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Try)
    }

    fn tier(
        from_km: u32,
        to_km: Option<u32>,
        price: &str,
        sort_order: u32,
    ) -> KmPricingTier {
        KmPricingTier {
            from_km,
            to_km,
            price_per_km: try_lira(price),
            sort_order,
        }
    }

    fn bundle(included_km: u32) -> KmBundle {
        KmBundle::new(
            Id::new(),
            Currency::Try,
            included_km,
            vec![
                tier(0, Some(1000), "2", 1),
                tier(1000, None, "1.5", 2),
            ],
        )
        .unwrap()
    }

    #[test]
    fn two_tier_overage() {
        // 6500 km against a 5000 km allowance: 1000 km at 2 TRY, then
        // 500 km at 1.5 TRY.
        let b = bundle(5000);
        assert_eq!(b.extra_km_cost(6500), try_lira("2750"));

        let breakdown = b.extra_km_breakdown(6500);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].km, 1000);
        assert_eq!(breakdown[0].cost, try_lira("2000"));
        assert_eq!(breakdown[1].km, 500);
        assert_eq!(breakdown[1].cost, try_lira("750"));
    }

    #[test]
    fn within_allowance_is_free() {
        let b = bundle(5000);
        assert_eq!(b.extra_km_cost(5000), try_lira("0"));
        assert_eq!(b.extra_km_cost(0), try_lira("0"));
        assert!(b.extra_km_breakdown(4999).is_empty());
    }

    #[test]
    fn empty_schedule_prices_everything_at_zero() {
        let b =
            KmBundle::new(Id::new(), Currency::Try, 1000, vec![]).unwrap();
        assert_eq!(b.extra_km_cost(1_000_000), try_lira("0"));
    }

    #[test]
    fn cost_is_monotonic_in_distance() {
        let b = bundle(5000);
        let mut prev = b.extra_km_cost(0);
        for km in (500..12_000).step_by(500) {
            let cost = b.extra_km_cost(km);
            assert!(cost >= prev, "cost dropped at {km} km");
            prev = cost;
        }
    }

    #[test]
    fn tiers_are_ordered_by_sort_order_not_input_order() {
        let b = KmBundle::new(
            Id::new(),
            Currency::Try,
            0,
            vec![
                tier(1000, None, "1.5", 2),
                tier(0, Some(1000), "2", 1),
            ],
        )
        .unwrap();
        assert_eq!(b.extra_km_cost(1500), try_lira("2750"));
    }

    #[test]
    fn gap_and_overlap_are_rejected() {
        let gap = KmBundle::new(
            Id::new(),
            Currency::Try,
            0,
            vec![tier(0, Some(1000), "2", 1), tier(1500, None, "1.5", 2)],
        );
        assert!(matches!(
            gap.unwrap_err(),
            TiersError::NotContiguous {
                expected_from: 1000,
                found_from: 1500,
            },
        ));

        let overlap = KmBundle::new(
            Id::new(),
            Currency::Try,
            0,
            vec![tier(0, Some(1000), "2", 1), tier(500, None, "1.5", 2)],
        );
        assert!(overlap.is_err());
    }

    #[test]
    fn bounded_tail_and_misplaced_unbounded_are_rejected() {
        let bounded = KmBundle::new(
            Id::new(),
            Currency::Try,
            0,
            vec![tier(0, Some(1000), "2", 1)],
        );
        assert!(matches!(
            bounded.unwrap_err(),
            TiersError::BoundedTail { to_km: 1000 },
        ));

        let misplaced = KmBundle::new(
            Id::new(),
            Currency::Try,
            0,
            vec![tier(0, None, "2", 1), tier(1000, None, "1.5", 2)],
        );
        assert!(matches!(
            misplaced.unwrap_err(),
            TiersError::UnboundedNotLast { from_km: 0 },
        ));
    }
}
