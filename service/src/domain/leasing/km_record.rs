//! [`KmRecord`] definitions.

use common::{unit, DateTimeOf};
use derive_more::{Display, Error, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::{contract, leasing::Period, vehicle::Kilometers};
#[cfg(doc)]
use common::DateTime;

/// Monthly odometer capture of a leased vehicle.
///
/// One [`KmRecord`] exists per contract per calendar [`Period`]. Unused
/// allowance rolls over into the next period; usage beyond the effective
/// allowance is the excess the period's invoice charges for.
#[derive(Clone, Debug)]
pub struct KmRecord {
    /// ID of this [`KmRecord`].
    pub id: Id,

    /// ID of the [`contract::CustomerContract`] this [`KmRecord`] belongs
    /// to.
    pub contract_id: contract::Id,

    /// Calendar [`Period`] this [`KmRecord`] covers.
    pub period: Period,

    /// Odometer reading at the start of the period.
    pub previous_odometer_km: Kilometers,

    /// Odometer reading at the end of the period.
    pub current_odometer_km: Kilometers,

    /// Kilometers driven within the period.
    pub used_km: Kilometers,

    /// Monthly allowance of the contract at capture time.
    pub monthly_allowance_km: Kilometers,

    /// Unused allowance carried in from the previous period.
    pub rollover_in_km: Kilometers,

    /// Kilometers driven beyond the effective allowance.
    pub excess_km: Kilometers,

    /// Unused allowance carried out into the next period.
    pub rollover_out_km: Kilometers,

    /// [`DateTime`] when this [`KmRecord`] was captured.
    pub captured_at: CaptureDateTime,
}

impl KmRecord {
    /// Captures a new [`KmRecord`] for the provided period.
    ///
    /// The effective allowance is the monthly allowance plus the rollover
    /// carried in from the previous period. Usage beyond it becomes
    /// [`excess_km`] (and nothing rolls over); usage within it rolls the
    /// remainder over into the next period.
    ///
    /// [`excess_km`]: KmRecord::excess_km
    ///
    /// # Errors
    ///
    /// If `current_odometer_km` is below `previous_odometer_km` (odometers
    /// are monotonic).
    pub fn capture(
        contract_id: contract::Id,
        period: Period,
        previous_odometer_km: Kilometers,
        current_odometer_km: Kilometers,
        monthly_allowance_km: Kilometers,
        rollover_in_km: Kilometers,
    ) -> Result<Self, CaptureError> {
        if current_odometer_km < previous_odometer_km {
            return Err(CaptureError {
                previous: previous_odometer_km,
                current: current_odometer_km,
            });
        }

        let used_km = current_odometer_km - previous_odometer_km;
        let effective_allowance = monthly_allowance_km + rollover_in_km;
        let (excess_km, rollover_out_km) = if used_km > effective_allowance {
            (used_km - effective_allowance, 0)
        } else {
            (0, effective_allowance - used_km)
        };

        Ok(Self {
            id: Id::new(),
            contract_id,
            period,
            previous_odometer_km,
            current_odometer_km,
            used_km,
            monthly_allowance_km,
            rollover_in_km,
            excess_km,
            rollover_out_km,
            captured_at: CaptureDateTime::now(),
        })
    }
}

/// ID of a [`KmRecord`].
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

/// Error of capturing a [`KmRecord`] with a regressing odometer reading.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display(
    "odometer reading {current} km is below the previously recorded \
     {previous} km"
)]
pub struct CaptureError {
    /// Previously recorded odometer reading.
    pub previous: Kilometers,

    /// Rejected new reading.
    pub current: Kilometers,
}

/// [`DateTime`] when a [`KmRecord`] was captured.
pub type CaptureDateTime = DateTimeOf<(KmRecord, unit::Creation)>;

#[cfg(test)]
mod spec {
    use time::Month;

    use super::{contract, KmRecord, Period};

    #[test]
    fn usage_within_allowance_rolls_over() {
        let r = KmRecord::capture(
            contract::Id::new(),
            Period::new(2025, Month::March),
            10_000,
            11_500,
            2_000,
            0,
        )
        .unwrap();

        assert_eq!(r.used_km, 1_500);
        assert_eq!(r.excess_km, 0);
        assert_eq!(r.rollover_out_km, 500);
    }

    #[test]
    fn excess_consumes_rollover_first() {
        // 2000 monthly + 500 rolled in = 2500 effective; 2600 used.
        let r = KmRecord::capture(
            contract::Id::new(),
            Period::new(2025, Month::April),
            11_500,
            14_100,
            2_000,
            500,
        )
        .unwrap();

        assert_eq!(r.used_km, 2_600);
        assert_eq!(r.excess_km, 100);
        assert_eq!(r.rollover_out_km, 0);
    }

    #[test]
    fn exact_allowance_usage_leaves_nothing() {
        let r = KmRecord::capture(
            contract::Id::new(),
            Period::new(2025, Month::May),
            14_100,
            16_100,
            2_000,
            0,
        )
        .unwrap();

        assert_eq!(r.excess_km, 0);
        assert_eq!(r.rollover_out_km, 0);
    }

    #[test]
    fn odometer_regression_is_rejected() {
        let err = KmRecord::capture(
            contract::Id::new(),
            Period::new(2025, Month::June),
            16_100,
            16_000,
            2_000,
            0,
        )
        .unwrap_err();

        assert_eq!(err.previous, 16_100);
        assert_eq!(err.current, 16_000);
    }

    #[test]
    fn rollover_chain_across_periods() {
        let contract_id = contract::Id::new();
        let first = KmRecord::capture(
            contract_id,
            Period::new(2025, Month::January),
            0,
            1_200,
            2_000,
            0,
        )
        .unwrap();
        assert_eq!(first.rollover_out_km, 800);

        let second = KmRecord::capture(
            contract_id,
            first.period.next(),
            first.current_odometer_km,
            4_500,
            2_000,
            first.rollover_out_km,
        )
        .unwrap();
        assert_eq!(second.used_km, 3_300);
        assert_eq!(second.excess_km, 500);
        assert_eq!(second.rollover_out_km, 0);
    }
}
