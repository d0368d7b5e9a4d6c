//! Leasing billing definitions.
//!
//! Long-term leases are billed per calendar month: an odometer capture
//! ([`KmRecord`]) per period, an [`Invoice`] built from it, and an optional
//! [`EarlyTermination`] request ending the contract ahead of its term.

pub mod early_termination;
pub mod invoice;
pub mod km_record;

use std::str::FromStr;

use derive_more::Display;
use time::{Date, Month};

#[doc(inline)]
pub use self::{
    early_termination::EarlyTermination, invoice::Invoice, km_record::KmRecord,
};

/// Calendar month a leasing record or invoice belongs to.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{year:04}-{:02}", *month as u8)]
pub struct Period {
    /// Calendar year of this [`Period`].
    pub year: i32,

    /// Calendar month of this [`Period`].
    pub month: Month,
}

impl Period {
    /// Creates a new [`Period`] of the provided year and month.
    #[must_use]
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Returns the [`Period`] the provided [`Date`] falls into.
    #[must_use]
    pub const fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the number of whole months from the `earlier` [`Period`] to
    /// this one, or [`None`] if this one precedes it.
    #[must_use]
    pub fn months_since(self, earlier: Self) -> Option<u32> {
        let months = (self.year - earlier.year) * 12
            + (i32::from(self.month as u8) - i32::from(earlier.month as u8));
        u32::try_from(months).ok()
    }

    /// Returns the [`Period`] following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self.month {
            Month::December => Self {
                year: self.year + 1,
                month: Month::January,
            },
            m => Self {
                year: self.year,
                month: m.next(),
            },
        }
    }
}

impl FromStr for Period {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ERR: &str = "invalid `Period`, expected `YYYY-MM`";

        let (year, month) = s.split_once('-').ok_or(ERR)?;
        let year = year.parse().map_err(|_| ERR)?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(ERR)?;
        Ok(Self { year, month })
    }
}

#[cfg(test)]
mod spec {
    use time::{macros::date, Month};

    use super::Period;

    #[test]
    fn next_rolls_over_the_year() {
        let dec = Period::new(2025, Month::December);
        assert_eq!(dec.next(), Period::new(2026, Month::January));
        assert_eq!(
            Period::new(2025, Month::March).next(),
            Period::new(2025, Month::April),
        );
    }

    #[test]
    fn displays_and_parses_as_year_month() {
        let p = Period::of(date!(2025 - 03 - 15));
        assert_eq!(p.to_string(), "2025-03");
        assert_eq!("2025-03".parse::<Period>().unwrap(), p);
        assert!("2025-13".parse::<Period>().is_err());
        assert!("garbage".parse::<Period>().is_err());
    }

    #[test]
    fn counts_months_since_an_earlier_period() {
        let start = Period::new(2026, Month::January);
        assert_eq!(start.months_since(start), Some(0));
        assert_eq!(
            Period::new(2026, Month::March).months_since(start),
            Some(2),
        );
        assert_eq!(
            Period::new(2027, Month::February).months_since(start),
            Some(13),
        );
        assert_eq!(
            Period::new(2025, Month::December).months_since(start),
            None,
        );
    }

    #[test]
    fn orders_chronologically() {
        assert!(Period::new(2025, Month::December) < Period::new(2026, Month::January));
        assert!(Period::new(2025, Month::March) < Period::new(2025, Month::April));
    }
}
