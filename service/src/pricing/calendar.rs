//! Calendar period math.
//!
//! Monthly pricing is calendar-based: a month is a real calendar month, not
//! 30 days. The helpers here split a date span into whole calendar months
//! (or weeks) plus a daily remainder.

use time::Date;

/// Splits the `[start, end)` span into whole calendar months and remainder
/// days.
///
/// A whole month means the same day-of-month one month later, clamped to
/// the month's length (Jan 31st plus one month is Feb 28th/29th).
///
/// Returns `(0, 0)` when `end` is not after `start`.
#[must_use]
pub fn months_and_days(start: Date, end: Date) -> (u32, u32) {
    if end <= start {
        return (0, 0);
    }

    let mut months = 0;
    let mut cursor = start;
    loop {
        let next = add_month(cursor);
        if next > end {
            break;
        }
        cursor = next;
        months += 1;
    }

    let days = u32::try_from((end - cursor).whole_days()).unwrap_or(0);
    (months, days)
}

/// Splits the provided day count into whole 7-day weeks and remainder days.
#[must_use]
pub const fn weeks_and_days(total_days: u32) -> (u32, u32) {
    (total_days / 7, total_days % 7)
}

/// Returns the [`Date`] one calendar month after the provided one, with the
/// day-of-month clamped to the target month's length.
fn add_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        time::Month::December => (date.year() + 1, time::Month::January),
        m => (date.year(), m.next()),
    };
    let day = date.day().min(time::util::days_in_month(month, year));
    // Infallible: the day is clamped to the month's length above.
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

#[cfg(test)]
mod spec {
    use time::macros::date;

    use super::{months_and_days, weeks_and_days};

    #[test]
    fn whole_months_plus_remainder() {
        assert_eq!(
            months_and_days(date!(2025 - 03 - 01), date!(2025 - 05 - 11)),
            (2, 10),
        );
        assert_eq!(
            months_and_days(date!(2025 - 03 - 01), date!(2025 - 04 - 01)),
            (1, 0),
        );
        assert_eq!(
            months_and_days(date!(2025 - 03 - 01), date!(2025 - 03 - 20)),
            (0, 19),
        );
    }

    #[test]
    fn month_lengths_are_calendar_not_thirty_days() {
        // February: exactly one calendar month despite 28 days.
        assert_eq!(
            months_and_days(date!(2025 - 02 - 01), date!(2025 - 03 - 01)),
            (1, 0),
        );
        // Clamping: Jan 31st + 1 month lands on Feb 28th.
        assert_eq!(
            months_and_days(date!(2025 - 01 - 31), date!(2025 - 02 - 28)),
            (1, 0),
        );
    }

    #[test]
    fn year_boundary() {
        assert_eq!(
            months_and_days(date!(2024 - 12 - 15), date!(2025 - 01 - 15)),
            (1, 0),
        );
        assert_eq!(
            months_and_days(date!(2024 - 01 - 01), date!(2026 - 01 - 01)),
            (24, 0),
        );
    }

    #[test]
    fn degenerate_spans() {
        assert_eq!(
            months_and_days(date!(2025 - 03 - 01), date!(2025 - 03 - 01)),
            (0, 0),
        );
        assert_eq!(
            months_and_days(date!(2025 - 03 - 02), date!(2025 - 03 - 01)),
            (0, 0),
        );
    }

    #[test]
    fn weeks_split() {
        assert_eq!(weeks_and_days(10), (1, 3));
        assert_eq!(weeks_and_days(7), (1, 0));
        assert_eq!(weeks_and_days(6), (0, 6));
        assert_eq!(weeks_and_days(0), (0, 0));
    }
}
