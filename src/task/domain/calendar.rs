//! Local-calendar boundaries used by due-date validation and date queries.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// Returns the instant at which `date` begins in the time zone `tz`.
///
/// Falls back to UTC midnight when local midnight does not exist (a DST gap).
pub fn start_of_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map_or_else(|| midnight.and_utc(), |start| start.with_timezone(&Utc))
}

/// Returns the start of the day containing `at`, in `at`'s own time zone.
pub fn start_of_day<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Utc> {
    start_of_date(at.date_naive(), &at.timezone())
}

/// Returns the first date of the week containing `date`.
#[must_use]
pub fn week_start_date(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let mut current = date;
    while current.weekday() != first_day {
        let Some(previous) = current.pred_opt() else {
            break;
        };
        current = previous;
    }
    current
}

/// A calendar span of whole local days, `[first, last]` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateSpan {
    /// First day of the span.
    pub first: NaiveDate,
    /// Last day of the span.
    pub last: NaiveDate,
    /// Instant the first day begins.
    pub starts_at: DateTime<Utc>,
    /// Instant the day after `last` begins.
    pub ends_before: DateTime<Utc>,
}

impl LocalDateSpan {
    /// Builds the span of `days` whole days starting at `first` in `tz`.
    pub fn new<Tz: TimeZone>(first: NaiveDate, days: u64, tz: &Tz) -> Self {
        let after = first
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        let last = after.pred_opt().unwrap_or(first);
        Self {
            first,
            last,
            starts_at: start_of_date(first, tz),
            ends_before: start_of_date(after, tz),
        }
    }

    /// The local day containing `at`.
    pub fn day_of<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::new(at.date_naive(), 1, &at.timezone())
    }

    /// The local week containing `at`, beginning on `first_day`.
    pub fn week_of<Tz: TimeZone>(at: &DateTime<Tz>, first_day: Weekday) -> Self {
        let first = week_start_date(at.date_naive(), first_day);
        Self::new(first, 7, &at.timezone())
    }
}
