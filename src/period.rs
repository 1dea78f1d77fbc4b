//! Periods and their resolution into concrete date ranges.
//!
//! Every range is half-open, `[start, end)`, and is computed against a single
//! reference instant supplied by the caller. `handle_turn` reads its
//! [`Clock`] once and threads that instant through, so a turn straddling
//! midnight still resolves every period against the same "now".

use std::sync::LazyLock;

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PennyError, Result};

static SPECIFIC_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{1,2})월([0-9]{1,2})일").unwrap());
static MONTH_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{1,2})월").unwrap());

/// Source of the reference instant for a turn.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Period {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    Custom {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    SpecificDay {
        date: NaiveDate,
    },
    RecentNDays {
        days: u32,
    },
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl Period {
    pub fn custom(start: NaiveDateTime, end: NaiveDateTime) -> Result<Period> {
        if start > end {
            return Err(PennyError::InvalidPeriod(format!(
                "custom range starts at {start} after it ends at {end}"
            )));
        }
        Ok(Period::Custom { start, end })
    }

    pub fn recent_days(days: u32) -> Result<Period> {
        if days == 0 {
            return Err(PennyError::InvalidPeriod(
                "a recent-days period needs at least one day".to_string(),
            ));
        }
        Ok(Period::RecentNDays { days })
    }

    /// The whole calendar month starting at `first`.
    pub fn month_of(first: NaiveDate) -> Period {
        let start = first_of_month(first);
        Period::Custom {
            start: start_of_day(start),
            end: start_of_day(start + Months::new(1)),
        }
    }

    pub fn date_range(&self, now: NaiveDateTime) -> DateRange {
        let today = now.date();
        let tomorrow = today + Duration::days(1);
        let (start, end) = match *self {
            Period::Today => (today, tomorrow),
            Period::Yesterday => (today - Duration::days(1), today),
            Period::ThisWeek => {
                let sunday = week_start(today);
                (sunday, sunday + Duration::days(7))
            }
            Period::LastWeek => {
                let sunday = week_start(today);
                (sunday - Duration::days(7), sunday)
            }
            Period::ThisMonth => {
                let first = first_of_month(today);
                (first, first + Months::new(1))
            }
            Period::LastMonth => {
                let first = first_of_month(today);
                (first - Months::new(1), first)
            }
            Period::ThisYear => {
                let first = first_of_year(today);
                (first, first + Months::new(12))
            }
            Period::LastYear => {
                let first = first_of_year(today);
                (first - Months::new(12), first)
            }
            Period::Custom { start, end } => return DateRange { start, end },
            Period::SpecificDay { date } => (date, date + Duration::days(1)),
            Period::RecentNDays { days } => {
                let back = i64::from(days.max(1)) - 1;
                (today - Duration::days(back), tomorrow)
            }
        };
        DateRange {
            start: start_of_day(start),
            end: start_of_day(end),
        }
    }
}

/// `<month>월<day>일` in the year of `today`. Whitespace is ignored.
/// Impossible calendar dates yield `None`.
pub fn resolve_specific_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let compact = strip_whitespace(text);
    let caps = SPECIFIC_DAY.captures(&compact)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}

/// Whether the text contains a `<month>월<day>일` expression at all, valid or not.
pub fn has_specific_day(text: &str) -> bool {
    SPECIFIC_DAY.is_match(&strip_whitespace(text))
}

/// Whether the text contains a `<month>월` expression, valid or not.
pub fn has_month(text: &str) -> bool {
    MONTH_ONLY.is_match(&strip_whitespace(text))
}

/// `<month>월` in the year of `today`, as the first of that month. Callers
/// try [`resolve_specific_date`] first; this pattern also matches inside a
/// full day expression.
pub fn resolve_month(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let compact = strip_whitespace(text);
    let caps = MONTH_ONLY.captures(&compact)?;
    let month: u32 = caps[1].parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, 1)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

// Weeks start on Sunday.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
