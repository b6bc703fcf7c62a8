//! Statistics week-window computation.

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive statistics window covering one week.
///
/// The window runs from the configured week-start day at 00:00:00 UTC
/// through six days later at 23:59:59 UTC, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl WeekWindow {
    /// Computes the window containing `instant` for a week starting on
    /// `week_start`.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>, week_start: Weekday) -> Self {
        let days_into_week = instant.weekday().days_since(week_start);
        let start_date = instant
            .date_naive()
            .checked_sub_days(Days::new(u64::from(days_into_week)))
            .unwrap_or_else(|| instant.date_naive());
        let start = start_date.and_time(NaiveTime::MIN).and_utc();
        let end = start + TimeDelta::days(7) - TimeDelta::seconds(1);
        Self { start, end }
    }

    /// Returns the inclusive window start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the inclusive window end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns whether `instant` falls within the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}
