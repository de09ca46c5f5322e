//! Calendar windows
//!
//! A window is the half-open range `[start, end)` of whole calendar days
//! covering one period around a reference date. Weeks start on Monday.

use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use shared::models::ReportPeriod;

use crate::utils::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub period: ReportPeriod,
    /// Date the window was computed for
    pub reference: NaiveDate,
    /// First day in the window
    pub first_day: NaiveDate,
    /// First day after the window
    pub end_day: NaiveDate,
    /// `first_day` 00:00 in millis (inclusive)
    pub start: i64,
    /// `end_day` 00:00 in millis (exclusive)
    pub end: i64,
    tz: Tz,
}

impl PeriodWindow {
    pub fn new(period: ReportPeriod, reference: NaiveDate, tz: Tz) -> Self {
        let (first_day, end_day) = match period {
            ReportPeriod::Day => (reference, reference + Duration::days(1)),
            ReportPeriod::Week => {
                let monday = reference
                    - Duration::days(reference.weekday().num_days_from_monday() as i64);
                (monday, monday + Duration::days(7))
            }
            ReportPeriod::Month => (time::month_start(reference), time::next_month_start(reference)),
            ReportPeriod::Year => {
                let jan1 = reference.with_ordinal(1).unwrap_or(reference);
                let next = NaiveDate::from_ymd_opt(reference.year() + 1, 1, 1).unwrap_or(reference);
                (jan1, next)
            }
        };
        Self {
            period,
            reference,
            first_day,
            end_day,
            start: time::day_start_millis(first_day, tz),
            end: time::day_start_millis(end_day, tz),
            tz,
        }
    }

    /// The immediately preceding calendar period
    pub fn previous(&self) -> Self {
        let last_day_before = self.first_day.pred_opt().unwrap_or(self.first_day);
        Self::new(self.period, last_day_before, self.tz)
    }

    pub fn contains(&self, millis: i64) -> bool {
        self.start <= millis && millis < self.end
    }

    /// Number of calendar days in the window
    pub fn days(&self) -> i64 {
        (self.end_day - self.first_day).num_days()
    }

    /// Multiplier turning a monthly goal into this window's goal
    ///
    /// Day and week are pro-rated by the reference month's length,
    /// a month is one monthly goal and a year is twelve.
    pub fn goal_scale(&self) -> f64 {
        let month_days = time::days_in_month(self.reference) as f64;
        match self.period {
            ReportPeriod::Day => 1.0 / month_days,
            ReportPeriod::Week => 7.0 / month_days,
            ReportPeriod::Month => 1.0,
            ReportPeriod::Year => 12.0,
        }
    }
}
