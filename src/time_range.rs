use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::BillingApiError;

/// Inclusive calendar-date range sent to Cost Explorer as `Start`/`End`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeRange {
    /// Single-day range, start = end = today.
    pub fn today(now: DateTime<Utc>) -> TimeRange {
        let today = now.naive_utc().date();
        TimeRange {
            start: today,
            end: today,
        }
    }

    /// First day of the current month through today.
    pub fn month_to_date(now: DateTime<Utc>) -> Result<TimeRange, BillingApiError> {
        let today = now.naive_utc().date();
        let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .ok_or(BillingApiError::NoneValue)?;
        Ok(TimeRange { start, end: today })
    }

    /// The whole previous calendar month.
    pub fn previous_month(now: DateTime<Utc>) -> Result<TimeRange, BillingApiError> {
        let today = now.naive_utc().date();
        let (year, month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(BillingApiError::NoneValue)?;
        let end = NaiveDate::from_ymd_opt(year, month, Self::last_day_of_month(year, month))
            .ok_or(BillingApiError::NoneValue)?;
        Ok(TimeRange { start, end })
    }

    pub fn start_string(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_string(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    fn last_day_of_month(year: i32, month: u32) -> u32 {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
            .unwrap_or(NaiveDate::from_ymd(year + 1, 1, 1))
            .pred()
            .day()
    }
}
