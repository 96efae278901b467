//! Calendar arithmetic for monthly attendance and payroll.
//!
//! Sunday is the fixed weekly rest day. There is no holiday calendar, so a
//! working day is simply any day of the month that is not a Sunday.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate, Weekday};

/// Working hours in a full day, used to derive the hourly rate.
pub const HOURS_PER_WORKING_DAY: u32 = 8;

/// Weekly rest day that can never be marked as worked.
pub const REST_DAY: Weekday = Weekday::Sun;

/// A calendar month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, rejecting months outside 1-12.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPeriod`] if the pair does not name a real month.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::InvalidPeriod {
                year,
                month: i64::from(month),
            });
        }
        Ok(Self { year, month })
    }

    /// Rebuilds a period from the integer columns stored in the database.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPeriod`] if the stored month is out of range.
    pub fn from_columns(year: i32, month: i32) -> Result<Self> {
        let month = u32::try_from(month).map_err(|_| Error::InvalidPeriod {
            year,
            month: i64::from(month),
        })?;
        Self::new(year, month)
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Month as stored in integer columns.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)] // Month is validated to 1..=12
    pub const fn month_column(self) -> i32 {
        self.month as i32
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // Validated in the constructor
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Number of calendar days in the month.
    #[must_use]
    pub fn days_in_month(self) -> u32 {
        let first = self.first_day();
        let next = first
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(first);
        u32::try_from(next.signed_duration_since(first).num_days()).unwrap_or(0)
    }

    /// The date of `day` in this month, if it exists.
    #[must_use]
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Iterates over every date of the month.
    pub fn dates(self) -> impl Iterator<Item = NaiveDate> {
        (1..=self.days_in_month()).filter_map(move |day| self.date(day))
    }

    /// Whether `day` falls on the weekly rest day.
    #[must_use]
    pub fn is_rest_day(self, day: u32) -> bool {
        self.date(day).is_some_and(|date| date.weekday() == REST_DAY)
    }

    /// Days of the month that are not Sundays, counted by enumerating the calendar.
    #[must_use]
    pub fn working_days(self) -> u32 {
        let count = self.dates().filter(|date| date.weekday() != REST_DAY).count();
        u32::try_from(count).unwrap_or(0)
    }

    /// `month/year` label used on dashboards.
    #[must_use]
    pub fn label(self) -> String {
        format!("{}/{}", self.month, self.year)
    }

    /// Long name such as `March 2024`.
    #[must_use]
    pub fn long_name(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}
