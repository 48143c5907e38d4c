//! Working-day calendar.
//!
//! This module answers "how many working days lie in [start, end]" for a
//! region, excluding weekends and that region's public holidays. It is pure:
//! nothing here touches the store.

mod easter;
mod region;

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DateSpan, PublicHoliday};

pub use easter::{FIRST_GREGORIAN_YEAR, easter_sunday};
pub use region::{HolidayRule, RegionCalendar};

/// Represents the kind of a calendar day for costing purposes.
///
/// # Example
///
/// ```
/// use vacation_engine::calendar::DayKind;
///
/// assert!(DayKind::Working.is_working());
/// assert!(!DayKind::PublicHoliday.is_working());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// An ordinary working day; costs one day of balance.
    Working,
    /// A weekend day of the region.
    Weekend,
    /// A public holiday of the region (takes precedence over weekend).
    PublicHoliday,
}

impl DayKind {
    /// Returns true for working days.
    pub fn is_working(&self) -> bool {
        *self == DayKind::Working
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKind::Working => write!(f, "Working"),
            DayKind::Weekend => write!(f, "Weekend"),
            DayKind::PublicHoliday => write!(f, "PublicHoliday"),
        }
    }
}

/// Counts working days per region.
///
/// Holds one [`RegionCalendar`] per supported region; asking about any other
/// region fails with [`EngineError::UnsupportedRegion`].
///
/// # Example
///
/// ```
/// use vacation_engine::calendar::WorkingDayCalendar;
/// use chrono::NaiveDate;
///
/// let calendar = WorkingDayCalendar::default();
///
/// // Fri 2021-01-01 is New Year's Day, then a weekend, then Mon 4 and Tue 5.
/// let days = calendar
///     .working_days(
///         "Europe/Paris",
///         NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
///     )
///     .unwrap();
/// assert_eq!(days, 2);
/// ```
#[derive(Debug, Clone)]
pub struct WorkingDayCalendar {
    regions: HashMap<String, RegionCalendar>,
}

impl WorkingDayCalendar {
    /// Creates a calendar supporting exactly the given regions.
    pub fn new(regions: impl IntoIterator<Item = RegionCalendar>) -> Self {
        Self {
            regions: regions
                .into_iter()
                .map(|calendar| (calendar.region.clone(), calendar))
                .collect(),
        }
    }

    /// The supported region identifiers, sorted.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        regions.sort_unstable();
        regions
    }

    /// Returns true if the region has a calendar.
    pub fn supports(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    /// Returns the calendar of a region.
    pub fn region(&self, region: &str) -> EngineResult<&RegionCalendar> {
        self.regions
            .get(region)
            .ok_or_else(|| EngineError::UnsupportedRegion {
                region: region.to_string(),
            })
    }

    /// Counts the days in `[start_date, end_date]`, both inclusive, that are
    /// neither weekend days nor public holidays of `region`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedRegion` if the region has no calendar
    /// - `InvalidDateRange` if `start_date > end_date`
    pub fn working_days(
        &self,
        region: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> EngineResult<u32> {
        let calendar = self.region(region)?;
        let span = DateSpan::new(start_date, end_date)?;
        Ok(calendar.working_days(span))
    }

    /// Same as [`working_days`](Self::working_days) for an already validated span.
    pub fn working_days_in(&self, region: &str, span: DateSpan) -> EngineResult<u32> {
        Ok(self.region(region)?.working_days(span))
    }

    /// Classifies a single date.
    pub fn classify(&self, region: &str, date: NaiveDate) -> EngineResult<DayKind> {
        let calendar = self.region(region)?;
        Ok(if calendar.is_public_holiday(date) {
            DayKind::PublicHoliday
        } else if calendar.is_weekend(date) {
            DayKind::Weekend
        } else {
            DayKind::Working
        })
    }

    /// Returns true if the date costs a day of balance in `region`.
    pub fn is_working_day(&self, region: &str, date: NaiveDate) -> EngineResult<bool> {
        Ok(self.classify(region, date)?.is_working())
    }

    /// The public holidays of `region` falling within `[start_date, end_date]`.
    pub fn holidays_between(
        &self,
        region: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> EngineResult<Vec<PublicHoliday>> {
        let calendar = self.region(region)?;
        let span = DateSpan::new(start_date, end_date)?;
        Ok((span.start_date.year()..=span.end_date.year())
            .flat_map(|year| calendar.holidays_in_year(year))
            .filter(|holiday| span.contains(holiday.date))
            .collect())
    }
}

impl Default for WorkingDayCalendar {
    /// Supports Europe/Paris only.
    fn default() -> Self {
        Self::new([RegionCalendar::europe_paris()])
    }
}
