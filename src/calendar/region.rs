//! Region calendars: which weekdays are weekend and which dates are public holidays.
//!
//! A region is a table of [`HolidayRule`]s plus a weekend definition. Supporting
//! a new region means adding a table (in code or as a YAML file under
//! `config/regions/`), never a new algorithm.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use super::easter::easter_sunday;
use crate::models::{DEFAULT_REGION, DateSpan, PublicHoliday};

/// How a single public holiday is placed in a given year.
///
/// Deserialized from YAML with a `kind` tag:
///
/// ```yaml
/// - kind: fixed
///   name: Bastille Day
///   month: 7
///   day: 14
/// - kind: easter_offset
///   name: Whit Monday
///   offset_days: 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HolidayRule {
    /// Same month and day every year.
    Fixed {
        /// Holiday name.
        name: String,
        /// Month, 1-12.
        month: u32,
        /// Day of month.
        day: u32,
    },
    /// A fixed number of days after (or before, if negative) Easter Sunday.
    EasterOffset {
        /// Holiday name.
        name: String,
        /// Days relative to Easter Sunday.
        offset_days: i64,
    },
}

impl HolidayRule {
    /// Creates a fixed-date rule.
    pub fn fixed(name: impl Into<String>, month: u32, day: u32) -> Self {
        HolidayRule::Fixed {
            name: name.into(),
            month,
            day,
        }
    }

    /// Creates an Easter-relative rule.
    pub fn easter_offset(name: impl Into<String>, offset_days: i64) -> Self {
        HolidayRule::EasterOffset {
            name: name.into(),
            offset_days,
        }
    }

    /// The holiday's name.
    pub fn name(&self) -> &str {
        match self {
            HolidayRule::Fixed { name, .. } | HolidayRule::EasterOffset { name, .. } => name,
        }
    }

    /// The date the holiday falls on in `year`, if it exists that year.
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        match self {
            HolidayRule::Fixed { month, day, .. } => NaiveDate::from_ymd_opt(year, *month, *day),
            HolidayRule::EasterOffset { offset_days, .. } => {
                let easter = easter_sunday(year)?;
                easter.checked_add_signed(TimeDelta::try_days(*offset_days)?)
            }
        }
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn default_weekend() -> Vec<Weekday> {
    vec![Weekday::Sat, Weekday::Sun]
}

/// The working-day policy of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCalendar {
    /// Region identifier (e.g., "Europe/Paris").
    pub region: String,
    /// Days of the week that are never worked.
    #[serde(default = "default_weekend")]
    pub weekend: Vec<Weekday>,
    /// Recurring public holidays.
    #[serde(default)]
    pub holidays: Vec<HolidayRule>,
}

impl RegionCalendar {
    /// The French national calendar, used for the Europe/Paris region.
    pub fn europe_paris() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            weekend: default_weekend(),
            holidays: vec![
                HolidayRule::fixed("New Year's Day", 1, 1),
                HolidayRule::easter_offset("Easter Monday", 1),
                HolidayRule::fixed("Labour Day", 5, 1),
                HolidayRule::fixed("Victory in Europe Day", 5, 8),
                HolidayRule::easter_offset("Ascension Day", 39),
                HolidayRule::easter_offset("Whit Monday", 50),
                HolidayRule::fixed("Bastille Day", 7, 14),
                HolidayRule::fixed("Assumption of Mary", 8, 15),
                HolidayRule::fixed("All Saints' Day", 11, 1),
                HolidayRule::fixed("Armistice Day", 11, 11),
                HolidayRule::fixed("Christmas Day", 12, 25),
            ],
        }
    }

    /// Returns true if the date falls on a weekend day.
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend.contains(&date.weekday())
    }

    /// Returns the holiday falling on `date`, if any.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&HolidayRule> {
        self.holidays
            .iter()
            .find(|rule| rule.date_in(date.year()) == Some(date))
    }

    /// Returns true if the date is a public holiday.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_on(date).is_some()
    }

    /// All holidays of `year`, sorted by date.
    pub fn holidays_in_year(&self, year: i32) -> Vec<PublicHoliday> {
        let mut holidays: Vec<PublicHoliday> = self
            .holidays
            .iter()
            .filter_map(|rule| {
                rule.date_in(year).map(|date| PublicHoliday {
                    date,
                    name: rule.name().to_string(),
                    region: self.region.clone(),
                })
            })
            .collect();
        holidays.sort_by_key(|holiday| holiday.date);
        holidays
    }

    /// Checks that every holiday rule can place a date.
    ///
    /// Fixed rules are checked against a leap year, so Feb 29 is accepted.
    pub fn validate(&self) -> Result<(), String> {
        for rule in &self.holidays {
            match rule {
                HolidayRule::Fixed { name, month, day } => {
                    if NaiveDate::from_ymd_opt(2000, *month, *day).is_none() {
                        return Err(format!(
                            "holiday '{}' has no valid date (month {}, day {})",
                            name, month, day
                        ));
                    }
                }
                HolidayRule::EasterOffset { name, offset_days } => {
                    if TimeDelta::try_days(*offset_days).is_none() {
                        return Err(format!(
                            "holiday '{}' has an out-of-range Easter offset ({} days)",
                            name, offset_days
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Counts the days of `span` that are neither weekend nor holiday.
    ///
    /// Whole weeks are counted arithmetically, so the cost grows with the
    /// number of years in the span, not the number of days.
    pub fn working_days(&self, span: DateSpan) -> u32 {
        let total = span.len_days();
        let weekend_per_week = WEEK.iter().filter(|day| self.weekend.contains(day)).count() as i64;
        let mut working = total / 7 * (7 - weekend_per_week);

        // Leftover days, walking back from the end
        let mut weekday = span.end_date.weekday();
        for _ in 0..total % 7 {
            if !self.weekend.contains(&weekday) {
                working += 1;
            }
            weekday = weekday.pred();
        }

        let holidays: i64 = (span.start_date.year()..=span.end_date.year())
            .map(|year| {
                let mut dates: Vec<NaiveDate> = self
                    .holidays
                    .iter()
                    .filter_map(|rule| rule.date_in(year))
                    .filter(|date| {
                        date.year() == year && span.contains(*date) && !self.is_weekend(*date)
                    })
                    .collect();
                dates.sort_unstable();
                dates.dedup();
                dates.len() as i64
            })
            .sum();

        u32::try_from(working - holidays).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(start: NaiveDate, end: NaiveDate) -> DateSpan {
        DateSpan::new(start, end).unwrap()
    }

    #[test]
    fn test_fixed_rule_date() {
        let rule = HolidayRule::fixed("Bastille Day", 7, 14);
        assert_eq!(rule.date_in(2021), Some(date(2021, 7, 14)));
        assert_eq!(rule.name(), "Bastille Day");
    }

    #[test]
    fn test_fixed_rule_for_missing_day_is_none() {
        let rule = HolidayRule::fixed("Leap Day", 2, 29);
        assert_eq!(rule.date_in(2021), None);
        assert_eq!(rule.date_in(2024), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_easter_offsets_2021() {
        let paris = RegionCalendar::europe_paris();
        // Easter Sunday 2021 is April 4
        assert!(paris.is_public_holiday(date(2021, 4, 5))); // Easter Monday
        assert!(paris.is_public_holiday(date(2021, 5, 13))); // Ascension
        assert!(paris.is_public_holiday(date(2021, 5, 24))); // Whit Monday
        assert!(!paris.is_public_holiday(date(2021, 4, 4)));
    }

    #[test]
    fn test_europe_paris_has_eleven_holidays() {
        let holidays = RegionCalendar::europe_paris().holidays_in_year(2021);
        assert_eq!(holidays.len(), 11);
        assert_eq!(holidays[0].name, "New Year's Day");
        assert_eq!(holidays[10].name, "Christmas Day");
        assert!(holidays.windows(2).all(|w| w[0].date <= w[1].date));
        assert!(holidays.iter().all(|h| h.region == "Europe/Paris"));
    }

    #[test]
    fn test_weekend_detection() {
        let paris = RegionCalendar::europe_paris();
        assert!(paris.is_weekend(date(2021, 1, 2))); // Saturday
        assert!(paris.is_weekend(date(2021, 1, 3))); // Sunday
        assert!(!paris.is_weekend(date(2021, 1, 4))); // Monday
    }

    #[test]
    fn test_working_days_first_week_of_2021() {
        let paris = RegionCalendar::europe_paris();
        // Fri 1 (holiday), Sat 2, Sun 3, Mon 4, Tue 5
        assert_eq!(paris.working_days(span(date(2021, 1, 1), date(2021, 1, 5))), 2);
        // Wed 6 .. Sun 10
        assert_eq!(paris.working_days(span(date(2021, 1, 6), date(2021, 1, 10))), 3);
        assert_eq!(paris.working_days(span(date(2021, 1, 1), date(2021, 1, 10))), 5);
    }

    #[test]
    fn test_working_days_across_year_boundary() {
        let paris = RegionCalendar::europe_paris();
        // Fri 2021-12-24, Sat 25 (Christmas), Sun 26, Mon 27 .. Fri 31, Sat 2022-01-01, Sun 2
        assert_eq!(
            paris.working_days(span(date(2021, 12, 24), date(2022, 1, 2))),
            6
        );
    }

    #[test]
    fn test_custom_weekend() {
        let calendar = RegionCalendar {
            region: "Custom".to_string(),
            weekend: vec![Weekday::Fri, Weekday::Sat],
            holidays: vec![],
        };
        // Mon 2021-01-04 .. Sun 2021-01-10: Fri and Sat are off
        assert_eq!(
            calendar.working_days(span(date(2021, 1, 4), date(2021, 1, 10))),
            5
        );
        assert!(calendar.is_weekend(date(2021, 1, 8)));
        assert!(!calendar.is_weekend(date(2021, 1, 10)));
    }

    #[test]
    fn test_deserialize_region_from_yaml() {
        let yaml = r#"
region: Test/Region
weekend: [Saturday, Sunday]
holidays:
  - kind: fixed
    name: Founders Day
    month: 3
    day: 15
  - kind: easter_offset
    name: Good Friday
    offset_days: -2
"#;
        let calendar: RegionCalendar = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(calendar.region, "Test/Region");
        assert_eq!(calendar.weekend, vec![Weekday::Sat, Weekday::Sun]);
        assert_eq!(calendar.holidays.len(), 2);
        assert!(calendar.is_public_holiday(date(2021, 4, 2))); // Good Friday 2021
        assert!(calendar.is_public_holiday(date(2021, 3, 15)));
    }

    #[test]
    fn test_weekend_defaults_when_omitted() {
        let calendar: RegionCalendar = serde_yaml::from_str("region: Bare").unwrap();
        assert_eq!(calendar.weekend, vec![Weekday::Sat, Weekday::Sun]);
        assert!(calendar.holidays.is_empty());
    }

    fn walked_working_days(calendar: &RegionCalendar, span: DateSpan) -> u32 {
        span.days()
            .filter(|day| !calendar.is_weekend(*day) && !calendar.is_public_holiday(*day))
            .count() as u32
    }

    #[test]
    fn test_working_days_agree_with_walking_every_day() {
        let calendar = RegionCalendar::europe_paris();
        let spans = [
            span(date(2021, 1, 4), date(2021, 1, 4)),
            span(date(2021, 1, 2), date(2021, 1, 3)),
            span(date(2020, 2, 27), date(2020, 3, 2)),
            span(date(2021, 4, 1), date(2021, 6, 30)),
            span(date(2019, 12, 20), date(2024, 1, 9)),
            span(date(2023, 7, 13), date(2023, 7, 16)),
        ];
        for s in spans {
            assert_eq!(calendar.working_days(s), walked_working_days(&calendar, s), "{}", s);
        }
    }

    #[test]
    fn test_working_days_over_entire_date_range() {
        let calendar = RegionCalendar::europe_paris();
        let days = calendar.working_days(span(NaiveDate::MIN, NaiveDate::MAX));
        assert!(days > 0);
        assert!(i64::from(days) < span(NaiveDate::MIN, NaiveDate::MAX).len_days());
    }

    #[test]
    fn test_working_days_with_repeated_weekend_entries() {
        let calendar = RegionCalendar {
            region: "Test/Repeat".to_string(),
            weekend: vec![Weekday::Sun, Weekday::Sun, Weekday::Sat],
            holidays: vec![
                HolidayRule::fixed("Twice", 1, 6),
                HolidayRule::fixed("Twice Again", 1, 6),
            ],
        };
        let s = span(date(2021, 1, 1), date(2021, 1, 31));
        // 21 weekdays in January 2021, minus Jan 6
        assert_eq!(calendar.working_days(s), 20);
        assert_eq!(calendar.working_days(s), walked_working_days(&calendar, s));
    }

    #[test]
    fn test_validate_accepts_builtin_calendar_and_leap_day() {
        let mut calendar = RegionCalendar::europe_paris();
        calendar.holidays.push(HolidayRule::fixed("Leap Day", 2, 29));
        assert_eq!(calendar.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_impossible_fixed_dates() {
        for (month, day) in [(13, 1), (4, 31), (2, 30), (0, 10), (5, 0)] {
            let calendar = RegionCalendar {
                region: "Test/Broken".to_string(),
                weekend: default_weekend(),
                holidays: vec![HolidayRule::fixed("Nowhere Day", month, day)],
            };
            let message = calendar.validate().unwrap_err();
            assert!(message.contains("Nowhere Day"), "{}", message);
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_easter_offset() {
        let calendar = RegionCalendar {
            region: "Test/Broken".to_string(),
            weekend: default_weekend(),
            holidays: vec![HolidayRule::easter_offset("Far Away", i64::MAX)],
        };
        let message = calendar.validate().unwrap_err();
        assert!(message.contains("Far Away"), "{}", message);
    }
}
