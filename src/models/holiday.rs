//! Public holiday model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A public holiday observed in a region.
///
/// Public holidays are not working days, so they never count towards the cost
/// of a vacation.
///
/// # Example
///
/// ```
/// use vacation_engine::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2021, 7, 14).unwrap(),
///     name: "Bastille Day".to_string(),
///     region: "Europe/Paris".to_string(),
/// };
/// assert!(holiday.falls_on(NaiveDate::from_ymd_opt(2021, 7, 14).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday (e.g., "Bastille Day").
    pub name: String,
    /// The region where this holiday applies (e.g., "Europe/Paris").
    pub region: String,
}

impl PublicHoliday {
    /// Checks if the holiday falls on the given date.
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_public_holiday() {
        let holiday = PublicHoliday {
            date: NaiveDate::from_ymd_opt(2021, 12, 25).unwrap(),
            name: "Christmas Day".to_string(),
            region: "Europe/Paris".to_string(),
        };
        let json = serde_json::to_string(&holiday).unwrap();
        assert!(json.contains("\"date\":\"2021-12-25\""));
        assert!(json.contains("\"name\":\"Christmas Day\""));
        assert!(json.contains("\"region\":\"Europe/Paris\""));
    }

    #[test]
    fn test_falls_on_other_date() {
        let holiday = PublicHoliday {
            date: NaiveDate::from_ymd_opt(2021, 11, 11).unwrap(),
            name: "Armistice Day".to_string(),
            region: "Europe/Paris".to_string(),
        };
        assert!(!holiday.falls_on(NaiveDate::from_ymd_opt(2021, 11, 12).unwrap()));
    }
}
