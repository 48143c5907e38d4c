//! Vacation models: the vacation record, the request to create one, and the
//! inclusive date span both are built on.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, VacationId};
use crate::error::{EngineError, EngineResult};

/// Whether a vacation consumes paid leave or is taken unpaid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationType {
    /// Paid leave (the default for new requests).
    #[default]
    Paid,
    /// Unpaid leave.
    Unpaid,
}

impl fmt::Display for VacationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VacationType::Paid => write!(f, "paid"),
            VacationType::Unpaid => write!(f, "unpaid"),
        }
    }
}

/// An inclusive range of calendar days, `start_date <= end_date`.
///
/// # Example
///
/// ```
/// use vacation_engine::models::DateSpan;
/// use chrono::NaiveDate;
///
/// let first = DateSpan::new(
///     NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
/// )
/// .unwrap();
/// let next = DateSpan::new(
///     NaiveDate::from_ymd_opt(2021, 1, 6).unwrap(),
///     NaiveDate::from_ymd_opt(2021, 1, 10).unwrap(),
/// )
/// .unwrap();
///
/// assert!(!first.overlaps(&next));
/// assert!(first.touches(&next));
/// assert_eq!(first.len_days(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    /// First day of the span (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the span (inclusive).
    pub end_date: NaiveDate,
}

impl DateSpan {
    /// Creates a span, rejecting a start that lies after the end.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if start_date > end_date {
            return Err(EngineError::InvalidDateRange {
                start_date,
                end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Checks if a date falls within the span, endpoints included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the two spans share at least one day.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        other.start_date <= self.end_date && other.end_date >= self.start_date
    }

    /// Returns true if the spans overlap or are separated by no free day,
    /// e.g. Jan 1–5 touches Jan 6–10.
    pub fn touches(&self, other: &DateSpan) -> bool {
        let end_plus_one = self.end_date.succ_opt().unwrap_or(self.end_date);
        let start_minus_one = self.start_date.pred_opt().unwrap_or(self.start_date);
        other.start_date <= end_plus_one && other.end_date >= start_minus_one
    }

    /// Returns the days shared by both spans, if any.
    pub fn intersection(&self, other: &DateSpan) -> Option<DateSpan> {
        let start_date = self.start_date.max(other.start_date);
        let end_date = self.end_date.min(other.end_date);
        (start_date <= end_date).then_some(DateSpan {
            start_date,
            end_date,
        })
    }

    /// Returns the smallest span covering both spans.
    pub fn union(&self, other: &DateSpan) -> DateSpan {
        DateSpan {
            start_date: self.start_date.min(other.start_date),
            end_date: self.end_date.max(other.end_date),
        }
    }

    /// Iterates over every day of the span in ascending order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end_date = self.end_date;
        self.start_date
            .iter_days()
            .take_while(move |day| *day <= end_date)
    }

    /// Number of calendar days in the span.
    pub fn len_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start_date, self.end_date)
    }
}

/// A request to book (or re-book) a vacation for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRequest {
    /// The employee taking the vacation.
    pub employee_id: EmployeeId,
    /// First day off (inclusive).
    pub start_date: NaiveDate,
    /// Last day off (inclusive).
    pub end_date: NaiveDate,
    /// Paid or unpaid; paid when omitted.
    #[serde(rename = "type", default)]
    pub vacation_type: VacationType,
}

impl VacationRequest {
    /// Creates a new request.
    pub fn new(
        employee_id: EmployeeId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        vacation_type: VacationType,
    ) -> Self {
        Self {
            employee_id,
            start_date,
            end_date,
            vacation_type,
        }
    }

    /// Returns the requested span, failing if start is after end.
    pub fn span(&self) -> EngineResult<DateSpan> {
        DateSpan::new(self.start_date, self.end_date)
    }

    /// Returns a copy of the request stretched to cover `span`.
    pub fn with_span(&self, span: DateSpan) -> Self {
        Self {
            start_date: span.start_date,
            end_date: span.end_date,
            ..self.clone()
        }
    }
}

/// A persisted vacation.
///
/// Vacations are never edited in place: an update replaces the old record
/// (and anything merged into it) with a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacation {
    /// Unique identifier of the vacation.
    pub id: VacationId,
    /// The employee on vacation.
    pub employee_id: EmployeeId,
    /// First day off (inclusive).
    pub start_date: NaiveDate,
    /// Last day off (inclusive).
    pub end_date: NaiveDate,
    /// Paid or unpaid.
    #[serde(rename = "type")]
    pub vacation_type: VacationType,
}

impl Vacation {
    /// Builds a new record with a fresh id from a request.
    pub fn from_request(request: &VacationRequest) -> Self {
        Self {
            id: VacationId::new(),
            employee_id: request.employee_id,
            start_date: request.start_date,
            end_date: request.end_date,
            vacation_type: request.vacation_type,
        }
    }

    /// The days covered by this vacation.
    pub fn span(&self) -> DateSpan {
        DateSpan {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Checks if the employee is off on the given date.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.span().contains(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(start: (u32, u32), end: (u32, u32)) -> DateSpan {
        DateSpan::new(date(2021, start.0, start.1), date(2021, end.0, end.1)).unwrap()
    }

    #[test]
    fn test_span_rejects_reversed_dates() {
        let result = DateSpan::new(date(2021, 1, 10), date(2021, 1, 5));
        match result {
            Err(EngineError::InvalidDateRange {
                start_date,
                end_date,
            }) => {
                assert_eq!(start_date, date(2021, 1, 10));
                assert_eq!(end_date, date(2021, 1, 5));
            }
            other => panic!("Expected InvalidDateRange, got {:?}", other),
        }
    }

    #[test]
    fn test_single_day_span_is_valid() {
        let single = DateSpan::new(date(2021, 3, 1), date(2021, 3, 1)).unwrap();
        assert_eq!(single.len_days(), 1);
        assert_eq!(single.days().collect::<Vec<_>>(), vec![date(2021, 3, 1)]);
    }

    #[test]
    fn test_touches_with_one_day_gap_boundary() {
        let base = span((1, 1), (1, 5));
        assert!(base.touches(&span((1, 6), (1, 10))));
        assert!(!base.touches(&span((1, 7), (1, 10))));
        assert!(span((1, 7), (1, 10)).touches(&span((1, 1), (1, 6))));
    }

    #[test]
    fn test_overlap_is_stricter_than_touch() {
        let base = span((1, 1), (1, 5));
        assert!(base.overlaps(&span((1, 5), (1, 9))));
        assert!(!base.overlaps(&span((1, 6), (1, 9))));
    }

    #[test]
    fn test_intersection_and_union() {
        let a = span((1, 1), (1, 4));
        let b = span((1, 3), (1, 5));
        assert_eq!(a.intersection(&b), Some(span((1, 3), (1, 4))));
        assert_eq!(a.union(&b), span((1, 1), (1, 5)));
        assert_eq!(a.intersection(&span((2, 1), (2, 2))), None);
    }

    #[test]
    fn test_days_iterates_inclusive_range_across_month_end() {
        let days: Vec<_> = span((1, 30), (2, 2)).days().collect();
        assert_eq!(
            days,
            vec![
                date(2021, 1, 30),
                date(2021, 1, 31),
                date(2021, 2, 1),
                date(2021, 2, 2)
            ]
        );
    }

    #[test]
    fn test_request_defaults_to_paid() {
        let json = r#"{
            "employee_id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "start_date": "2021-01-01",
            "end_date": "2021-01-05"
        }"#;
        let request: VacationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.vacation_type, VacationType::Paid);
        assert_eq!(request.span().unwrap(), span((1, 1), (1, 5)));
    }

    #[test]
    fn test_vacation_type_field_is_named_type() {
        let request = VacationRequest::new(
            EmployeeId::new(),
            date(2021, 1, 1),
            date(2021, 1, 5),
            VacationType::Unpaid,
        );
        let vacation = Vacation::from_request(&request);
        let json = serde_json::to_value(&vacation).unwrap();
        assert_eq!(json["type"], "unpaid");
        assert_eq!(json["start_date"], "2021-01-01");
    }

    #[test]
    fn test_with_span_keeps_employee_and_type() {
        let request = VacationRequest::new(
            EmployeeId::new(),
            date(2021, 1, 3),
            date(2021, 1, 4),
            VacationType::Unpaid,
        );
        let widened = request.with_span(span((1, 1), (1, 9)));
        assert_eq!(widened.employee_id, request.employee_id);
        assert_eq!(widened.vacation_type, VacationType::Unpaid);
        assert_eq!(widened.start_date, date(2021, 1, 1));
        assert_eq!(widened.end_date, date(2021, 1, 9));
    }

    #[test]
    fn test_contains_date_on_endpoints() {
        let vacation = Vacation::from_request(&VacationRequest::new(
            EmployeeId::new(),
            date(2021, 1, 1),
            date(2021, 1, 5),
            VacationType::Paid,
        ));
        assert!(vacation.contains_date(date(2021, 1, 1)));
        assert!(vacation.contains_date(date(2021, 1, 5)));
        assert!(!vacation.contains_date(date(2021, 1, 6)));
    }
}
