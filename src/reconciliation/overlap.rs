//! Overlap detection and span merging.
//!
//! A candidate request "touches" an existing vacation of the same employee when
//! the two overlap or are separated by no free day:
//!
//! ```text
//! existing.start_date <= candidate.end_date + 1 day
//!     && existing.end_date >= candidate.start_date - 1 day
//! ```
//!
//! so Jan 1–5 and Jan 6–10 merge into Jan 1–10.

use crate::models::{DateSpan, Vacation, VacationId, VacationRequest};

/// Filters `existing` down to the vacations the candidate touches.
///
/// Only vacations of `candidate.employee_id` are considered. The input order is
/// preserved, so a store returning vacations by start date yields a touching
/// set ordered by start date.
///
/// # Example
///
/// ```
/// use vacation_engine::models::{EmployeeId, Vacation, VacationRequest, VacationType};
/// use vacation_engine::reconciliation::find_touching;
/// use chrono::NaiveDate;
///
/// let employee = EmployeeId::new();
/// let d = |day| NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
/// let existing = vec![Vacation::from_request(&VacationRequest::new(
///     employee, d(1), d(5), VacationType::Paid,
/// ))];
///
/// let candidate = VacationRequest::new(employee, d(6), d(10), VacationType::Paid);
/// assert_eq!(find_touching(&existing, &candidate).len(), 1);
///
/// let far = VacationRequest::new(employee, d(7), d(10), VacationType::Paid);
/// assert!(find_touching(&existing, &far).is_empty());
/// ```
pub fn find_touching(existing: &[Vacation], candidate: &VacationRequest) -> Vec<Vacation> {
    find_touching_excluding(existing, candidate, None)
}

/// Like [`find_touching`], ignoring the vacation with id `exclude`.
///
/// Used on updates so a vacation is never treated as overlapping itself.
pub fn find_touching_excluding(
    existing: &[Vacation],
    candidate: &VacationRequest,
    exclude: Option<VacationId>,
) -> Vec<Vacation> {
    let candidate_span = DateSpan {
        start_date: candidate.start_date,
        end_date: candidate.end_date,
    };

    existing
        .iter()
        .filter(|vacation| vacation.employee_id == candidate.employee_id)
        .filter(|vacation| Some(vacation.id) != exclude)
        .filter(|vacation| candidate_span.touches(&vacation.span()))
        .cloned()
        .collect()
}

/// Computes the span covering the candidate and every touching vacation.
///
/// The type and employee of the merged vacation come from the candidate; the
/// touching set must already have passed validation.
pub fn merge(candidate: &VacationRequest, touching: &[Vacation]) -> DateSpan {
    let candidate_span = DateSpan {
        start_date: candidate.start_date,
        end_date: candidate.end_date,
    };

    touching
        .iter()
        .fold(candidate_span, |merged, vacation| {
            merged.union(&vacation.span())
        })
}
