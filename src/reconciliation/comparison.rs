//! Day-by-day comparison of two employees' vacations.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{DateSpan, Vacation};

/// Every day covered by `vacations` that also falls inside `window`.
pub fn covered_days(vacations: &[Vacation], window: DateSpan) -> BTreeSet<NaiveDate> {
    vacations
        .iter()
        .filter_map(|vacation| vacation.span().intersection(&window))
        .flat_map(DateSpan::days)
        .collect()
}

/// Days inside `window` on which both sets of vacations are taken, ascending
/// and without duplicates.
///
/// # Example
///
/// ```
/// use vacation_engine::models::{DateSpan, EmployeeId, Vacation, VacationRequest, VacationType};
/// use vacation_engine::reconciliation::shared_days;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
/// let a = vec![Vacation::from_request(&VacationRequest::new(
///     EmployeeId::new(), d(1), d(4), VacationType::Paid,
/// ))];
/// let b = vec![Vacation::from_request(&VacationRequest::new(
///     EmployeeId::new(), d(3), d(5), VacationType::Paid,
/// ))];
///
/// let window = DateSpan::new(d(1), d(20)).unwrap();
/// assert_eq!(shared_days(&a, &b, window), vec![d(3), d(4)]);
/// ```
pub fn shared_days(first: &[Vacation], second: &[Vacation], window: DateSpan) -> Vec<NaiveDate> {
    let first_days = covered_days(first, window);
    let second_days = covered_days(second, window);
    first_days.intersection(&second_days).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeId, VacationRequest, VacationType};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    fn window(start: u32, end: u32) -> DateSpan {
        DateSpan::new(date(start), date(end)).unwrap()
    }

    fn vacations(ranges: &[(u32, u32)]) -> Vec<Vacation> {
        let employee = EmployeeId::new();
        ranges
            .iter()
            .map(|(start, end)| {
                Vacation::from_request(&VacationRequest::new(
                    employee,
                    date(*start),
                    date(*end),
                    VacationType::Paid,
                ))
            })
            .collect()
    }

    #[test]
    fn test_overlapping_days_are_shared() {
        let shared = shared_days(&vacations(&[(1, 4)]), &vacations(&[(3, 5)]), window(1, 20));
        assert_eq!(shared, vec![date(3), date(4)]);
    }

    #[test]
    fn test_result_is_clipped_to_window() {
        let shared = shared_days(&vacations(&[(1, 10)]), &vacations(&[(1, 10)]), window(8, 20));
        assert_eq!(shared, vec![date(8), date(9), date(10)]);
    }

    #[test]
    fn test_no_overlap_is_empty() {
        let shared = shared_days(&vacations(&[(1, 2)]), &vacations(&[(3, 5)]), window(1, 20));
        assert!(shared.is_empty());
    }

    #[test]
    fn test_multiple_vacations_are_combined_and_sorted() {
        let first = vacations(&[(15, 16), (1, 3)]);
        let second = vacations(&[(2, 2), (16, 20)]);
        let shared = shared_days(&first, &second, window(1, 31));
        assert_eq!(shared, vec![date(2), date(16)]);
    }

    #[test]
    fn test_covered_days_skips_vacations_outside_window() {
        let days = covered_days(&vacations(&[(1, 2), (10, 12)]), window(11, 20));
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![date(11), date(12)]);
    }
}
