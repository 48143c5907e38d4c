//! Request types for the vacation engine API.
//!
//! Bodies reuse the domain payloads ([`NewEmployee`](crate::models::NewEmployee),
//! [`NewTeam`](crate::models::NewTeam), [`VacationRequest`](crate::models::VacationRequest));
//! this module holds the query-string structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{EmployeeId, VacationType};

/// Query of `GET /vacations/search_employees_by_period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// First day of the window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the window (inclusive).
    pub end_date: NaiveDate,
    /// Only vacations of this type; all types when omitted.
    #[serde(rename = "type", default)]
    pub vacation_type: Option<VacationType>,
}

/// Query of `GET /vacations/compare_employees_vacations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareQuery {
    /// First employee.
    pub employee_1_id: EmployeeId,
    /// Second employee.
    pub employee_2_id: EmployeeId,
    /// First day of the window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the window (inclusive).
    pub end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_query_type_is_optional() {
        let query: PeriodQuery =
            serde_json::from_str(r#"{"start_date": "2021-01-01", "end_date": "2021-01-31"}"#)
                .unwrap();
        assert_eq!(query.vacation_type, None);

        let query: PeriodQuery = serde_json::from_str(
            r#"{"start_date": "2021-01-01", "end_date": "2021-01-31", "type": "unpaid"}"#,
        )
        .unwrap();
        assert_eq!(query.vacation_type, Some(VacationType::Unpaid));
    }
}
