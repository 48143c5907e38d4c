//! Error types for the vacation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while reconciling vacations,
//! managing the roster, or loading configuration.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{EmployeeId, VacationId};
use crate::reconciliation::ValidationError;

/// The main error type for the vacation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use vacation_engine::error::EngineError;
///
/// let error = EngineError::UnsupportedRegion {
///     region: "Mars/Olympus_Mons".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unsupported region: Mars/Olympus_Mons");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No working-day calendar is configured for the region.
    #[error("Unsupported region: {region}")]
    UnsupportedRegion {
        /// The region identifier that was requested.
        region: String,
    },

    /// A date range whose start lies after its end.
    #[error("Invalid date range: start {start_date} is after end {end_date}")]
    InvalidDateRange {
        /// The requested start date.
        start_date: NaiveDate,
        /// The requested end date.
        end_date: NaiveDate,
    },

    /// A validator rejected the request before anything was merged.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The employee has no balance row. Indicates a data-integrity problem upstream.
    #[error("No balance record for employee {employee_id}")]
    NoBalanceRecord {
        /// The employee without a balance.
        employee_id: EmployeeId,
    },

    /// The employee cannot afford the additional working days.
    #[error(
        "Employee {employee_id} does not have enough balance: {available} day(s) available, {required} required"
    )]
    InsufficientBalance {
        /// The employee whose balance is too low.
        employee_id: EmployeeId,
        /// The current balance.
        available: i64,
        /// The additional working days the request would consume.
        required: i64,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        employee_id: EmployeeId,
    },

    /// No vacation exists with the given id.
    #[error("Vacation not found: {vacation_id}")]
    VacationNotFound {
        /// The id that was looked up.
        vacation_id: VacationId,
    },

    /// No team matches the given id or name.
    #[error("Team not found: {team}")]
    TeamNotFound {
        /// The team id or name that was looked up.
        team: String,
    },

    /// A team with the same (case-insensitive) name already exists.
    #[error("Team {name} already exists")]
    TeamAlreadyExists {
        /// The conflicting team name.
        name: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A request was well-formed but not acceptable.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// A description of the problem.
        message: String,
    },

    /// The data store failed; the surrounding transaction was rolled back.
    #[error("Operation failed: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors caused by the caller's input rather than the system.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidDateRange { .. }
                | EngineError::Validation(_)
                | EngineError::InsufficientBalance { .. }
                | EngineError::EmployeeNotFound { .. }
                | EngineError::VacationNotFound { .. }
                | EngineError::TeamNotFound { .. }
                | EngineError::TeamAlreadyExists { .. }
                | EngineError::InvalidEmployee { .. }
                | EngineError::InvalidRequest { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VacationType;
    use uuid::Uuid;

    fn employee_id() -> EmployeeId {
        EmployeeId(Uuid::nil())
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/settings.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/settings.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_date_range_displays_both_dates() {
        let error = EngineError::InvalidDateRange {
            start_date: NaiveDate::from_ymd_opt(2021, 1, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range: start 2021-01-10 is after end 2021-01-05"
        );
    }

    #[test]
    fn test_validation_error_wraps_validator_message() {
        let error: EngineError = ValidationError::TypeMismatch {
            vacation_id: VacationId(Uuid::nil()),
            requested: VacationType::Unpaid,
            existing: VacationType::Paid,
        }
        .into();
        assert!(error.to_string().starts_with("Validation failed: "));
        assert!(error.to_string().contains("unpaid"));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_insufficient_balance_displays_amounts() {
        let error = EngineError::InsufficientBalance {
            employee_id: employee_id(),
            available: 2,
            required: 5,
        };
        assert_eq!(
            error.to_string(),
            "Employee 00000000-0000-0000-0000-000000000000 does not have enough balance: 2 day(s) available, 5 required"
        );
    }

    #[test]
    fn test_no_balance_record_is_not_recoverable() {
        let error = EngineError::NoBalanceRecord {
            employee_id: employee_id(),
        };
        assert!(!error.is_recoverable());
        assert!(
            !EngineError::Store {
                message: "disk full".to_string()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_unsupported_region() -> EngineResult<()> {
            Err(EngineError::UnsupportedRegion {
                region: "Nowhere".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_unsupported_region()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
