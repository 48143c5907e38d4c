//! Employee model and related types.
//!
//! This module defines the [`Employee`] record and the [`NewEmployee`]
//! registration payload.

use serde::{Deserialize, Serialize};

use super::{EmployeeId, TeamId};

/// The region every employee was registered in before regions became configurable.
pub const DEFAULT_REGION: &str = "Europe/Paris";

/// Represents an employee whose vacations are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// The team the employee belongs to, if any.
    #[serde(default)]
    pub team_id: Option<TeamId>,
    /// The region whose public holidays apply (e.g., "Europe/Paris").
    pub region: String,
}

impl Employee {
    /// Returns "first last".
    ///
    /// # Examples
    ///
    /// ```
    /// use vacation_engine::models::{Employee, EmployeeId};
    ///
    /// let employee = Employee {
    ///     id: EmployeeId::new(),
    ///     first_name: "Jerome".to_string(),
    ///     last_name: "Powell".to_string(),
    ///     team_id: None,
    ///     region: "Europe/Paris".to_string(),
    /// };
    /// assert_eq!(employee.full_name(), "Jerome Powell");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the employee is a member of the given team.
    pub fn is_in_team(&self, team_id: TeamId) -> bool {
        self.team_id == Some(team_id)
    }
}

/// Payload for registering a new employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Region override; the configured default region when omitted.
    #[serde(default)]
    pub region: Option<String>,
    /// Opening day-off balance; the configured top-up when omitted.
    #[serde(default)]
    pub opening_balance: Option<i64>,
}

impl NewEmployee {
    /// Creates a payload using the configured defaults for region and balance.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            region: None,
            opening_balance: None,
        }
    }

    /// Sets the opening balance.
    pub fn with_opening_balance(mut self, balance: i64) -> Self {
        self.opening_balance = Some(balance);
        self
    }

    /// Sets the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(team_id: Option<TeamId>) -> Employee {
        Employee {
            id: EmployeeId::new(),
            first_name: "Jim".to_string(),
            last_name: "Cramer".to_string(),
            team_id,
            region: DEFAULT_REGION.to_string(),
        }
    }

    #[test]
    fn test_deserialize_employee_without_team() {
        let json = r#"{
            "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "first_name": "Elisabeth",
            "last_name": "Warren",
            "region": "Europe/Paris"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.first_name, "Elisabeth");
        assert_eq!(employee.last_name, "Warren");
        assert_eq!(employee.team_id, None);
        assert_eq!(employee.region, "Europe/Paris");
    }

    #[test]
    fn test_serialize_employee() {
        let employee = create_test_employee(Some(TeamId::new()));
        let json = serde_json::to_string(&employee).unwrap();

        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }

    #[test]
    fn test_is_in_team() {
        let team = TeamId::new();
        let member = create_test_employee(Some(team));
        let loner = create_test_employee(None);

        assert!(member.is_in_team(team));
        assert!(!member.is_in_team(TeamId::new()));
        assert!(!loner.is_in_team(team));
    }

    #[test]
    fn test_new_employee_minimal_payload() {
        let json = r#"{"first_name": "Jim", "last_name": "Cramer"}"#;
        let payload: NewEmployee = serde_json::from_str(json).unwrap();
        assert_eq!(payload, NewEmployee::new("Jim", "Cramer"));
        assert_eq!(payload.region, None);
        assert_eq!(payload.opening_balance, None);
    }

    #[test]
    fn test_new_employee_builders() {
        let payload = NewEmployee::new("Jim", "Cramer")
            .with_opening_balance(25)
            .with_region("Europe/Paris");
        assert_eq!(payload.opening_balance, Some(25));
        assert_eq!(payload.region.as_deref(), Some("Europe/Paris"));
    }
}
