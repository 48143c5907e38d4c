//! Day-off balance model.

use serde::{Deserialize, Serialize};

use super::EmployeeId;

/// An employee's remaining day-off allotment, in working days.
///
/// Owned exclusively by one employee and only changed through the balance ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The owning employee.
    pub employee_id: EmployeeId,
    /// Remaining working days.
    pub balance: i64,
}

impl Balance {
    /// Returns true if at least `workdays` remain.
    pub fn covers(&self, workdays: i64) -> bool {
        self.balance >= workdays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_covers() {
        let balance = Balance {
            employee_id: EmployeeId::new(),
            balance: 3,
        };
        assert!(balance.covers(3));
        assert!(balance.covers(0));
        assert!(!balance.covers(4));
    }

    #[test]
    fn test_overdrawn_balance_covers_nothing_positive() {
        let balance = Balance {
            employee_id: EmployeeId::new(),
            balance: -2,
        };
        assert!(balance.covers(-2));
        assert!(!balance.covers(0));
    }

    #[test]
    fn test_serialize_balance() {
        let balance = Balance {
            employee_id: EmployeeId::new(),
            balance: 10,
        };
        let json = serde_json::to_value(balance).unwrap();
        assert_eq!(json["balance"], 10);
    }
}
