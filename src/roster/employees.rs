//! Employee registration, team membership and removal.

use std::sync::Arc;

use tracing::info;

use crate::calendar::WorkingDayCalendar;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Balance, DEFAULT_REGION, Employee, EmployeeId, NewEmployee, TeamId,
};
use crate::reconciliation::EmployeeLocks;
use crate::store::{VacationStore, require_employee};

/// Days granted to a new employee when neither the request nor the
/// configuration says otherwise.
pub const DEFAULT_OPENING_BALANCE: i64 = 10;

/// Values applied to registrations that leave them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterDefaults {
    /// Region assigned when a registration names none.
    pub default_region: String,
    /// Balance granted on registration.
    pub opening_balance: i64,
}

impl Default for RosterDefaults {
    fn default() -> Self {
        Self {
            default_region: DEFAULT_REGION.to_string(),
            opening_balance: DEFAULT_OPENING_BALANCE,
        }
    }
}

fn require_name(field: &str, value: &str) -> EngineResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidEmployee {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Registers and maintains employees.
pub struct EmployeeService<S: VacationStore> {
    store: S,
    calendar: Arc<WorkingDayCalendar>,
    locks: EmployeeLocks,
    defaults: RosterDefaults,
}

impl<S: VacationStore> EmployeeService<S> {
    /// Creates the service. `locks` must be shared with the vacation service
    /// so a deletion never interleaves with a reconciliation.
    pub fn new(
        store: S,
        calendar: Arc<WorkingDayCalendar>,
        locks: EmployeeLocks,
        defaults: RosterDefaults,
    ) -> Self {
        Self {
            store,
            calendar,
            locks,
            defaults,
        }
    }

    /// Registers an employee and opens their balance.
    ///
    /// # Errors
    ///
    /// - `InvalidEmployee` for a blank name or a negative opening balance
    /// - `UnsupportedRegion` if the region has no calendar
    pub fn register(&self, new_employee: NewEmployee) -> EngineResult<Employee> {
        let first_name = require_name("first_name", &new_employee.first_name)?;
        let last_name = require_name("last_name", &new_employee.last_name)?;

        let region = new_employee
            .region
            .unwrap_or_else(|| self.defaults.default_region.clone());
        if !self.calendar.supports(&region) {
            return Err(EngineError::UnsupportedRegion { region });
        }

        let opening_balance = new_employee
            .opening_balance
            .unwrap_or(self.defaults.opening_balance);
        if opening_balance < 0 {
            return Err(EngineError::InvalidEmployee {
                field: "opening_balance".to_string(),
                message: format!("must not be negative, got {}", opening_balance),
            });
        }

        let employee = Employee {
            id: EmployeeId::new(),
            first_name,
            last_name,
            team_id: None,
            region,
        };
        self.store.insert_employee(employee.clone(), opening_balance)?;

        info!(
            employee_id = %employee.id,
            region = %employee.region,
            opening_balance,
            "Employee registered"
        );
        Ok(employee)
    }

    /// Looks up an employee.
    pub fn get(&self, employee_id: EmployeeId) -> EngineResult<Employee> {
        require_employee(&self.store, employee_id)
    }

    /// The employee's current balance.
    pub fn balance(&self, employee_id: EmployeeId) -> EngineResult<Balance> {
        require_employee(&self.store, employee_id)?;
        self.store
            .balance(employee_id)?
            .ok_or(EngineError::NoBalanceRecord { employee_id })
    }

    /// Moves the employee into a team, leaving any previous one.
    pub fn assign_team(&self, employee_id: EmployeeId, team_id: TeamId) -> EngineResult<Employee> {
        let mut employee = require_employee(&self.store, employee_id)?;
        if self.store.get_team(team_id)?.is_none() {
            return Err(EngineError::TeamNotFound {
                team: team_id.to_string(),
            });
        }
        employee.team_id = Some(team_id);
        self.store.update_employee(employee.clone())?;
        info!(%employee_id, %team_id, "Employee joined team");
        Ok(employee)
    }

    /// Removes the employee from their team, if any.
    pub fn leave_team(&self, employee_id: EmployeeId) -> EngineResult<Employee> {
        let mut employee = require_employee(&self.store, employee_id)?;
        if let Some(team_id) = employee.team_id.take() {
            self.store.update_employee(employee.clone())?;
            info!(%employee_id, %team_id, "Employee left team");
        }
        Ok(employee)
    }

    /// Deletes the employee together with their balance and vacations.
    pub fn delete(&self, employee_id: EmployeeId) -> EngineResult<Employee> {
        let removed = self
            .locks
            .with_employee(employee_id, || self.store.delete_employee(employee_id))?
            .ok_or(EngineError::EmployeeNotFound { employee_id })?;
        self.locks.forget(employee_id);
        info!(%employee_id, "Employee deleted");
        Ok(removed)
    }
}
