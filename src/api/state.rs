//! Application state for the vacation engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::reconciliation::{EmployeeLocks, VacationService};
use crate::roster::{EmployeeService, TeamService};
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Every service wraps the same store and the same employee locks, so a
/// roster change never interleaves with a reconciliation.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    vacations: Arc<VacationService<InMemoryStore>>,
    employees: Arc<EmployeeService<InMemoryStore>>,
    teams: Arc<TeamService<InMemoryStore>>,
}

impl AppState {
    /// Creates the state over an empty in-memory store.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_store(config, InMemoryStore::new())
    }

    /// Creates the state over an existing store.
    pub fn with_store(config: ConfigLoader, store: InMemoryStore) -> Self {
        let calendar = Arc::new(config.calendar().clone());
        let locks = EmployeeLocks::new();
        let defaults = config.settings().roster_defaults();

        Self {
            vacations: Arc::new(VacationService::new(
                store.clone(),
                Arc::clone(&calendar),
                locks.clone(),
            )),
            employees: Arc::new(EmployeeService::new(
                store.clone(),
                calendar,
                locks,
                defaults,
            )),
            teams: Arc::new(TeamService::new(store)),
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Vacation reconciliation and queries.
    pub fn vacations(&self) -> &VacationService<InMemoryStore> {
        &self.vacations
    }

    /// Employee registration and membership.
    pub fn employees(&self) -> &EmployeeService<InMemoryStore> {
        &self.employees
    }

    /// Team management.
    pub fn teams(&self) -> &TeamService<InMemoryStore> {
        &self.teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEmployee;
    use crate::store::VacationStore;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_services_share_one_store() {
        let state = AppState::new(ConfigLoader::builtin());
        let employee = state
            .employees()
            .register(NewEmployee::new("Ada", "Lovelace"))
            .unwrap();

        let seen = state.vacations().store().get_employee(employee.id).unwrap();
        assert_eq!(seen, Some(employee));
    }
}
