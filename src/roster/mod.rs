//! Employee and team bookkeeping around the reconciliation core.

mod employees;
mod teams;

pub use employees::{DEFAULT_OPENING_BALANCE, EmployeeService, RosterDefaults};
pub use teams::TeamService;
