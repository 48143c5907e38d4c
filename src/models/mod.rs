//! Core data models for the vacation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod balance;
mod employee;
mod holiday;
mod ids;
mod reconciliation_result;
mod team;
mod vacation;

pub use balance::Balance;
pub use employee::{DEFAULT_REGION, Employee, NewEmployee};
pub use holiday::PublicHoliday;
pub use ids::{EmployeeId, TeamId, VacationId};
pub use reconciliation_result::{
    AuditStep, AuditTrace, AuditWarning, ReconciliationResult, ReconciliationStage,
};
pub use team::{NewTeam, Team};
pub use vacation::{DateSpan, Vacation, VacationRequest, VacationType};
