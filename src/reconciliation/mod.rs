//! Vacation reconciliation.
//!
//! This module contains the pieces the [`VacationService`] composes:
//! overlap detection and merging, pre-merge validators, the balance ledger,
//! per-employee locks, and the shared-days comparison.

mod comparison;
pub mod ledger;
mod locks;
mod overlap;
mod service;
mod validator;

pub use comparison::{covered_days, shared_days};
pub use locks::EmployeeLocks;
pub use overlap::{find_touching, find_touching_excluding, merge};
pub use service::{ENGINE_VERSION, VacationService};
pub use validator::{
    TypeConsistencyValidator, ValidationError, ValidatorChain, VacationValidator,
};
