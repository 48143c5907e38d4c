//! HTTP API module for the vacation engine.
//!
//! This module exposes employees, teams and vacations over REST. Every
//! vacation write goes through [`VacationService`](crate::reconciliation::VacationService),
//! so merges and balance changes behave exactly as they do in-process.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CompareQuery, PeriodQuery};
pub use response::{
    ApiError, ApiErrorResponse, HealthResponse, MessageResponse, VacationDeletedResponse,
};
pub use state::AppState;
