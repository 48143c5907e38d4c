//! Vacation reconciliation engine
//!
//! This crate books employee vacations, merges requests that overlap or sit
//! next to an existing vacation of the same type, and keeps each employee's
//! day-off balance equal to the working days their vacations cost under the
//! public-holiday calendar of their region.

#![warn(missing_docs)]

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod reconciliation;
pub mod roster;
pub mod store;
