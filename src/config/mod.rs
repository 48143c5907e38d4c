//! Configuration loading and management for the vacation engine.
//!
//! This module loads the engine settings (default region, opening balance,
//! HTTP listener) and the per-region holiday calendars from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use vacation_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Default region: {}", config.settings().default_region);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_DIR_ENV, ConfigLoader, DEFAULT_CONFIG_DIR};
pub use types::{ServerSettings, Settings};
