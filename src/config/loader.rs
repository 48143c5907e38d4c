//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine settings
//! and region calendars from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::calendar::{RegionCalendar, WorkingDayCalendar};
use crate::error::{EngineError, EngineResult};

use super::types::Settings;

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_ENV: &str = "VACATION_ENGINE_CONFIG";

/// Directory used when [`CONFIG_DIR_ENV`] is unset.
pub const DEFAULT_CONFIG_DIR: &str = "./config";

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── settings.yaml            # default region, opening balance, server
/// └── regions/
///     └── europe_paris.yaml    # one calendar per supported region
/// ```
///
/// # Example
///
/// ```no_run
/// use vacation_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Regions: {:?}", loader.calendar().regions());
/// # Ok::<(), vacation_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: Settings,
    calendar: WorkingDayCalendar,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `settings.yaml` or the `regions` directory is missing
    /// - Any file contains invalid YAML
    /// - The default region has no calendar
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<Settings>(&path.join("settings.yaml"))?;
        let regions = Self::load_regions(&path.join("regions"))?;

        let loader = Self::from_parts(settings, regions)?;
        info!(
            path = %path.display(),
            regions = ?loader.calendar.regions(),
            "Configuration loaded"
        );
        Ok(loader)
    }

    /// The compiled-in configuration: default settings and the Europe/Paris calendar.
    pub fn builtin() -> Self {
        Self {
            settings: Settings::default(),
            calendar: WorkingDayCalendar::default(),
        }
    }

    /// Loads from `$VACATION_ENGINE_CONFIG` (or `./config`), falling back to
    /// [`builtin`](Self::builtin) when that directory does not exist.
    pub fn from_env() -> EngineResult<Self> {
        let dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        if dir.is_dir() {
            Self::load(&dir)
        } else {
            info!(path = %dir.display(), "No configuration directory; using built-in configuration");
            Ok(Self::builtin())
        }
    }

    /// Builds a loader from already parsed parts.
    ///
    /// # Errors
    ///
    /// `UnsupportedRegion` if `settings.default_region` is not among `regions`.
    pub fn from_parts(settings: Settings, regions: Vec<RegionCalendar>) -> EngineResult<Self> {
        let calendar = WorkingDayCalendar::new(regions);
        if !calendar.supports(&settings.default_region) {
            return Err(EngineError::UnsupportedRegion {
                region: settings.default_region,
            });
        }
        Ok(Self { settings, calendar })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all region calendars from the regions directory.
    fn load_regions(regions_dir: &Path) -> EngineResult<Vec<RegionCalendar>> {
        let regions_dir_str = regions_dir.display().to_string();

        if !regions_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: regions_dir_str,
            });
        }

        let entries = fs::read_dir(regions_dir).map_err(|_| EngineError::ConfigNotFound {
            path: regions_dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: regions_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent
        paths.sort();

        let mut regions = Vec::with_capacity(paths.len());
        let mut seen = HashSet::new();
        for path in paths {
            let region = Self::load_yaml::<RegionCalendar>(&path)?;
            let parse_error = |message: String| EngineError::ConfigParseError {
                path: path.display().to_string(),
                message,
            };
            region.validate().map_err(parse_error)?;
            if !seen.insert(region.region.clone()) {
                return Err(parse_error(format!(
                    "region '{}' is defined more than once",
                    region.region
                )));
            }
            debug!(
                region = %region.region,
                holidays = region.holidays.len(),
                "Region calendar loaded"
            );
            regions.push(region);
        }

        if regions.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no region files found)", regions_dir_str),
            });
        }

        Ok(regions)
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the working-day calendar covering every loaded region.
    pub fn calendar(&self) -> &WorkingDayCalendar {
        &self.calendar
    }
}
