//! Configuration types.
//!
//! These structures are deserialized from `settings.yaml`. Region calendars
//! are [`RegionCalendar`](crate::calendar::RegionCalendar)s loaded from
//! `regions/*.yaml`.

use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_REGION;
use crate::roster::{DEFAULT_OPENING_BALANCE, RosterDefaults};

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_opening_balance() -> i64 {
    DEFAULT_OPENING_BALANCE
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    /// `host:port`, suitable for binding a listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Contents of `settings.yaml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Region assigned to employees registered without one.
    #[serde(default = "default_region")]
    pub default_region: String,
    /// Days granted to every new employee.
    #[serde(default = "default_opening_balance")]
    pub opening_balance: i64,
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    /// The registration defaults these settings describe.
    pub fn roster_defaults(&self) -> RosterDefaults {
        RosterDefaults {
            default_region: self.default_region.clone(),
            opening_balance: self.opening_balance,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_region: default_region(),
            opening_balance: default_opening_balance(),
            server: ServerSettings::default(),
        }
    }
}
