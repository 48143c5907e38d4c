//! Team models.

use serde::{Deserialize, Serialize};

use super::TeamId;

/// A named group of employees. Membership lives on [`Employee::team_id`](super::Employee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier for the team.
    pub id: TeamId,
    /// Unique (case-insensitive) team name.
    pub name: String,
}

impl Team {
    /// Creates a team with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
        }
    }

    /// Case-insensitive name comparison used for uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    /// The team name.
    pub name: String,
}
