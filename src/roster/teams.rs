//! Teams.

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, NewTeam, Team, TeamId};
use crate::store::VacationStore;

/// Creates and looks up teams.
pub struct TeamService<S: VacationStore> {
    store: S,
}

impl<S: VacationStore> TeamService<S> {
    /// Creates the service.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a team with a unique name.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for a blank name
    /// - `TeamAlreadyExists` if the name is taken, ignoring case
    pub fn create(&self, new_team: NewTeam) -> EngineResult<Team> {
        let name = new_team.name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidRequest {
                message: "team name must not be empty".to_string(),
            });
        }

        let team = Team::new(name);
        self.store.insert_team(team.clone())?;
        info!(team_id = %team.id, name = %team.name, "Team created");
        Ok(team)
    }

    /// Looks up a team by id.
    pub fn get(&self, team_id: TeamId) -> EngineResult<Team> {
        self.store
            .get_team(team_id)?
            .ok_or_else(|| EngineError::TeamNotFound {
                team: team_id.to_string(),
            })
    }

    /// Looks up a team by name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> EngineResult<Team> {
        self.store
            .find_team_by_name(name)?
            .ok_or_else(|| EngineError::TeamNotFound {
                team: name.to_string(),
            })
    }

    /// The team's employees, ordered by last name then first name.
    pub fn members(&self, team_id: TeamId) -> EngineResult<Vec<Employee>> {
        self.get(team_id)?;
        let mut members = self.store.team_members(team_id)?;
        members.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn new_team(name: &str) -> NewTeam {
        NewTeam {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_create_and_get() {
        let teams = TeamService::new(InMemoryStore::new());
        let team = teams.create(new_team(" Platform ")).unwrap();
        assert_eq!(team.name, "Platform");
        assert_eq!(teams.get(team.id).unwrap(), team);
        assert_eq!(teams.find_by_name("platform").unwrap(), team);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let teams = TeamService::new(InMemoryStore::new());
        teams.create(new_team("Platform")).unwrap();
        assert!(matches!(
            teams.create(new_team("platform")),
            Err(EngineError::TeamAlreadyExists { .. })
        ));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let teams = TeamService::new(InMemoryStore::new());
        assert!(matches!(
            teams.create(new_team("  ")),
            Err(EngineError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_unknown_team_lookups_fail() {
        let teams = TeamService::new(InMemoryStore::new());
        assert!(matches!(
            teams.get(TeamId::new()),
            Err(EngineError::TeamNotFound { .. })
        ));
        match teams.find_by_name("Ghosts") {
            Err(EngineError::TeamNotFound { team }) => assert_eq!(team, "Ghosts"),
            other => panic!("Expected TeamNotFound, got {:?}", other),
        }
        assert!(teams.members(TeamId::new()).is_err());
    }
}
