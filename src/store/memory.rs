//! In-memory store.
//!
//! All tables live behind one `RwLock`. A [`MemoryTransaction`] never holds the
//! lock while it is open: it records its writes in an overlay and applies
//! them under a single write lock on commit, so readers never observe half a
//! reconciliation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::{StoreTransaction, VacationQuery, VacationStore};
use crate::error::{EngineError, EngineResult};
use crate::models::{Balance, Employee, EmployeeId, Team, TeamId, Vacation, VacationId};

#[derive(Debug, Default)]
struct Tables {
    employees: HashMap<EmployeeId, Employee>,
    teams: HashMap<TeamId, Team>,
    vacations: HashMap<VacationId, Vacation>,
    balances: HashMap<EmployeeId, i64>,
}

fn sort_by_start(vacations: &mut [Vacation]) {
    vacations.sort_by(|a, b| {
        (a.start_date, a.end_date, a.id).cmp(&(b.start_date, b.end_date, b.id))
    });
}

/// A thread-safe store keeping everything in process memory.
///
/// Cloning is cheap and yields a handle to the same tables.
///
/// # Example
///
/// ```
/// use vacation_engine::models::{Employee, EmployeeId};
/// use vacation_engine::store::{InMemoryStore, VacationStore};
///
/// let store = InMemoryStore::new();
/// let employee = Employee {
///     id: EmployeeId::new(),
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     team_id: None,
///     region: "Europe/Paris".to_string(),
/// };
/// store.insert_employee(employee.clone(), 10).unwrap();
///
/// assert_eq!(store.balance(employee.id).unwrap().unwrap().balance, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed vacations across all employees.
    pub fn vacation_count(&self) -> usize {
        self.tables.read().vacations.len()
    }
}

impl VacationStore for InMemoryStore {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> EngineResult<MemoryTransaction<'_>> {
        Ok(MemoryTransaction {
            store: self,
            created: Vec::new(),
            deleted: HashSet::new(),
            balance_deltas: HashMap::new(),
            finished: false,
        })
    }

    fn insert_employee(&self, employee: Employee, opening_balance: i64) -> EngineResult<()> {
        let mut tables = self.tables.write();
        tables.balances.insert(employee.id, opening_balance);
        tables.employees.insert(employee.id, employee);
        Ok(())
    }

    fn get_employee(&self, employee_id: EmployeeId) -> EngineResult<Option<Employee>> {
        Ok(self.tables.read().employees.get(&employee_id).cloned())
    }

    fn update_employee(&self, employee: Employee) -> EngineResult<()> {
        let mut tables = self.tables.write();
        match tables.employees.get_mut(&employee.id) {
            Some(stored) => {
                *stored = employee;
                Ok(())
            }
            None => Err(EngineError::EmployeeNotFound {
                employee_id: employee.id,
            }),
        }
    }

    fn delete_employee(&self, employee_id: EmployeeId) -> EngineResult<Option<Employee>> {
        let mut tables = self.tables.write();
        let removed = tables.employees.remove(&employee_id);
        if removed.is_some() {
            tables.balances.remove(&employee_id);
            tables
                .vacations
                .retain(|_, vacation| vacation.employee_id != employee_id);
        }
        Ok(removed)
    }

    fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.tables.read().employees.values().cloned().collect())
    }

    fn insert_team(&self, team: Team) -> EngineResult<()> {
        let mut tables = self.tables.write();
        if tables.teams.values().any(|existing| existing.has_name(&team.name)) {
            return Err(EngineError::TeamAlreadyExists { name: team.name });
        }
        tables.teams.insert(team.id, team);
        Ok(())
    }

    fn get_team(&self, team_id: TeamId) -> EngineResult<Option<Team>> {
        Ok(self.tables.read().teams.get(&team_id).cloned())
    }

    fn find_team_by_name(&self, name: &str) -> EngineResult<Option<Team>> {
        Ok(self
            .tables
            .read()
            .teams
            .values()
            .find(|team| team.has_name(name))
            .cloned())
    }

    fn team_members(&self, team_id: TeamId) -> EngineResult<Vec<Employee>> {
        Ok(self
            .tables
            .read()
            .employees
            .values()
            .filter(|employee| employee.is_in_team(team_id))
            .cloned()
            .collect())
    }

    fn vacation(&self, vacation_id: VacationId) -> EngineResult<Option<Vacation>> {
        Ok(self.tables.read().vacations.get(&vacation_id).cloned())
    }

    fn balance(&self, employee_id: EmployeeId) -> EngineResult<Option<Balance>> {
        Ok(self
            .tables
            .read()
            .balances
            .get(&employee_id)
            .map(|balance| Balance {
                employee_id,
                balance: *balance,
            }))
    }

    fn query_vacations(&self, query: &VacationQuery) -> EngineResult<Vec<Vacation>> {
        let mut vacations: Vec<Vacation> = self
            .tables
            .read()
            .vacations
            .values()
            .filter(|vacation| query.matches(vacation))
            .cloned()
            .collect();
        sort_by_start(&mut vacations);
        Ok(vacations)
    }
}

/// An open transaction against an [`InMemoryStore`].
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    store: &'a InMemoryStore,
    created: Vec<Vacation>,
    deleted: HashSet<VacationId>,
    balance_deltas: HashMap<EmployeeId, i64>,
    finished: bool,
}

impl MemoryTransaction<'_> {
    /// Returns true if nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty() && self.balance_deltas.is_empty()
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn get_vacation(&self, vacation_id: VacationId) -> EngineResult<Option<Vacation>> {
        if let Some(created) = self.created.iter().find(|v| v.id == vacation_id) {
            return Ok(Some(created.clone()));
        }
        if self.deleted.contains(&vacation_id) {
            return Ok(None);
        }
        Ok(self.store.tables.read().vacations.get(&vacation_id).cloned())
    }

    fn find_vacations(&self, employee_id: EmployeeId) -> EngineResult<Vec<Vacation>> {
        let mut vacations: Vec<Vacation> = self
            .store
            .tables
            .read()
            .vacations
            .values()
            .filter(|v| v.employee_id == employee_id && !self.deleted.contains(&v.id))
            .cloned()
            .collect();
        vacations.extend(
            self.created
                .iter()
                .filter(|v| v.employee_id == employee_id)
                .cloned(),
        );
        sort_by_start(&mut vacations);
        Ok(vacations)
    }

    fn create_vacation(&mut self, vacation: Vacation) -> EngineResult<()> {
        self.created.push(vacation);
        Ok(())
    }

    fn delete_vacations(&mut self, vacation_ids: &[VacationId]) -> EngineResult<()> {
        for vacation_id in vacation_ids {
            // A vacation created and deleted within the same transaction never lands.
            let before = self.created.len();
            self.created.retain(|v| v.id != *vacation_id);
            if self.created.len() == before {
                self.deleted.insert(*vacation_id);
            }
        }
        Ok(())
    }

    fn get_balance(&self, employee_id: EmployeeId) -> EngineResult<Option<Balance>> {
        let committed = self.store.tables.read().balances.get(&employee_id).copied();
        Ok(committed.map(|balance| Balance {
            employee_id,
            balance: balance + self.balance_deltas.get(&employee_id).copied().unwrap_or(0),
        }))
    }

    fn update_balance(&mut self, employee_id: EmployeeId, delta: i64) -> EngineResult<Balance> {
        let current = self
            .get_balance(employee_id)?
            .ok_or(EngineError::NoBalanceRecord { employee_id })?;
        *self.balance_deltas.entry(employee_id).or_insert(0) += delta;
        Ok(Balance {
            employee_id,
            balance: current.balance + delta,
        })
    }

    fn commit(mut self) -> EngineResult<()> {
        let mut tables = self.store.tables.write();

        // Validate before touching anything so a failed commit changes nothing.
        if let Some(employee_id) = self
            .balance_deltas
            .keys()
            .find(|employee_id| !tables.balances.contains_key(employee_id))
        {
            return Err(EngineError::NoBalanceRecord {
                employee_id: *employee_id,
            });
        }

        for vacation_id in &self.deleted {
            tables.vacations.remove(vacation_id);
        }
        for vacation in self.created.drain(..) {
            tables.vacations.insert(vacation.id, vacation);
        }
        for (employee_id, delta) in &self.balance_deltas {
            if let Some(balance) = tables.balances.get_mut(employee_id) {
                *balance += delta;
            }
        }

        self.finished = true;
        trace!(
            deleted = self.deleted.len(),
            balances = self.balance_deltas.len(),
            "transaction committed"
        );
        Ok(())
    }

    fn rollback(mut self) {
        self.finished = true;
        trace!(staged = !self.is_empty(), "transaction rolled back");
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.is_empty() {
            trace!("transaction dropped without commit; staged writes discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VacationRequest, VacationType};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    fn employee(first: &str, last: &str) -> Employee {
        Employee {
            id: EmployeeId::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            team_id: None,
            region: "Europe/Paris".to_string(),
        }
    }

    fn vacation(employee_id: EmployeeId, start: u32, end: u32) -> Vacation {
        Vacation::from_request(&VacationRequest::new(
            employee_id,
            date(start),
            date(end),
            VacationType::Paid,
        ))
    }

    fn seeded() -> (InMemoryStore, Employee) {
        let store = InMemoryStore::new();
        let alice = employee("Alice", "Martin");
        store.insert_employee(alice.clone(), 10).unwrap();
        (store, alice)
    }

    #[test]
    fn test_commit_makes_writes_visible() {
        let (store, alice) = seeded();
        let mut tx = store.begin().unwrap();
        tx.create_vacation(vacation(alice.id, 4, 8)).unwrap();
        tx.update_balance(alice.id, -5).unwrap();

        // Not visible before commit
        assert_eq!(store.vacation_count(), 0);
        assert_eq!(store.balance(alice.id).unwrap().unwrap().balance, 10);

        tx.commit().unwrap();
        assert_eq!(store.vacation_count(), 1);
        assert_eq!(store.balance(alice.id).unwrap().unwrap().balance, 5);
    }

    #[test]
    fn test_rollback_discards_writes() {
        let (store, alice) = seeded();
        let existing = vacation(alice.id, 1, 2);
        {
            let mut tx = store.begin().unwrap();
            tx.create_vacation(existing.clone()).unwrap();
            tx.commit().unwrap();
        }

        let mut tx = store.begin().unwrap();
        tx.replace_vacations(&[existing.id], vacation(alice.id, 1, 9))
            .unwrap();
        tx.update_balance(alice.id, -7).unwrap();
        tx.rollback();

        let stored = store
            .query_vacations(&VacationQuery::new().for_employee(alice.id))
            .unwrap();
        assert_eq!(stored, vec![existing]);
        assert_eq!(store.balance(alice.id).unwrap().unwrap().balance, 10);
    }

    #[test]
    fn test_drop_without_commit_rolls_back() {
        let (store, alice) = seeded();
        {
            let mut tx = store.begin().unwrap();
            tx.create_vacation(vacation(alice.id, 4, 8)).unwrap();
        }
        assert_eq!(store.vacation_count(), 0);
    }

    #[test]
    fn test_transaction_reads_its_own_writes() {
        let (store, alice) = seeded();
        let first = vacation(alice.id, 11, 12);
        let second = vacation(alice.id, 4, 5);
        let mut tx = store.begin().unwrap();
        tx.create_vacation(first.clone()).unwrap();
        tx.create_vacation(second.clone()).unwrap();

        assert_eq!(tx.find_vacations(alice.id).unwrap(), vec![second.clone(), first.clone()]);

        tx.delete_vacations(&[first.id]).unwrap();
        assert_eq!(tx.get_vacation(first.id).unwrap(), None);
        assert_eq!(tx.get_vacation(second.id).unwrap(), Some(second));

        assert_eq!(tx.update_balance(alice.id, -2).unwrap().balance, 8);
        assert_eq!(tx.update_balance(alice.id, -1).unwrap().balance, 7);
        assert_eq!(tx.get_balance(alice.id).unwrap().unwrap().balance, 7);
    }

    #[test]
    fn test_update_balance_without_row_fails() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().unwrap();
        let ghost = EmployeeId::new();
        match tx.update_balance(ghost, -1) {
            Err(EngineError::NoBalanceRecord { employee_id }) => assert_eq!(employee_id, ghost),
            other => panic!("Expected NoBalanceRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_commit_fails_atomically_when_balance_row_vanished() {
        let (store, alice) = seeded();
        let mut tx = store.begin().unwrap();
        tx.create_vacation(vacation(alice.id, 4, 8)).unwrap();
        tx.update_balance(alice.id, -5).unwrap();

        store.delete_employee(alice.id).unwrap();

        assert!(matches!(
            tx.commit(),
            Err(EngineError::NoBalanceRecord { .. })
        ));
        assert_eq!(store.vacation_count(), 0);
    }

    #[test]
    fn test_delete_employee_cascades() {
        let (store, alice) = seeded();
        let bob = employee("Bob", "Durand");
        store.insert_employee(bob.clone(), 10).unwrap();

        let mut tx = store.begin().unwrap();
        tx.create_vacation(vacation(alice.id, 4, 8)).unwrap();
        tx.create_vacation(vacation(bob.id, 4, 8)).unwrap();
        tx.commit().unwrap();

        let removed = store.delete_employee(alice.id).unwrap();
        assert_eq!(removed.map(|e| e.id), Some(alice.id));
        assert_eq!(store.balance(alice.id).unwrap(), None);
        assert_eq!(store.vacation_count(), 1);
        assert_eq!(store.delete_employee(alice.id).unwrap(), None);
    }

    #[test]
    fn test_team_names_are_unique_ignoring_case() {
        let store = InMemoryStore::new();
        store.insert_team(Team::new("Platform")).unwrap();
        match store.insert_team(Team::new("PLATFORM")) {
            Err(EngineError::TeamAlreadyExists { name }) => assert_eq!(name, "PLATFORM"),
            other => panic!("Expected TeamAlreadyExists, got {:?}", other),
        }
        assert!(store.find_team_by_name("platform").unwrap().is_some());
    }

    #[test]
    fn test_team_members_and_update_employee() {
        let (store, mut alice) = seeded();
        let team = Team::new("Finance");
        store.insert_team(team.clone()).unwrap();
        assert!(store.team_members(team.id).unwrap().is_empty());

        alice.team_id = Some(team.id);
        store.update_employee(alice.clone()).unwrap();
        assert_eq!(store.team_members(team.id).unwrap(), vec![alice]);

        let stranger = employee("Nobody", "Known");
        assert!(matches!(
            store.update_employee(stranger),
            Err(EngineError::EmployeeNotFound { .. })
        ));
    }

    #[test]
    fn test_query_vacations_sorted_by_start() {
        let (store, alice) = seeded();
        let mut tx = store.begin().unwrap();
        for (start, end) in [(20, 21), (4, 5), (11, 12)] {
            tx.create_vacation(vacation(alice.id, start, end)).unwrap();
        }
        tx.commit().unwrap();

        let starts: Vec<_> = store
            .query_vacations(&VacationQuery::new())
            .unwrap()
            .iter()
            .map(|v| v.start_date)
            .collect();
        assert_eq!(starts, vec![date(4), date(11), date(20)]);
    }

    #[test]
    fn test_clones_share_tables() {
        let (store, alice) = seeded();
        let handle = store.clone();
        assert!(handle.get_employee(alice.id).unwrap().is_some());
    }
}
