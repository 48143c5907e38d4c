//! Persistence seam for employees, teams, vacations, and balances.
//!
//! The engine talks to storage through two traits:
//!
//! - [`VacationStore`]: the store itself. Roster operations (employees, teams)
//!   auto-commit; vacation and balance writes go through a transaction.
//! - [`StoreTransaction`]: a unit of work. Every write made through it becomes
//!   visible atomically on [`commit`](StoreTransaction::commit), or not at all
//!   if the transaction is rolled back or dropped.
//!
//! [`InMemoryStore`] is the bundled implementation.

mod memory;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Balance, DateSpan, Employee, EmployeeId, Team, TeamId, Vacation, VacationId, VacationType,
};

pub use memory::{InMemoryStore, MemoryTransaction};

/// A unit of work over vacations and balances.
///
/// Reads see the transaction's own uncommitted writes.
pub trait StoreTransaction {
    /// Looks up a vacation by id.
    fn get_vacation(&self, vacation_id: VacationId) -> EngineResult<Option<Vacation>>;

    /// All vacations of an employee, ordered by start date.
    fn find_vacations(&self, employee_id: EmployeeId) -> EngineResult<Vec<Vacation>>;

    /// Stages a new vacation.
    fn create_vacation(&mut self, vacation: Vacation) -> EngineResult<()>;

    /// Stages the deletion of vacations. Unknown ids are ignored.
    fn delete_vacations(&mut self, vacation_ids: &[VacationId]) -> EngineResult<()>;

    /// Stages the replacement of `superseded` by `replacement`.
    fn replace_vacations(
        &mut self,
        superseded: &[VacationId],
        replacement: Vacation,
    ) -> EngineResult<()> {
        self.delete_vacations(superseded)?;
        self.create_vacation(replacement)
    }

    /// Reads an employee's balance, including staged adjustments.
    fn get_balance(&self, employee_id: EmployeeId) -> EngineResult<Option<Balance>>;

    /// Stages `delta` working days onto the balance and returns the new value.
    ///
    /// # Errors
    ///
    /// `NoBalanceRecord` if the employee has no balance row.
    fn update_balance(&mut self, employee_id: EmployeeId, delta: i64) -> EngineResult<Balance>;

    /// Makes every staged write visible at once.
    fn commit(self) -> EngineResult<()>
    where
        Self: Sized;

    /// Discards every staged write. Dropping the transaction has the same effect.
    fn rollback(self)
    where
        Self: Sized;
}

/// The storage backend.
pub trait VacationStore: Send + Sync {
    /// The transaction type handed out by [`begin`](Self::begin).
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    /// Opens a transaction.
    fn begin(&self) -> EngineResult<Self::Transaction<'_>>;

    /// Returns true if the backend can serve requests.
    fn is_healthy(&self) -> bool {
        true
    }

    // --- employees ---

    /// Inserts an employee together with their opening balance.
    fn insert_employee(&self, employee: Employee, opening_balance: i64) -> EngineResult<()>;

    /// Looks up an employee by id.
    fn get_employee(&self, employee_id: EmployeeId) -> EngineResult<Option<Employee>>;

    /// Replaces a stored employee record.
    ///
    /// # Errors
    ///
    /// `EmployeeNotFound` if no employee has that id.
    fn update_employee(&self, employee: Employee) -> EngineResult<()>;

    /// Removes an employee with their balance and vacations, returning the record.
    fn delete_employee(&self, employee_id: EmployeeId) -> EngineResult<Option<Employee>>;

    /// Every employee, in no particular order.
    fn list_employees(&self) -> EngineResult<Vec<Employee>>;

    // --- teams ---

    /// Inserts a team.
    ///
    /// # Errors
    ///
    /// `TeamAlreadyExists` if a team with the same name, ignoring case, exists.
    fn insert_team(&self, team: Team) -> EngineResult<()>;

    /// Looks up a team by id.
    fn get_team(&self, team_id: TeamId) -> EngineResult<Option<Team>>;

    /// Looks up a team by name, ignoring case.
    fn find_team_by_name(&self, name: &str) -> EngineResult<Option<Team>>;

    /// The employees whose `team_id` is `team_id`.
    fn team_members(&self, team_id: TeamId) -> EngineResult<Vec<Employee>>;

    // --- reads outside a transaction ---

    /// Looks up a committed vacation by id.
    fn vacation(&self, vacation_id: VacationId) -> EngineResult<Option<Vacation>>;

    /// Current committed balance of an employee.
    fn balance(&self, employee_id: EmployeeId) -> EngineResult<Option<Balance>>;

    /// Committed vacations matching `query`, ordered by start date.
    fn query_vacations(&self, query: &VacationQuery) -> EngineResult<Vec<Vacation>>;
}

/// Declarative filter over committed vacations.
///
/// Empty predicates match everything.
///
/// # Example
///
/// ```
/// use vacation_engine::models::{DateSpan, VacationType};
/// use vacation_engine::store::VacationQuery;
/// use chrono::NaiveDate;
///
/// let query = VacationQuery::new()
///     .overlapping(
///         NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(),
///     )
///     .unwrap()
///     .of_type(VacationType::Paid);
/// assert_eq!(query.vacation_type, Some(VacationType::Paid));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacationQuery {
    /// Only vacations of this employee.
    pub employee_id: Option<EmployeeId>,
    /// Only vacations sharing at least one day with this span.
    pub overlapping: Option<DateSpan>,
    /// Only vacations of this type.
    pub vacation_type: Option<VacationType>,
}

impl VacationQuery {
    /// A query matching every vacation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one employee.
    pub fn for_employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    /// Restricts to vacations overlapping `[start_date, end_date]`.
    pub fn overlapping(mut self, start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        self.overlapping = Some(DateSpan::new(start_date, end_date)?);
        Ok(self)
    }

    /// Restricts to one vacation type.
    pub fn of_type(mut self, vacation_type: VacationType) -> Self {
        self.vacation_type = Some(vacation_type);
        self
    }

    /// Returns true if the vacation satisfies every predicate.
    pub fn matches(&self, vacation: &Vacation) -> bool {
        self.employee_id
            .is_none_or(|employee_id| vacation.employee_id == employee_id)
            && self
                .overlapping
                .is_none_or(|span| span.overlaps(&vacation.span()))
            && self
                .vacation_type
                .is_none_or(|vacation_type| vacation.vacation_type == vacation_type)
    }
}

/// Fails with `EmployeeNotFound` unless the employee exists.
pub fn require_employee<S: VacationStore + ?Sized>(
    store: &S,
    employee_id: EmployeeId,
) -> EngineResult<Employee> {
    store
        .get_employee(employee_id)?
        .ok_or(EngineError::EmployeeNotFound { employee_id })
}
