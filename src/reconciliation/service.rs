//! The vacation reconciliation service.
//!
//! Every create or update runs the same pipeline inside one store transaction,
//! under the employee's lock:
//!
//! ```text
//! FIND_TOUCHING → VALIDATE → (MERGE_AND_REPLACE | DIRECT_CREATE) → COST_AND_DEBIT → DONE
//! ```
//!
//! Balance policy:
//!
//! - every vacation, paid or unpaid, costs its working days;
//! - records superseded by a merge or an update are credited back before the
//!   final record is debited, so the balance always equals the opening balance
//!   minus the cost of the active vacations;
//! - on both create and update, the net extra cost must be covered by the
//!   current balance, otherwise the request fails with `InsufficientBalance`.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::comparison::shared_days;
use super::ledger;
use super::locks::EmployeeLocks;
use super::overlap::{find_touching_excluding, merge};
use super::validator::ValidatorChain;
use crate::calendar::WorkingDayCalendar;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, Balance, DateSpan, Employee, EmployeeId, ReconciliationResult,
    ReconciliationStage, Vacation, VacationId, VacationRequest, VacationType,
};
use crate::store::{StoreTransaction, VacationQuery, VacationStore, require_employee};

/// The version stamped on every [`ReconciliationResult`].
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Orchestrates overlap detection, validation, merging, costing and the
/// balance ledger for one store.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vacation_engine::calendar::WorkingDayCalendar;
/// use vacation_engine::models::{Employee, EmployeeId, VacationRequest, VacationType};
/// use vacation_engine::reconciliation::{EmployeeLocks, VacationService};
/// use vacation_engine::store::{InMemoryStore, VacationStore};
/// use chrono::NaiveDate;
///
/// let store = InMemoryStore::new();
/// let employee = Employee {
///     id: EmployeeId::new(),
///     first_name: "Louise".to_string(),
///     last_name: "Michel".to_string(),
///     team_id: None,
///     region: "Europe/Paris".to_string(),
/// };
/// store.insert_employee(employee.clone(), 10).unwrap();
///
/// let service = VacationService::new(
///     store,
///     Arc::new(WorkingDayCalendar::default()),
///     EmployeeLocks::new(),
/// );
/// let d = |day| NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
///
/// service
///     .create_vacation(VacationRequest::new(employee.id, d(1), d(5), VacationType::Paid))
///     .unwrap();
/// let result = service
///     .create_vacation(VacationRequest::new(employee.id, d(6), d(10), VacationType::Paid))
///     .unwrap();
///
/// assert_eq!(result.vacation.start_date, d(1));
/// assert_eq!(result.vacation.end_date, d(10));
/// assert_eq!(result.balance.balance, 5);
/// ```
pub struct VacationService<S: VacationStore> {
    store: S,
    calendar: Arc<WorkingDayCalendar>,
    locks: EmployeeLocks,
    validators: ValidatorChain,
}

impl<S: VacationStore> VacationService<S> {
    /// Creates a service with the default validator chain.
    pub fn new(store: S, calendar: Arc<WorkingDayCalendar>, locks: EmployeeLocks) -> Self {
        Self {
            store,
            calendar,
            locks,
            validators: ValidatorChain::default(),
        }
    }

    /// Replaces the validator chain.
    pub fn with_validators(mut self, validators: ValidatorChain) -> Self {
        self.validators = validators;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The working-day calendar used for costing.
    pub fn calendar(&self) -> &WorkingDayCalendar {
        &self.calendar
    }

    /// Books a vacation, merging it with any touching vacation of the same
    /// employee, and debits its cost.
    ///
    /// # Errors
    ///
    /// - `InvalidDateRange` if the request ends before it starts
    /// - `EmployeeNotFound` if the employee does not exist
    /// - `UnsupportedRegion` if the employee's region has no calendar
    /// - `Validation` if a touching vacation has a different type
    /// - `InsufficientBalance` if the balance cannot cover the extra days
    /// - `NoBalanceRecord` or `Store` on integrity or storage failures
    ///
    /// Nothing is persisted when an error is returned.
    pub fn create_vacation(&self, request: VacationRequest) -> EngineResult<ReconciliationResult> {
        let started = Instant::now();
        request.span()?;
        let employee = require_employee(&self.store, request.employee_id)?;
        self.calendar.region(&employee.region)?;

        self.locks.with_employee(employee.id, || {
            // The employee may have been deleted while we waited for the lock
            let employee = require_employee(&self.store, employee.id)?;
            self.reconcile(&employee, &request, None, started)
        })
    }

    /// Replaces a vacation with new dates or type, merging the result with any
    /// other touching vacation of the employee.
    ///
    /// The vacation being updated never counts as touching itself. The old
    /// record is credited back before the new one is costed.
    ///
    /// # Errors
    ///
    /// Same as [`create_vacation`](Self::create_vacation), plus
    /// `VacationNotFound` for an unknown id and `InvalidRequest` when the
    /// request names a different employee than the vacation.
    pub fn update_vacation(
        &self,
        vacation_id: VacationId,
        request: VacationRequest,
    ) -> EngineResult<ReconciliationResult> {
        let started = Instant::now();
        request.span()?;
        let current = self
            .store
            .vacation(vacation_id)?
            .ok_or(EngineError::VacationNotFound { vacation_id })?;
        if current.employee_id != request.employee_id {
            return Err(EngineError::InvalidRequest {
                message: format!(
                    "vacation {} belongs to employee {}, not {}",
                    vacation_id, current.employee_id, request.employee_id
                ),
            });
        }
        let employee = require_employee(&self.store, current.employee_id)?;
        self.calendar.region(&employee.region)?;

        self.locks.with_employee(employee.id, || {
            // Re-read under the lock: the employee may be gone, or a concurrent
            // merge may have absorbed the vacation.
            let employee = require_employee(&self.store, employee.id)?;
            let tx = self.store.begin()?;
            let current = tx
                .get_vacation(vacation_id)?
                .ok_or(EngineError::VacationNotFound { vacation_id })?;
            tx.rollback();
            self.reconcile(&employee, &request, Some(current), started)
        })
    }

    /// Deletes a vacation and credits its cost back to the balance.
    ///
    /// Returns the balance after the credit.
    pub fn delete_vacation(&self, vacation_id: VacationId) -> EngineResult<Balance> {
        let vacation = self
            .store
            .vacation(vacation_id)?
            .ok_or(EngineError::VacationNotFound { vacation_id })?;
        let employee = require_employee(&self.store, vacation.employee_id)?;
        let calendar = self.calendar.region(&employee.region)?;

        self.locks.with_employee(employee.id, || {
            let mut tx = self.store.begin()?;
            let vacation = tx
                .get_vacation(vacation_id)?
                .ok_or(EngineError::VacationNotFound { vacation_id })?;
            let workdays = calendar.working_days(vacation.span());

            tx.delete_vacations(&[vacation.id])?;
            let balance = ledger::credit_for_vacation(&mut tx, employee.id, workdays)?;
            tx.commit()?;

            info!(
                employee_id = %employee.id,
                vacation_id = %vacation.id,
                workdays,
                balance = balance.balance,
                "Vacation deleted"
            );
            Ok(balance)
        })
    }

    /// All vacations of an employee, ordered by start date.
    pub fn list_vacations(&self, employee_id: EmployeeId) -> EngineResult<Vec<Vacation>> {
        require_employee(&self.store, employee_id)?;
        self.store
            .query_vacations(&VacationQuery::new().for_employee(employee_id))
    }

    /// Employees with at least one vacation overlapping `[start_date, end_date]`,
    /// optionally restricted to one vacation type.
    ///
    /// Each employee appears once; the list is ordered by last name, first name
    /// and id.
    pub fn employees_on_vacation(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        vacation_type: Option<VacationType>,
    ) -> EngineResult<Vec<Employee>> {
        let mut query = VacationQuery::new().overlapping(start_date, end_date)?;
        if let Some(vacation_type) = vacation_type {
            query = query.of_type(vacation_type);
        }

        let employee_ids: BTreeSet<EmployeeId> = self
            .store
            .query_vacations(&query)?
            .into_iter()
            .map(|vacation| vacation.employee_id)
            .collect();

        let mut employees = Vec::with_capacity(employee_ids.len());
        for employee_id in employee_ids {
            if let Some(employee) = self.store.get_employee(employee_id)? {
                employees.push(employee);
            }
        }
        employees.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(employees)
    }

    /// Days within `[start_date, end_date]` on which both employees are on
    /// vacation, ascending.
    pub fn shared_vacation_days(
        &self,
        first: EmployeeId,
        second: EmployeeId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> EngineResult<Vec<NaiveDate>> {
        let window = DateSpan::new(start_date, end_date)?;
        require_employee(&self.store, first)?;
        require_employee(&self.store, second)?;

        let vacations_of = |employee_id: EmployeeId| -> EngineResult<Vec<Vacation>> {
            self.store.query_vacations(
                &VacationQuery::new()
                    .for_employee(employee_id)
                    .overlapping(window.start_date, window.end_date)?,
            )
        };
        Ok(shared_days(&vacations_of(first)?, &vacations_of(second)?, window))
    }

    /// Runs the pipeline for `request`. `replacing` is the record being
    /// updated, if any. Must be called under the employee's lock.
    fn reconcile(
        &self,
        employee: &Employee,
        request: &VacationRequest,
        replacing: Option<Vacation>,
        started: Instant,
    ) -> EngineResult<ReconciliationResult> {
        let calendar = self.calendar.region(&employee.region)?;
        let mut trace = AuditTrace::default();
        let mut tx = self.store.begin()?;

        // FIND_TOUCHING
        let existing = tx.find_vacations(employee.id)?;
        let touching = find_touching_excluding(
            &existing,
            request,
            replacing.as_ref().map(|vacation| vacation.id),
        );
        let touching_ids: Vec<VacationId> = touching.iter().map(|v| v.id).collect();
        trace.record(
            ReconciliationStage::FindTouching,
            json!({
                "employee_id": employee.id,
                "start_date": request.start_date,
                "end_date": request.end_date,
                "type": request.vacation_type,
                "replacing": replacing.as_ref().map(|v| v.id),
            }),
            json!({ "touching": touching_ids }),
            format!(
                "{} of {} existing vacation(s) overlap or adjoin {}..={}",
                touching.len(),
                existing.len(),
                request.start_date,
                request.end_date
            ),
        );

        // VALIDATE
        if let Err(err) = self.validators.validate(request, &touching) {
            warn!(employee_id = %employee.id, error = %err, "Vacation rejected by validator");
            return Err(err.into());
        }
        trace.record(
            ReconciliationStage::Validate,
            json!({ "validators": self.validators.names() }),
            json!({ "passed": true }),
            "All validators passed",
        );

        let merged_span = merge(request, &touching);
        let vacation = Vacation::from_request(&request.with_span(merged_span));
        let superseded: Vec<Vacation> = replacing.into_iter().chain(touching).collect();
        let superseded_ids: Vec<VacationId> = superseded.iter().map(|v| v.id).collect();

        let workdays = calendar.working_days(merged_span);
        let credits: Vec<u32> = superseded
            .iter()
            .map(|v| calendar.working_days(v.span()))
            .collect();
        let credited: i64 = credits.iter().copied().map(i64::from).sum();
        let net_cost = i64::from(workdays) - credited;
        if net_cost > 0 {
            ledger::ensure_affordable(&tx, employee.id, net_cost)?;
        }

        // MERGE_AND_REPLACE | DIRECT_CREATE
        if superseded.is_empty() {
            tx.create_vacation(vacation.clone())?;
            trace.record(
                ReconciliationStage::DirectCreate,
                json!({ "span": merged_span }),
                json!({ "vacation_id": vacation.id }),
                "No touching vacation; stored as requested",
            );
        } else {
            tx.replace_vacations(&superseded_ids, vacation.clone())?;
            trace.record(
                ReconciliationStage::MergeAndReplace,
                json!({ "superseded": superseded_ids, "requested": {
                    "start_date": request.start_date,
                    "end_date": request.end_date,
                }}),
                json!({ "vacation_id": vacation.id, "span": merged_span }),
                format!(
                    "Replaced {} record(s) with one vacation spanning {}",
                    superseded_ids.len(),
                    merged_span
                ),
            );
        }

        // COST_AND_DEBIT
        for (superseded_vacation, cost) in superseded.iter().zip(&credits) {
            debug!(vacation_id = %superseded_vacation.id, workdays = cost, "Crediting superseded vacation");
            ledger::credit_for_vacation(&mut tx, employee.id, *cost)?;
        }
        let balance = ledger::debit_for_vacation(&mut tx, employee.id, workdays)?;
        trace.record(
            ReconciliationStage::CostAndDebit,
            json!({
                "region": employee.region,
                "span": merged_span,
                "credited": credited,
            }),
            json!({ "workdays": workdays, "balance": balance.balance }),
            format!(
                "{} working day(s) in {}; {} credited back, balance now {}",
                workdays, merged_span, credited, balance.balance
            ),
        );
        if workdays == 0 {
            trace.warn(
                "ZERO_WORKDAYS",
                format!("{} contains no working day in {}", merged_span, employee.region),
                "low",
            );
        }

        tx.commit()?;
        trace.record(
            ReconciliationStage::Done,
            json!({}),
            json!({ "committed": true }),
            "Transaction committed",
        );
        trace.duration_us = started.elapsed().as_micros() as u64;

        info!(
            employee_id = %employee.id,
            vacation_id = %vacation.id,
            superseded = superseded_ids.len(),
            workdays,
            balance = balance.balance,
            duration_us = trace.duration_us,
            "Vacation reconciled"
        );

        Ok(ReconciliationResult {
            reconciliation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            vacation,
            superseded: superseded_ids,
            workdays,
            balance,
            audit_trace: trace,
        })
    }
}

impl<S: VacationStore + std::fmt::Debug> std::fmt::Debug for VacationService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VacationService")
            .field("store", &self.store)
            .field("regions", &self.calendar.regions())
            .field("validators", &self.validators)
            .finish()
    }
}
