//! Per-employee mutual exclusion.
//!
//! Two reconciliations for the same employee must not interleave, otherwise
//! both could read the same touching set and double-book or double-debit.
//! Reconciliations for different employees run in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::EmployeeId;

/// A registry of one mutex per employee.
///
/// Cloning yields a handle to the same registry.
#[derive(Debug, Clone, Default)]
pub struct EmployeeLocks {
    inner: Arc<Mutex<HashMap<EmployeeId, Arc<Mutex<()>>>>>,
}

impl EmployeeLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, employee_id: EmployeeId) -> Arc<Mutex<()>> {
        self.inner
            .lock()
            .entry(employee_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Runs `f` while holding the employee's lock.
    pub fn with_employee<R>(&self, employee_id: EmployeeId, f: impl FnOnce() -> R) -> R {
        let lock = self.lock_for(employee_id);
        let _guard = lock.lock();
        f()
    }

    /// Drops the employee's entry. Called when the employee is deleted.
    pub fn forget(&self, employee_id: EmployeeId) {
        self.inner.lock().remove(&employee_id);
    }

    /// Number of employees with a lock entry.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if no lock has been handed out yet.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
