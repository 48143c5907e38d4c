//! Balance ledger.
//!
//! The only code allowed to change a balance. Every adjustment goes through an
//! open [`StoreTransaction`] so it commits or rolls back together with the
//! vacation records it pays for.

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Balance, EmployeeId};
use crate::store::StoreTransaction;

/// Reads the balance as seen by the transaction.
///
/// # Errors
///
/// `NoBalanceRecord` if the employee has no balance row.
pub fn balance<T: StoreTransaction>(tx: &T, employee_id: EmployeeId) -> EngineResult<Balance> {
    tx.get_balance(employee_id)?
        .ok_or(EngineError::NoBalanceRecord { employee_id })
}

/// Returns true if the employee has at least `workdays` days left.
pub fn can_afford<T: StoreTransaction>(
    tx: &T,
    employee_id: EmployeeId,
    workdays: i64,
) -> EngineResult<bool> {
    Ok(balance(tx, employee_id)?.covers(workdays))
}

/// Fails with `InsufficientBalance` unless `workdays` can be afforded.
pub fn ensure_affordable<T: StoreTransaction>(
    tx: &T,
    employee_id: EmployeeId,
    workdays: i64,
) -> EngineResult<()> {
    let current = balance(tx, employee_id)?;
    if current.covers(workdays) {
        Ok(())
    } else {
        Err(EngineError::InsufficientBalance {
            employee_id,
            available: current.balance,
            required: workdays,
        })
    }
}

/// Takes `workdays` off the balance.
pub fn debit_for_vacation<T: StoreTransaction>(
    tx: &mut T,
    employee_id: EmployeeId,
    workdays: u32,
) -> EngineResult<Balance> {
    let updated = tx.update_balance(employee_id, -i64::from(workdays))?;
    debug!(%employee_id, workdays, balance = updated.balance, "Balance debited");
    Ok(updated)
}

/// Gives `workdays` back to the balance.
pub fn credit_for_vacation<T: StoreTransaction>(
    tx: &mut T,
    employee_id: EmployeeId,
    workdays: u32,
) -> EngineResult<Balance> {
    let updated = tx.update_balance(employee_id, i64::from(workdays))?;
    debug!(%employee_id, workdays, balance = updated.balance, "Balance credited");
    Ok(updated)
}
