//! Pre-merge validation.
//!
//! Validators look at a candidate request and the existing vacations it touches,
//! and either pass or reject the whole reconciliation before anything is
//! written. Each rule is its own [`VacationValidator`]; the service runs them
//! through a [`ValidatorChain`].

use thiserror::Error;

use crate::models::{Vacation, VacationId, VacationRequest, VacationType};

/// Errors raised by validators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A touching vacation has a different type than the request.
    #[error(
        "cannot merge a {requested} vacation with {existing} vacation {vacation_id}: types differ"
    )]
    TypeMismatch {
        /// The touching vacation with the other type.
        vacation_id: VacationId,
        /// The type of the request.
        requested: VacationType,
        /// The type of the touching vacation.
        existing: VacationType,
    },
}

/// A single pre-merge rule.
///
/// Implementations must be free of side effects.
pub trait VacationValidator: Send + Sync {
    /// Short identifier used in logs and audit traces.
    fn name(&self) -> &'static str;

    /// Passes, or returns why the request cannot absorb `touching`.
    fn validate(
        &self,
        candidate: &VacationRequest,
        touching: &[Vacation],
    ) -> Result<(), ValidationError>;
}

/// Rejects merging vacations of different types: a paid request may not
/// absorb an unpaid vacation and vice versa.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeConsistencyValidator;

impl VacationValidator for TypeConsistencyValidator {
    fn name(&self) -> &'static str {
        "type_consistency"
    }

    fn validate(
        &self,
        candidate: &VacationRequest,
        touching: &[Vacation],
    ) -> Result<(), ValidationError> {
        match touching
            .iter()
            .find(|vacation| vacation.vacation_type != candidate.vacation_type)
        {
            Some(mismatch) => Err(ValidationError::TypeMismatch {
                vacation_id: mismatch.id,
                requested: candidate.vacation_type,
                existing: mismatch.vacation_type,
            }),
            None => Ok(()),
        }
    }
}

/// An ordered list of validators; the first failure wins.
pub struct ValidatorChain {
    validators: Vec<Box<dyn VacationValidator>>,
}

impl ValidatorChain {
    /// A chain with no rules; every request passes.
    pub fn empty() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Appends a validator.
    pub fn with(mut self, validator: impl VacationValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Names of the registered validators, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no validator is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Runs every validator in order, stopping at the first rejection.
    pub fn validate(
        &self,
        candidate: &VacationRequest,
        touching: &[Vacation],
    ) -> Result<(), ValidationError> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.validate(candidate, touching))
    }
}

impl Default for ValidatorChain {
    fn default() -> Self {
        Self::empty().with(TypeConsistencyValidator)
    }
}

impl std::fmt::Debug for ValidatorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorChain")
            .field("validators", &self.names())
            .finish()
    }
}
