//! Reconciliation result models.
//!
//! This module contains the [`ReconciliationResult`] returned by every create or
//! update of a vacation, together with the audit trace recording which stages
//! of the reconciliation ran and what they decided.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Balance, Vacation, VacationId};

/// The stages a reconciliation passes through.
///
/// `FindTouching → Validate → (MergeAndReplace | DirectCreate) → CostAndDebit → Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconciliationStage {
    /// Existing vacations overlapping or adjacent to the request are collected.
    FindTouching,
    /// Every registered validator inspects the request and the touching set.
    Validate,
    /// Touching records are deleted and replaced by one merged record.
    MergeAndReplace,
    /// Nothing touched the request; it is stored as given.
    DirectCreate,
    /// The final record is costed in working days and the balance adjusted.
    CostAndDebit,
    /// The transaction committed.
    Done,
}

impl ReconciliationStage {
    /// Stable identifier used as the audit `rule_id`.
    pub fn rule_id(&self) -> &'static str {
        match self {
            ReconciliationStage::FindTouching => "find_touching",
            ReconciliationStage::Validate => "validate",
            ReconciliationStage::MergeAndReplace => "merge_and_replace",
            ReconciliationStage::DirectCreate => "direct_create",
            ReconciliationStage::CostAndDebit => "cost_and_debit",
            ReconciliationStage::Done => "done",
        }
    }
}

impl fmt::Display for ReconciliationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_id())
    }
}

/// A single step in the audit trace recording a reconciliation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The stage that produced this step.
    pub stage: ReconciliationStage,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during reconciliation.
///
/// Warnings indicate something worth a second look that did not stop the
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a reconciliation.
///
/// # Example
///
/// ```
/// use vacation_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of reconciliation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during reconciliation.
    pub warnings: Vec<AuditWarning>,
    /// The total duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Appends a step, numbering it after the previous one.
    pub fn record(
        &mut self,
        stage: ReconciliationStage,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: impl Into<String>,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            stage,
            input,
            output,
            reasoning: reasoning.into(),
        });
    }

    /// Appends a warning.
    pub fn warn(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) {
        self.warnings.push(AuditWarning {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        });
    }

    /// The stages in the order they were recorded.
    pub fn stages(&self) -> Vec<ReconciliationStage> {
        self.steps.iter().map(|step| step.stage).collect()
    }
}

/// The outcome of creating or updating a vacation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Unique identifier for this reconciliation.
    pub reconciliation_id: Uuid,
    /// When the reconciliation committed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed it.
    pub engine_version: String,
    /// The persisted, final vacation.
    pub vacation: Vacation,
    /// Records deleted because they were merged into (or replaced by) `vacation`.
    pub superseded: Vec<VacationId>,
    /// Working days covered by `vacation`.
    pub workdays: u32,
    /// The employee's balance after the reconciliation.
    pub balance: Balance,
    /// Complete audit trace of the reconciliation.
    pub audit_trace: AuditTrace,
}

impl ReconciliationResult {
    /// Returns true if existing records were merged into, or replaced by, the result.
    pub fn merged(&self) -> bool {
        self.audit_trace
            .stages()
            .contains(&ReconciliationStage::MergeAndReplace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_numbers_steps_sequentially() {
        let mut trace = AuditTrace::default();
        trace.record(
            ReconciliationStage::FindTouching,
            json!({}),
            json!({"touching": 0}),
            "none",
        );
        trace.record(ReconciliationStage::Validate, json!({}), json!({}), "ok");

        assert_eq!(trace.steps[0].step_number, 1);
        assert_eq!(trace.steps[1].step_number, 2);
        assert_eq!(
            trace.stages(),
            vec![
                ReconciliationStage::FindTouching,
                ReconciliationStage::Validate
            ]
        );
    }

    #[test]
    fn test_stage_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ReconciliationStage::MergeAndReplace).unwrap(),
            "\"MERGE_AND_REPLACE\""
        );
        assert_eq!(
            serde_json::to_string(&ReconciliationStage::CostAndDebit).unwrap(),
            "\"COST_AND_DEBIT\""
        );
    }

    #[test]
    fn test_warn_appends_warning() {
        let mut trace = AuditTrace::default();
        trace.warn("ZERO_WORKDAYS", "no working day", "low");
        assert_eq!(trace.warnings.len(), 1);
        assert_eq!(trace.warnings[0].code, "ZERO_WORKDAYS");
        assert_eq!(trace.warnings[0].severity, "low");
    }

    #[test]
    fn test_stage_display_matches_rule_id() {
        assert_eq!(ReconciliationStage::DirectCreate.to_string(), "direct_create");
    }
}
