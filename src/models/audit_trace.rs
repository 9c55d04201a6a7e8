//! Audit trail models.
//!
//! Each deduction component records an [`AuditStep`] describing what went in,
//! what came out, and why, so payslip and ledger consumers can explain a
//! figure without recomputing it.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The ordered audit trace for one record's deductions.
///
/// Contains no timestamps or durations, so two traces of the same input are equal.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
}

impl AuditTrace {
    /// Appends a step.
    pub fn push(&mut self, step: AuditStep) {
        self.steps.push(step);
    }

    /// Returns the rule ids in step order.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.rule_id.as_str()).collect()
    }

    /// Returns the step for a rule id, if present.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}
