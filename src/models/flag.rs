//! Anomaly and compliance flag models.
//!
//! Flags are transient: they are regenerated on every scan and never
//! persisted by the engine.

use serde::{Deserialize, Serialize};

/// How serious a record-level flag is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth a look, does not by itself make the record unpayable.
    Warning,
    /// The record should not be paid as-is.
    Critical,
}

/// A structurally or numerically suspicious record.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AnomalyFlag, Severity};
///
/// let flag = AnomalyFlag {
///     rule_id: "NET_NEGATIVE".to_string(),
///     severity: Severity::Critical,
///     message: "Deductions exceed gross pay".to_string(),
///     record_id: "emp_001".to_string(),
/// };
/// assert!(flag.is_critical());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    /// Identifier of the rule that fired.
    pub rule_id: String,
    /// Severity of the finding.
    pub severity: Severity,
    /// Human-readable explanation.
    pub message: String,
    /// The record the flag refers to (may be empty for records without identity).
    pub record_id: String,
}

impl AnomalyFlag {
    /// Returns true for critical flags.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// A statutory-policy violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceViolation {
    /// Identifier of the rule that fired.
    pub rule_id: String,
    /// Severity of the violation.
    pub severity: Severity,
    /// Human-readable explanation.
    pub message: String,
    /// The record the violation refers to.
    pub record_id: String,
}

impl ComplianceViolation {
    /// Returns true for critical violations.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}
