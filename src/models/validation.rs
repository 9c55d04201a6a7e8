//! Pre-run validation models.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Severity attached to a cycle-level validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSeverity {
    /// Informational.
    Low,
    /// Needs review before disbursement.
    Medium,
    /// Blocks a clean run.
    High,
    /// Blocks a clean run and needs immediate attention.
    Critical,
}

impl CheckSeverity {
    /// Returns true if failures at this severity fail the check outright.
    pub fn is_blocking(&self) -> bool {
        matches!(self, CheckSeverity::High | CheckSeverity::Critical)
    }
}

/// Outcome of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// No affected records.
    Passed,
    /// Affected records at a non-blocking severity.
    Warning,
    /// Affected records at a blocking severity.
    Failed,
}

impl CheckStatus {
    /// Derives the status from severity and the number of failing records.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{CheckSeverity, CheckStatus};
    ///
    /// assert_eq!(CheckStatus::from_count(CheckSeverity::High, 0), CheckStatus::Passed);
    /// assert_eq!(CheckStatus::from_count(CheckSeverity::Medium, 3), CheckStatus::Warning);
    /// assert_eq!(CheckStatus::from_count(CheckSeverity::Critical, 1), CheckStatus::Failed);
    /// ```
    pub fn from_count(severity: CheckSeverity, affected_count: usize) -> Self {
        if affected_count == 0 {
            CheckStatus::Passed
        } else if severity.is_blocking() {
            CheckStatus::Failed
        } else {
            CheckStatus::Warning
        }
    }
}

/// The result of one named check over a whole cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheck {
    /// Grouping such as "attendance" or "data_integrity".
    pub category: String,
    /// Human-readable check name.
    pub check_name: String,
    /// Severity assigned to the check.
    pub severity: CheckSeverity,
    /// Number of records that failed the check.
    pub affected_count: usize,
    /// Derived outcome.
    pub status: CheckStatus,
    /// Ids of the affected records.
    #[serde(default)]
    pub affected_record_ids: Vec<String>,
}

impl ValidationCheck {
    /// Builds a check result, deriving its status.
    pub fn new(
        category: impl Into<String>,
        check_name: impl Into<String>,
        severity: CheckSeverity,
        affected_record_ids: Vec<String>,
    ) -> Self {
        let affected_count = affected_record_ids.len();
        Self {
            category: category.into(),
            check_name: check_name.into(),
            severity,
            affected_count,
            status: CheckStatus::from_count(severity, affected_count),
            affected_record_ids,
        }
    }
}

/// Percentage of checks that passed, rounded to a whole number.
///
/// Informational only: a low score never blocks a pay run unless the caller
/// opts into a gating policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadinessScore(pub u8);

impl ReadinessScore {
    /// Computes `round(100 * passed / total)`; an empty set of checks scores 0.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::ReadinessScore;
    ///
    /// assert_eq!(ReadinessScore::from_counts(4, 6), ReadinessScore(67));
    /// ```
    pub fn from_counts(passed: usize, total: usize) -> Self {
        if total == 0 {
            return ReadinessScore(0);
        }

        let ratio = Decimal::from(100 * passed.min(total)) / Decimal::from(total);
        let rounded = ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        ReadinessScore(rounded.to_u8().unwrap_or(0))
    }

    /// Scores a set of checks.
    pub fn from_checks(checks: &[ValidationCheck]) -> Self {
        let passed = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Passed)
            .count();
        Self::from_counts(passed, checks.len())
    }

    /// Returns the score as a percentage.
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Everything the pre-run dashboard needs for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    /// The cycle that was validated.
    pub cycle_id: String,
    /// The individual check results, in catalog order.
    pub checks: Vec<ValidationCheck>,
    /// Overall readiness score.
    pub score: ReadinessScore,
    /// Number of checks that passed.
    pub passed: usize,
    /// Number of checks with warnings.
    pub warnings: usize,
    /// Number of checks that failed.
    pub failed: usize,
}

impl ReadinessReport {
    /// Builds a report from check results.
    pub fn new(cycle_id: impl Into<String>, checks: Vec<ValidationCheck>) -> Self {
        let count = |status: CheckStatus| checks.iter().filter(|c| c.status == status).count();
        let passed = count(CheckStatus::Passed);
        let warnings = count(CheckStatus::Warning);
        let failed = count(CheckStatus::Failed);
        let score = ReadinessScore::from_checks(&checks);

        Self {
            cycle_id: cycle_id.into(),
            checks,
            score,
            passed,
            warnings,
            failed,
        }
    }
}
