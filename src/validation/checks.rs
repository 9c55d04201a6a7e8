//! The catalog of cycle-level validation checks.

use serde::{Deserialize, Serialize};

use crate::models::CheckSeverity;
use crate::pipeline::RecordScan;

/// What a validation check looks for in each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRule {
    /// Working days with no attendance entry.
    AttendanceGaps,
    /// Leave taken without approval.
    UnapprovedLeave,
    /// Reimbursement claims not yet verified.
    UnverifiedClaims,
    /// No salary bank account on file.
    MissingBankAccount,
    /// No tax identifier on file.
    MissingTaxId,
    /// Any critical anomaly flag or compliance violation.
    CriticalFlags,
}

impl CheckRule {
    /// Grouping shown on the dashboard.
    pub fn category(&self) -> &'static str {
        match self {
            CheckRule::AttendanceGaps => "attendance",
            CheckRule::UnapprovedLeave => "leave",
            CheckRule::UnverifiedClaims => "claims",
            CheckRule::MissingBankAccount | CheckRule::MissingTaxId => "data_integrity",
            CheckRule::CriticalFlags => "compliance",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            CheckRule::AttendanceGaps => "Attendance gaps",
            CheckRule::UnapprovedLeave => "Unapproved leave",
            CheckRule::UnverifiedClaims => "Unverified reimbursement claims",
            CheckRule::MissingBankAccount => "Missing bank account",
            CheckRule::MissingTaxId => "Missing tax identifier",
            CheckRule::CriticalFlags => "Critical anomaly or compliance flags",
        }
    }

    /// Returns true if `scan` fails this check.
    pub fn fails(&self, scan: &RecordScan) -> bool {
        let record = &scan.record;
        match self {
            CheckRule::AttendanceGaps => record.attendance_gap_days > 0,
            CheckRule::UnapprovedLeave => record.unapproved_leave_days > 0,
            CheckRule::UnverifiedClaims => record.unverified_claims > 0,
            CheckRule::MissingBankAccount => !record.has_bank_account(),
            CheckRule::MissingTaxId => !record.has_tax_id(),
            CheckRule::CriticalFlags => scan.has_critical_flag(),
        }
    }
}

/// A check in the catalog: the rule plus the severity it is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    /// What the check looks for.
    pub rule: CheckRule,
    /// Severity assigned to failures.
    pub severity: CheckSeverity,
}

impl CheckDefinition {
    /// Creates a catalog entry.
    pub const fn new(rule: CheckRule, severity: CheckSeverity) -> Self {
        Self { rule, severity }
    }
}

/// The standard pre-run catalog, in dashboard order.
pub const DEFAULT_CHECKS: [CheckDefinition; 6] = [
    CheckDefinition::new(CheckRule::AttendanceGaps, CheckSeverity::Medium),
    CheckDefinition::new(CheckRule::UnapprovedLeave, CheckSeverity::High),
    CheckDefinition::new(CheckRule::UnverifiedClaims, CheckSeverity::Medium),
    CheckDefinition::new(CheckRule::MissingBankAccount, CheckSeverity::Critical),
    CheckDefinition::new(CheckRule::MissingTaxId, CheckSeverity::High),
    CheckDefinition::new(CheckRule::CriticalFlags, CheckSeverity::Critical),
];
