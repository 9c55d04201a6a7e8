//! Cycle readiness validation.

use tracing::info;

use crate::config::RuleSet;
use crate::models::{CompensationRecord, ReadinessReport, ValidationCheck};
use crate::pipeline::{RecordScan, scan_cycle};

use super::checks::{CheckDefinition, DEFAULT_CHECKS};

/// Runs the check catalog over a cycle and scores its readiness.
///
/// The score is advisory. Nothing here prevents a pay run from being
/// initiated; gating is an explicit caller choice (see
/// [`crate::batch::ReadinessPolicy`]).
///
/// # Example
///
/// ```
/// use payroll_engine::config::RuleSet;
/// use payroll_engine::models::CompensationRecord;
/// use payroll_engine::validation::CycleValidator;
/// use rust_decimal::Decimal;
///
/// let record = CompensationRecord {
///     bank_account: Some("ACC-1".to_string()),
///     tax_id: Some("TAX-1".to_string()),
///     ..CompensationRecord::new("emp_001", Decimal::from(20000), Decimal::from(30000))
/// };
///
/// let report = CycleValidator::default().validate_records("2026-09", &[record], &RuleSet::default());
/// assert_eq!(report.score.value(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleValidator {
    checks: Vec<CheckDefinition>,
}

impl Default for CycleValidator {
    fn default() -> Self {
        Self::with_checks(DEFAULT_CHECKS.to_vec())
    }
}

impl CycleValidator {
    /// Creates a validator with a custom catalog.
    pub fn with_checks(checks: Vec<CheckDefinition>) -> Self {
        Self { checks }
    }

    /// Returns the catalog in evaluation order.
    pub fn checks(&self) -> &[CheckDefinition] {
        &self.checks
    }

    /// Runs every check against already-scanned records.
    pub fn validate(&self, cycle_id: &str, scans: &[RecordScan]) -> ReadinessReport {
        let checks: Vec<ValidationCheck> = self
            .checks
            .iter()
            .map(|definition| {
                let affected: Vec<String> = scans
                    .iter()
                    .filter(|scan| definition.rule.fails(scan))
                    .map(|scan| scan.record.id.clone())
                    .collect();

                ValidationCheck::new(
                    definition.rule.category(),
                    definition.rule.name(),
                    definition.severity,
                    affected,
                )
            })
            .collect();

        let report = ReadinessReport::new(cycle_id, checks);
        info!(
            cycle_id = %cycle_id,
            records = scans.len(),
            score = report.score.value(),
            passed = report.passed,
            warnings = report.warnings,
            failed = report.failed,
            "Cycle validated"
        );
        report
    }

    /// Scans `records` and validates the result.
    pub fn validate_records(
        &self,
        cycle_id: &str,
        records: &[CompensationRecord],
        rules: &RuleSet,
    ) -> ReadinessReport {
        self.validate(cycle_id, &scan_cycle(records, rules))
    }
}
