//! Per-record scanning for a whole cycle.
//!
//! Every record is computed, anomaly-checked and compliance-audited
//! independently, so the work is spread over the rayon pool with no shared
//! mutable state. Results come back in input order.

use std::borrow::Cow;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audit::{AnomalyDetector, ComplianceAuditor};
use crate::calculation::DeductionCalculator;
use crate::config::RuleSet;
use crate::models::{AnomalyFlag, ComplianceViolation, CompensationRecord, DeductionBreakdown};

/// Everything the engine knows about one record after a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordScan {
    /// The record as supplied.
    pub record: CompensationRecord,
    /// Computed statutory deductions.
    pub breakdown: DeductionBreakdown,
    /// Anomaly flags raised.
    pub anomalies: Vec<AnomalyFlag>,
    /// Compliance violations raised.
    pub violations: Vec<ComplianceViolation>,
}

impl RecordScan {
    /// Returns true if any anomaly or violation is critical.
    pub fn has_critical_flag(&self) -> bool {
        self.anomalies.iter().any(AnomalyFlag::is_critical)
            || self.violations.iter().any(ComplianceViolation::is_critical)
    }

    /// Total number of anomalies and violations.
    pub fn flag_count(&self) -> usize {
        self.anomalies.len() + self.violations.len()
    }
}

/// Scans a single record.
///
/// When the record carries no recorded deductions, the anomaly rules see a
/// copy with the freshly computed total filled in, so a negative net is
/// caught either way. The input record is never modified.
pub fn scan_record(
    record: &CompensationRecord,
    prior_period: &[CompensationRecord],
    calculator: &DeductionCalculator<'_>,
    detector: &AnomalyDetector,
    auditor: &ComplianceAuditor,
) -> RecordScan {
    let breakdown = calculator.compute(record);

    let effective: Cow<'_, CompensationRecord> = match record.deductions {
        Some(_) => Cow::Borrowed(record),
        None => Cow::Owned(record.with_deductions(breakdown.total_deductions)),
    };

    RecordScan {
        record: record.clone(),
        breakdown,
        anomalies: detector.detect_with_history(&effective, prior_period),
        violations: auditor.audit(record),
    }
}

/// Scans every record of a cycle in parallel.
///
/// # Example
///
/// ```
/// use payroll_engine::config::RuleSet;
/// use payroll_engine::models::CompensationRecord;
/// use payroll_engine::pipeline::scan_cycle;
/// use rust_decimal::Decimal;
///
/// let records = vec![
///     CompensationRecord::new("emp_001", Decimal::from(10000), Decimal::from(15000)),
///     CompensationRecord::new("", Decimal::from(10000), Decimal::from(15000)),
/// ];
/// let scans = scan_cycle(&records, &RuleSet::default());
///
/// assert_eq!(scans.len(), 2);
/// assert!(!scans[0].has_critical_flag());
/// assert!(scans[1].has_critical_flag());
/// ```
pub fn scan_cycle(records: &[CompensationRecord], rules: &RuleSet) -> Vec<RecordScan> {
    scan_cycle_with_history(records, &[], rules)
}

/// Scans every record of a cycle in parallel, running trend rules against
/// `prior_period`.
pub fn scan_cycle_with_history(
    records: &[CompensationRecord],
    prior_period: &[CompensationRecord],
    rules: &RuleSet,
) -> Vec<RecordScan> {
    let calculator = DeductionCalculator::new(rules);
    let detector = AnomalyDetector::new(rules);
    let auditor = ComplianceAuditor::new(rules);

    let scans: Vec<RecordScan> = records
        .par_iter()
        .map(|record| scan_record(record, prior_period, &calculator, &detector, &auditor))
        .collect();

    let critical = scans.iter().filter(|s| s.has_critical_flag()).count();
    let flagged = scans.iter().filter(|s| s.flag_count() > 0).count();

    if critical > 0 {
        warn!(
            records = scans.len(),
            flagged, critical, "Cycle scan found records with critical flags"
        );
    } else {
        info!(records = scans.len(), flagged, "Cycle scan completed");
    }

    scans
}
