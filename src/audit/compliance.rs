//! Statutory compliance auditing.
//!
//! Rules are additive and independent: a record may carry any combination
//! of violations, including none.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RuleSet;
use crate::models::{ComplianceViolation, CompensationRecord, Severity};

/// Share of basic pay that house rent allowance may not exceed.
pub const HRA_BASIC_RATIO: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// A single compliance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ComplianceRule {
    /// Gross pay below the statutory minimum wage.
    MinimumWage {
        /// Minimum gross monthly wage.
        floor: Decimal,
    },
    /// House rent allowance above a share of basic pay.
    HraExcess {
        /// Maximum HRA as a fraction of basic.
        ratio: Decimal,
    },
    /// Gross pay lower than basic pay.
    GrossBelowBasic,
}

impl ComplianceRule {
    /// Stable identifier reported on violations.
    pub fn id(&self) -> &'static str {
        match self {
            ComplianceRule::MinimumWage { .. } => "MIN_WAGE",
            ComplianceRule::HraExcess { .. } => "HRA_EXCESS",
            ComplianceRule::GrossBelowBasic => "GROSS_BELOW_BASIC",
        }
    }

    /// Severity reported on violations.
    pub fn severity(&self) -> Severity {
        match self {
            ComplianceRule::MinimumWage { .. } => Severity::Critical,
            ComplianceRule::HraExcess { .. } | ComplianceRule::GrossBelowBasic => {
                Severity::Warning
            }
        }
    }

    /// Returns a message if `record` violates the rule.
    pub fn evaluate(&self, record: &CompensationRecord) -> Option<String> {
        match self {
            ComplianceRule::MinimumWage { floor } => (record.gross < *floor).then(|| {
                format!(
                    "Gross {} is below the minimum wage of {}",
                    record.gross.normalize(),
                    floor.normalize()
                )
            }),
            ComplianceRule::HraExcess { ratio } => {
                let limit = record.basic.checked_mul(*ratio)?;
                (record.hra > limit).then(|| {
                    format!(
                        "HRA {} exceeds {}% of basic ({})",
                        record.hra.normalize(),
                        ratio.saturating_mul(Decimal::ONE_HUNDRED).normalize(),
                        limit.normalize()
                    )
                })
            }
            ComplianceRule::GrossBelowBasic => (record.gross < record.basic).then(|| {
                format!(
                    "Gross {} is lower than basic {}",
                    record.gross.normalize(),
                    record.basic.normalize()
                )
            }),
        }
    }
}

/// Flags statutory-policy violations.
///
/// # Example
///
/// ```
/// use payroll_engine::audit::ComplianceAuditor;
/// use payroll_engine::config::RuleSet;
/// use payroll_engine::models::CompensationRecord;
/// use rust_decimal::Decimal;
///
/// let auditor = ComplianceAuditor::new(&RuleSet::default());
/// let mut record = CompensationRecord::new("emp_001", Decimal::from(20000), Decimal::from(20000));
/// record.hra = Decimal::from(12000);
///
/// let violations = auditor.audit(&record);
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].rule_id, "HRA_EXCESS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceAuditor {
    rules: Vec<ComplianceRule>,
}

impl ComplianceAuditor {
    /// Creates an auditor with the default catalog, using the rule set's wage floor.
    pub fn new(rule_set: &RuleSet) -> Self {
        Self::with_rules(vec![
            ComplianceRule::MinimumWage {
                floor: rule_set.minimum_wage_floor(),
            },
            ComplianceRule::HraExcess {
                ratio: HRA_BASIC_RATIO,
            },
            ComplianceRule::GrossBelowBasic,
        ])
    }

    /// Creates an auditor with a custom catalog.
    pub fn with_rules(rules: Vec<ComplianceRule>) -> Self {
        Self { rules }
    }

    /// Returns the catalog in evaluation order.
    pub fn rules(&self) -> &[ComplianceRule] {
        &self.rules
    }

    /// Audits a single record.
    pub fn audit(&self, record: &CompensationRecord) -> Vec<ComplianceViolation> {
        let violations: Vec<ComplianceViolation> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(record).map(|message| ComplianceViolation {
                    rule_id: rule.id().to_string(),
                    severity: rule.severity(),
                    message,
                    record_id: record.id.clone(),
                })
            })
            .collect();

        if !violations.is_empty() {
            debug!(record_id = %record.id, violations = violations.len(), "Compliance violations found");
        }
        violations
    }
}
