//! Anomaly detection over single compensation records.
//!
//! The detector holds a catalog of [`AnomalyRule`] variants and evaluates
//! every rule against every record; any number of rules may fire. Adding a
//! rule means adding a variant, not touching the evaluation loop.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RuleSet;
use crate::models::{AnomalyFlag, CompensationRecord, MAX_AMOUNT, Severity};

/// Default multiple of prior-period gross that counts as a spike.
pub const DEFAULT_GROSS_SPIKE_FACTOR: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// A single anomaly rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AnomalyRule {
    /// Recorded deductions exceed gross pay.
    NetNegative,
    /// Basic pay above an executive outlier threshold.
    HighVariance {
        /// Basic pay above which the rule fires.
        threshold: Decimal,
    },
    /// The record has no identity key.
    DataMissing,
    /// Gross grew by more than `factor` times the prior period.
    GrossSpike {
        /// Multiple of prior gross that triggers the rule.
        factor: Decimal,
    },
    /// A monetary field lies outside `±MAX_AMOUNT`; deductions were
    /// computed on the clamped value.
    AmountOutOfRange,
}

impl AnomalyRule {
    /// Stable identifier reported on flags.
    pub fn id(&self) -> &'static str {
        match self {
            AnomalyRule::NetNegative => "NET_NEGATIVE",
            AnomalyRule::HighVariance { .. } => "HIGH_VARIANCE",
            AnomalyRule::DataMissing => "DATA_MISSING",
            AnomalyRule::GrossSpike { .. } => "GROSS_SPIKE",
            AnomalyRule::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
        }
    }

    /// Severity reported on flags.
    pub fn severity(&self) -> Severity {
        match self {
            AnomalyRule::NetNegative
            | AnomalyRule::DataMissing
            | AnomalyRule::AmountOutOfRange => Severity::Critical,
            AnomalyRule::HighVariance { .. } | AnomalyRule::GrossSpike { .. } => Severity::Warning,
        }
    }

    /// Returns a message if the rule fires for `record`.
    ///
    /// `prior` is the same employee's record from the previous period, when known.
    pub fn evaluate(
        &self,
        record: &CompensationRecord,
        prior: Option<&CompensationRecord>,
    ) -> Option<String> {
        match self {
            AnomalyRule::NetNegative => {
                let net = record.net_pay();
                (net < Decimal::ZERO).then(|| {
                    format!(
                        "Deductions {} exceed gross {} (net {})",
                        record.deductions_or_zero().normalize(),
                        record.gross.normalize(),
                        net.normalize()
                    )
                })
            }
            AnomalyRule::HighVariance { threshold } => (record.basic > *threshold).then(|| {
                format!(
                    "Basic {} exceeds the executive threshold {}",
                    record.basic.normalize(),
                    threshold.normalize()
                )
            }),
            AnomalyRule::DataMissing => (!record.has_identity())
                .then(|| "Record has no employee identifier".to_string()),
            AnomalyRule::GrossSpike { factor } => {
                let prior = prior?;
                if prior.gross <= Decimal::ZERO {
                    return None;
                }
                let limit = prior.gross.checked_mul(*factor)?;
                (record.gross > limit).then(|| {
                    format!(
                        "Gross {} is more than {}× the prior period's {}",
                        record.gross.normalize(),
                        factor.normalize(),
                        prior.gross.normalize()
                    )
                })
            }
            AnomalyRule::AmountOutOfRange => {
                record.out_of_range_amount().map(|(field, value)| {
                    format!(
                        "Amount in {} ({}) is outside the supported range of ±{}",
                        field,
                        value.normalize(),
                        MAX_AMOUNT
                    )
                })
            }
        }
    }
}

/// Flags structurally or numerically suspicious records.
///
/// # Example
///
/// ```
/// use payroll_engine::audit::AnomalyDetector;
/// use payroll_engine::config::RuleSet;
/// use payroll_engine::models::{CompensationRecord, Severity};
/// use rust_decimal::Decimal;
///
/// let detector = AnomalyDetector::new(&RuleSet::default());
/// let mut record = CompensationRecord::new("emp_001", Decimal::from(800), Decimal::from(1000));
/// record.deductions = Some(Decimal::from(2000));
///
/// let flags = detector.detect(&record);
/// assert_eq!(flags.len(), 1);
/// assert_eq!(flags[0].rule_id, "NET_NEGATIVE");
/// assert_eq!(flags[0].severity, Severity::Critical);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyDetector {
    rules: Vec<AnomalyRule>,
}

impl AnomalyDetector {
    /// Creates a detector with the default catalog, using the rule set's
    /// executive threshold.
    pub fn new(rule_set: &RuleSet) -> Self {
        Self::with_rules(vec![
            AnomalyRule::NetNegative,
            AnomalyRule::HighVariance {
                threshold: rule_set.executive_variance_threshold(),
            },
            AnomalyRule::DataMissing,
            AnomalyRule::GrossSpike {
                factor: DEFAULT_GROSS_SPIKE_FACTOR,
            },
            AnomalyRule::AmountOutOfRange,
        ])
    }

    /// Creates a detector with a custom catalog.
    pub fn with_rules(rules: Vec<AnomalyRule>) -> Self {
        Self { rules }
    }

    /// Returns the catalog in evaluation order.
    pub fn rules(&self) -> &[AnomalyRule] {
        &self.rules
    }

    /// Flags a single record.
    pub fn detect(&self, record: &CompensationRecord) -> Vec<AnomalyFlag> {
        self.evaluate(record, None)
    }

    /// Flags a record, also running trend rules against the same employee's
    /// record in `prior_period` when one exists.
    pub fn detect_with_history(
        &self,
        record: &CompensationRecord,
        prior_period: &[CompensationRecord],
    ) -> Vec<AnomalyFlag> {
        let prior = if record.has_identity() {
            prior_period.iter().find(|p| p.id == record.id)
        } else {
            None
        };
        self.evaluate(record, prior)
    }

    fn evaluate(
        &self,
        record: &CompensationRecord,
        prior: Option<&CompensationRecord>,
    ) -> Vec<AnomalyFlag> {
        let flags: Vec<AnomalyFlag> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(record, prior).map(|message| AnomalyFlag {
                    rule_id: rule.id().to_string(),
                    severity: rule.severity(),
                    message,
                    record_id: record.id.clone(),
                })
            })
            .collect();

        if !flags.is_empty() {
            debug!(record_id = %record.id, flags = flags.len(), "Anomalies detected");
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn detector() -> AnomalyDetector {
        AnomalyDetector::new(&RuleSet::default())
    }

    fn rule_ids(flags: &[AnomalyFlag]) -> Vec<&str> {
        flags.iter().map(|f| f.rule_id.as_str()).collect()
    }

    #[test]
    fn test_clean_record_has_no_flags() {
        let record = CompensationRecord::new("emp_001", dec("20000"), dec("30000"));
        assert!(detector().detect(&record).is_empty());
    }

    #[test]
    fn test_net_negative_is_critical() {
        let mut record = CompensationRecord::new("emp_001", dec("500"), dec("1000"));
        record.deductions = Some(dec("2000"));

        let flags = detector().detect(&record);
        assert_eq!(rule_ids(&flags), vec!["NET_NEGATIVE"]);
        assert_eq!(flags[0].severity, Severity::Critical);
        assert_eq!(flags[0].record_id, "emp_001");
        assert!(flags[0].message.contains("-1000"));
    }

    #[test]
    fn test_net_zero_is_not_negative() {
        let mut record = CompensationRecord::new("emp_001", dec("500"), dec("1000"));
        record.deductions = Some(dec("1000"));
        assert!(detector().detect(&record).is_empty());
    }

    #[test]
    fn test_high_variance_above_threshold() {
        let record = CompensationRecord::new("emp_001", dec("500001"), dec("600000"));
        let flags = detector().detect(&record);
        assert_eq!(rule_ids(&flags), vec!["HIGH_VARIANCE"]);
        assert_eq!(flags[0].severity, Severity::Warning);
    }

    #[test]
    fn test_high_variance_at_threshold_does_not_fire() {
        let record = CompensationRecord::new("emp_001", dec("500000"), dec("600000"));
        assert!(detector().detect(&record).is_empty());
    }

    #[test]
    fn test_missing_identity_still_runs_other_rules() {
        let mut record = CompensationRecord::new("", dec("600000"), dec("1000"));
        record.deductions = Some(dec("5000"));

        let flags = detector().detect(&record);
        assert_eq!(
            rule_ids(&flags),
            vec!["NET_NEGATIVE", "HIGH_VARIANCE", "DATA_MISSING"]
        );
    }

    #[test]
    fn test_default_record_is_data_missing_only() {
        let flags = detector().detect(&CompensationRecord::default());
        assert_eq!(rule_ids(&flags), vec!["DATA_MISSING"]);
        assert_eq!(flags[0].severity, Severity::Critical);
    }

    #[test]
    fn test_gross_spike_requires_history() {
        let record = CompensationRecord::new("emp_001", dec("20000"), dec("90000"));
        assert!(detector().detect(&record).is_empty());

        let prior = vec![CompensationRecord::new("emp_001", dec("20000"), dec("30000"))];
        let flags = detector().detect_with_history(&record, &prior);
        assert_eq!(rule_ids(&flags), vec!["GROSS_SPIKE"]);
    }

    #[test]
    fn test_gross_spike_ignores_other_employees() {
        let record = CompensationRecord::new("emp_001", dec("20000"), dec("90000"));
        let prior = vec![CompensationRecord::new("emp_002", dec("20000"), dec("30000"))];
        assert!(detector().detect_with_history(&record, &prior).is_empty());
    }

    #[test]
    fn test_gross_spike_at_exact_factor_does_not_fire() {
        let record = CompensationRecord::new("emp_001", dec("20000"), dec("60000"));
        let prior = vec![CompensationRecord::new("emp_001", dec("20000"), dec("30000"))];
        assert!(detector().detect_with_history(&record, &prior).is_empty());
    }

    #[test]
    fn test_amount_beyond_range_is_critical() {
        let record =
            CompensationRecord::new("emp_001", dec("10000"), dec("10000000000000000000000000000"));

        let flags = detector().detect(&record);
        assert_eq!(rule_ids(&flags), vec!["AMOUNT_OUT_OF_RANGE"]);
        assert_eq!(flags[0].severity, Severity::Critical);
        assert_eq!(
            flags[0].message,
            "Amount in gross (10000000000000000000000000000) is outside the supported range of \
             ±1000000000000000"
        );
    }

    #[test]
    fn test_extreme_amounts_flag_without_panicking() {
        let mut record = CompensationRecord::new("emp_001", Decimal::MAX, Decimal::MIN);
        record.deductions = Some(Decimal::MAX);

        let prior = vec![CompensationRecord::new("emp_001", dec("1"), Decimal::MAX)];
        let flags = detector().detect_with_history(&record, &prior);
        assert_eq!(
            rule_ids(&flags),
            vec!["NET_NEGATIVE", "HIGH_VARIANCE", "AMOUNT_OUT_OF_RANGE"]
        );
    }

    #[test]
    fn test_spike_factor_overflow_does_not_fire() {
        let record = CompensationRecord::new("emp_001", dec("1"), Decimal::MAX);
        let prior = vec![CompensationRecord::new("emp_001", dec("1"), dec("50000000000000000000000000000"))];
        let flags = AnomalyDetector::with_rules(vec![AnomalyRule::GrossSpike {
            factor: DEFAULT_GROSS_SPIKE_FACTOR,
        }])
        .detect_with_history(&record, &prior);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_messages_print_plain_amounts() {
        let mut record = CompensationRecord::new("emp_001", dec("500"), dec("1000"));
        record.deductions = Some(dec("2000"));

        let flags = detector().detect(&record);
        assert_eq!(flags[0].message, "Deductions 2000 exceed gross 1000 (net -1000)");
    }

    #[test]
    fn test_custom_catalog() {
        let detector = AnomalyDetector::with_rules(vec![AnomalyRule::HighVariance {
            threshold: dec("100000"),
        }]);
        let record = CompensationRecord::new("", dec("150000"), dec("150000"));

        let flags = detector.detect(&record);
        assert_eq!(rule_ids(&flags), vec!["HIGH_VARIANCE"]);
    }

    #[test]
    fn test_rule_serialization_is_tagged() {
        let json = serde_json::to_value(AnomalyRule::HighVariance {
            threshold: dec("500000"),
        })
        .unwrap();
        assert_eq!(json["rule"], "high_variance");
        assert_eq!(json["threshold"], "500000");
    }
}
