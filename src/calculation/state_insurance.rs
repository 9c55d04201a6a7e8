//! Employee state insurance contribution calculation.
//!
//! State insurance is a cliff: gross pay at or below the threshold pays the
//! full rate, anything above it pays nothing. There is no phase-out.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::models::AuditStep;

use super::{bounded_amount, round_component};

/// The result of a state insurance calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInsuranceResult {
    /// Contribution, rounded to a whole unit.
    pub amount: Decimal,
    /// True if gross was within the threshold.
    pub eligible: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates state insurance on `gross`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_state_insurance;
/// use payroll_engine::config::RuleSet;
/// use rust_decimal::Decimal;
///
/// let rules = RuleSet::default();
///
/// let at_threshold = calculate_state_insurance(Decimal::from(21000), &rules, 2);
/// assert!(at_threshold.eligible);
///
/// let over = calculate_state_insurance(Decimal::from(21001), &rules, 2);
/// assert_eq!(over.amount, Decimal::ZERO);
/// ```
pub fn calculate_state_insurance(
    gross: Decimal,
    rules: &RuleSet,
    step_number: u32,
) -> StateInsuranceResult {
    let base = bounded_amount(gross);
    let threshold = rules.esi_threshold();
    let eligible = base <= threshold;

    let raw_amount = if eligible {
        base * rules.esi_rate()
    } else {
        Decimal::ZERO
    };
    let amount = round_component(raw_amount);

    let reasoning = if eligible {
        format!(
            "Gross {} is within the {} threshold: {} × {} = {}",
            base.normalize(),
            threshold.normalize(),
            base.normalize(),
            rules.esi_rate().normalize(),
            amount.normalize()
        )
    } else {
        format!(
            "Gross {} exceeds the {} threshold - no contribution",
            base.normalize(),
            threshold.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "state_insurance".to_string(),
        rule_name: "Employee State Insurance".to_string(),
        input: serde_json::json!({
            "gross": base.normalize().to_string(),
            "rate": rules.esi_rate().normalize().to_string(),
            "threshold": threshold.normalize().to_string()
        }),
        output: serde_json::json!({
            "eligible": eligible,
            "raw_amount": raw_amount.normalize().to_string(),
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    StateInsuranceResult {
        amount,
        eligible,
        audit_step,
    }
}
