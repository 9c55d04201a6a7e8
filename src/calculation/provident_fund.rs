//! Provident fund contribution calculation.
//!
//! Both the employee and employer contributions are a percentage of basic
//! pay, each clipped to the same monthly ceiling. The ceiling holds for any
//! basic pay, however large.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::models::AuditStep;

use super::{bounded_amount, round_component};

/// The result of a provident fund calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidentFundResult {
    /// Employee contribution, rounded to a whole unit.
    pub employee: Decimal,
    /// Employer contribution, rounded to a whole unit.
    pub employer: Decimal,
    /// True if the employee contribution hit the ceiling.
    pub cap_applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates provident fund contributions on `basic`.
///
/// `min(basic × rate, cap)`, with negative basic treated as zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_provident_fund;
/// use payroll_engine::config::RuleSet;
/// use rust_decimal::Decimal;
///
/// let rules = RuleSet::default();
///
/// let below_cap = calculate_provident_fund(Decimal::from(10000), &rules, 1);
/// assert_eq!(below_cap.employee, Decimal::from(1200));
///
/// let capped = calculate_provident_fund(Decimal::from(50000), &rules, 1);
/// assert_eq!(capped.employee, Decimal::from(1800));
/// assert!(capped.cap_applied);
/// ```
pub fn calculate_provident_fund(
    basic: Decimal,
    rules: &RuleSet,
    step_number: u32,
) -> ProvidentFundResult {
    let base = bounded_amount(basic);
    let cap = rules.pf_cap();

    let uncapped_employee = base * rules.pf_rate();
    let uncapped_employer = base * rules.pf_employer_rate();
    let cap_applied = uncapped_employee > cap;

    let employee = round_component(uncapped_employee.min(cap));
    let employer = round_component(uncapped_employer.min(cap));

    let reasoning = if cap_applied {
        format!(
            "Basic {} × {} = {} exceeds the ceiling; contribution capped at {}",
            base.normalize(),
            rules.pf_rate().normalize(),
            uncapped_employee.normalize(),
            cap.normalize()
        )
    } else {
        format!(
            "Basic {} × {} = {}",
            base.normalize(),
            rules.pf_rate().normalize(),
            employee.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "provident_fund".to_string(),
        rule_name: "Provident Fund".to_string(),
        input: serde_json::json!({
            "basic": base.normalize().to_string(),
            "rate": rules.pf_rate().normalize().to_string(),
            "employer_rate": rules.pf_employer_rate().normalize().to_string(),
            "cap": cap.normalize().to_string()
        }),
        output: serde_json::json!({
            "uncapped_amount": uncapped_employee.normalize().to_string(),
            "amount": employee.normalize().to_string(),
            "employer_amount": employer.normalize().to_string(),
            "cap_applied": cap_applied
        }),
        reasoning,
    };

    ProvidentFundResult {
        employee,
        employer,
        cap_applied,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSetConfig;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_below_cap_uses_rate() {
        let result = calculate_provident_fund(dec("10000"), &RuleSet::default(), 1);
        assert_eq!(result.employee, dec("1200"));
        assert_eq!(result.employer, dec("1200"));
        assert!(!result.cap_applied);
    }

    #[test]
    fn test_exactly_at_cap_boundary() {
        // 15000 × 0.12 = 1800
        let result = calculate_provident_fund(dec("15000"), &RuleSet::default(), 1);
        assert_eq!(result.employee, dec("1800"));
        assert!(!result.cap_applied);
    }

    #[test]
    fn test_above_cap_is_clipped() {
        let result = calculate_provident_fund(dec("50000"), &RuleSet::default(), 1);
        assert_eq!(result.employee, dec("1800"));
        assert_eq!(result.employer, dec("1800"));
        assert!(result.cap_applied);
        assert_eq!(result.audit_step.output["uncapped_amount"], "6000");
        assert!(result.audit_step.reasoning.contains("capped"));
    }

    #[test]
    fn test_very_large_basic_still_capped() {
        let result = calculate_provident_fund(dec("99999999999"), &RuleSet::default(), 1);
        assert_eq!(result.employee, dec("1800"));
    }

    #[test]
    fn test_zero_basic_gives_zero() {
        let result = calculate_provident_fund(Decimal::ZERO, &RuleSet::default(), 1);
        assert_eq!(result.employee, Decimal::ZERO);
        assert_eq!(result.employer, Decimal::ZERO);
    }

    #[test]
    fn test_negative_basic_treated_as_zero() {
        let result = calculate_provident_fund(dec("-5000"), &RuleSet::default(), 1);
        assert_eq!(result.employee, Decimal::ZERO);
    }

    #[test]
    fn test_fractional_contribution_rounds_half_up() {
        // 10004.17 × 0.12 = 1200.5004 -> 1201
        let result = calculate_provident_fund(dec("10004.17"), &RuleSet::default(), 1);
        assert_eq!(result.employee, dec("1201"));
    }

    #[test]
    fn test_distinct_employer_rate() {
        let rules = RuleSet::new(RuleSetConfig {
            pf_employer_rate: dec("0.10"),
            ..RuleSetConfig::default()
        })
        .unwrap();

        let result = calculate_provident_fund(dec("10000"), &rules, 1);
        assert_eq!(result.employee, dec("1200"));
        assert_eq!(result.employer, dec("1000"));
    }

    #[test]
    fn test_audit_step_metadata() {
        let result = calculate_provident_fund(dec("10000"), &RuleSet::default(), 4);
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.rule_id, "provident_fund");
        assert_eq!(result.audit_step.input["basic"], "10000");
        assert_eq!(result.audit_step.output["amount"], "1200");
    }
}
