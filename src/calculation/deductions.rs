//! Combined statutory deduction calculation.
//!
//! Each component is rounded on its own before being summed. The total is
//! the sum of rounded components, which may differ by a unit or two from
//! rounding the unrounded sum. Component inputs are clamped to
//! [`MAX_AMOUNT`](crate::models::MAX_AMOUNT) and rule set amounts are validated
//! against the same bound, so the sum cannot overflow.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RuleSet;
use crate::models::{
    AuditStep, AuditTrace, CompensationRecord, DeductionBreakdown, DeductionCalculation,
};

use super::{calculate_income_tax, calculate_provident_fund, calculate_state_insurance};

/// Computes statutory deductions for records against one rule set.
///
/// The calculator borrows the rule set and holds no other state, so one
/// instance can be shared freely across worker threads.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::DeductionCalculator;
/// use payroll_engine::config::RuleSet;
/// use payroll_engine::models::CompensationRecord;
/// use rust_decimal::Decimal;
///
/// let rules = RuleSet::default();
/// let calculator = DeductionCalculator::new(&rules);
/// let record = CompensationRecord::new("emp_001", Decimal::from(10000), Decimal::from(15000));
///
/// let breakdown = calculator.compute(&record);
/// assert_eq!(breakdown.pf, Decimal::from(1200));
/// assert_eq!(breakdown.esi, Decimal::from(113));
/// assert_eq!(breakdown.tax, Decimal::ZERO);
/// assert_eq!(breakdown.total_deductions, Decimal::from(1513));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DeductionCalculator<'a> {
    rules: &'a RuleSet,
}

impl<'a> DeductionCalculator<'a> {
    /// Creates a calculator over `rules`.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Returns the rule set in use.
    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Computes the deduction breakdown for `record`.
    ///
    /// Never fails: missing or zero amounts produce zero components.
    pub fn compute(&self, record: &CompensationRecord) -> DeductionBreakdown {
        self.compute_with_trace(record).breakdown
    }

    /// Computes the breakdown along with the audit trace explaining it.
    pub fn compute_with_trace(&self, record: &CompensationRecord) -> DeductionCalculation {
        let mut trace = AuditTrace::default();

        let pf = calculate_provident_fund(record.basic, self.rules, 1);
        trace.push(pf.audit_step);

        let esi = calculate_state_insurance(record.gross, self.rules, 2);
        trace.push(esi.audit_step);

        let tax = calculate_income_tax(record.gross, self.rules, 3);
        trace.push(tax.audit_step);

        let professional_tax = self.rules.professional_tax();
        trace.push(AuditStep {
            step_number: 4,
            rule_id: "professional_tax".to_string(),
            rule_name: "Professional Tax".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({
                "amount": professional_tax.normalize().to_string()
            }),
            reasoning: format!("Flat professional tax of {}", professional_tax.normalize()),
        });

        let total_deductions = pf.employee + esi.amount + tax.amount + professional_tax;

        debug!(
            record_id = %record.id,
            pf = %pf.employee,
            esi = %esi.amount,
            tax = %tax.amount,
            total = %total_deductions,
            "Computed deductions"
        );

        DeductionCalculation {
            record_id: record.id.clone(),
            breakdown: DeductionBreakdown {
                pf: pf.employee,
                employer_pf: pf.employer,
                esi: esi.amount,
                tax: tax.amount,
                professional_tax,
                total_deductions,
            },
            audit_trace: trace,
        }
    }
}

/// Sums already-rounded totals; never rounds the aggregate.
pub fn sum_total_deductions<'b>(breakdowns: impl IntoIterator<Item = &'b DeductionBreakdown>) -> Decimal {
    breakdowns.into_iter().map(|b| b.total_deductions).sum()
}
