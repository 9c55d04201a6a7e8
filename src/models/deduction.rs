//! Deduction breakdown models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditTrace;

/// Statutory deductions for one record in one cycle.
///
/// Every component is already rounded to a whole unit. `total_deductions`
/// is the sum of the rounded employee components plus professional tax;
/// `employer_pf` is reported for the ledger but is not withheld.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionBreakdown;
/// use rust_decimal::Decimal;
///
/// let breakdown = DeductionBreakdown {
///     pf: Decimal::from(1200),
///     employer_pf: Decimal::from(1200),
///     esi: Decimal::from(113),
///     tax: Decimal::ZERO,
///     professional_tax: Decimal::from(200),
///     total_deductions: Decimal::from(1513),
/// };
/// assert_eq!(breakdown.total_deductions, Decimal::from(1513));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Employee provident fund contribution.
    pub pf: Decimal,
    /// Employer provident fund contribution (not withheld).
    pub employer_pf: Decimal,
    /// Employee state insurance contribution.
    pub esi: Decimal,
    /// Monthly income tax.
    pub tax: Decimal,
    /// Flat professional tax.
    pub professional_tax: Decimal,
    /// Total withheld from the employee.
    pub total_deductions: Decimal,
}

/// A breakdown together with the trace that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCalculation {
    /// The record this calculation belongs to.
    pub record_id: String,
    /// The computed deductions.
    pub breakdown: DeductionBreakdown,
    /// How each component was derived.
    pub audit_trace: AuditTrace,
}
