//! Progressive income tax calculation.
//!
//! Monthly gross is annualised, taxed band by band at each slab's marginal
//! rate, and the annual figure is divided back down to a month. Unlike the
//! provident fund ceiling and the state insurance cliff, the result is
//! continuous across slab limits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{RuleSet, TaxSlab};
use crate::models::AuditStep;

use super::{bounded_amount, round_component};

/// Months in a tax year.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Tax levied within a single slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTax {
    /// Lower bound of the band (exclusive).
    pub from: Decimal,
    /// Upper bound of the band actually reached (inclusive).
    pub to: Decimal,
    /// Marginal rate.
    pub rate: Decimal,
    /// Tax on the portion inside the band.
    pub tax: Decimal,
}

/// The result of an income tax calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeTaxResult {
    /// Annualised gross.
    pub annual_gross: Decimal,
    /// Unrounded annual tax.
    pub annual_tax: Decimal,
    /// Monthly tax, rounded to a whole unit.
    pub amount: Decimal,
    /// Per-slab contributions, in slab order.
    pub slabs: Vec<SlabTax>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Splits `annual_gross` across `slabs` and returns the tax in each band reached.
///
/// For each slab the portion of income in `(previous_limit, limit]` is taxed
/// at the slab rate; the walk stops once income no longer exceeds the
/// previous limit.
pub fn tax_by_slab(annual_gross: Decimal, slabs: &[TaxSlab]) -> Vec<SlabTax> {
    let mut result = Vec::new();
    let mut previous_limit = Decimal::ZERO;

    for slab in slabs {
        if annual_gross <= previous_limit {
            break;
        }

        let upper = match slab.limit {
            Some(limit) => annual_gross.min(limit),
            None => annual_gross,
        };

        result.push(SlabTax {
            from: previous_limit,
            to: upper,
            rate: slab.rate,
            tax: (upper - previous_limit) * slab.rate,
        });

        match slab.limit {
            Some(limit) => previous_limit = limit,
            None => break,
        }
    }

    result
}

/// Total annual tax on `annual_gross`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::annual_tax;
/// use payroll_engine::config::RuleSet;
/// use rust_decimal::Decimal;
///
/// let rules = RuleSet::default();
/// assert_eq!(annual_tax(Decimal::from(720000), rules.tax_slabs()), Decimal::from(27000));
/// ```
pub fn annual_tax(annual_gross: Decimal, slabs: &[TaxSlab]) -> Decimal {
    tax_by_slab(annual_gross, slabs)
        .iter()
        .map(|s| s.tax)
        .sum()
}

/// Calculates monthly income tax on a monthly `gross`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_income_tax;
/// use payroll_engine::config::RuleSet;
/// use rust_decimal::Decimal;
///
/// let result = calculate_income_tax(Decimal::from(60000), &RuleSet::default(), 3);
/// assert_eq!(result.annual_tax, Decimal::from(27000));
/// assert_eq!(result.amount, Decimal::from(2250));
/// ```
pub fn calculate_income_tax(gross: Decimal, rules: &RuleSet, step_number: u32) -> IncomeTaxResult {
    let annual_gross = bounded_amount(gross) * MONTHS_PER_YEAR;
    let slabs = tax_by_slab(annual_gross, rules.tax_slabs());
    let annual_tax: Decimal = slabs.iter().map(|s| s.tax).sum();
    let amount = round_component(annual_tax / MONTHS_PER_YEAR);

    let slab_json: Vec<serde_json::Value> = slabs
        .iter()
        .map(|s| {
            serde_json::json!({
                "from": s.from.normalize().to_string(),
                "to": s.to.normalize().to_string(),
                "rate": s.rate.normalize().to_string(),
                "tax": s.tax.normalize().to_string()
            })
        })
        .collect();

    let reasoning = format!(
        "Annual gross {} taxed across {} slab(s) = {} per year, {} per month",
        annual_gross.normalize(),
        slabs.len(),
        annual_tax.normalize(),
        amount.normalize()
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax".to_string(),
        input: serde_json::json!({
            "gross": gross.normalize().to_string(),
            "annual_gross": annual_gross.normalize().to_string()
        }),
        output: serde_json::json!({
            "slabs": slab_json,
            "annual_tax": annual_tax.normalize().to_string(),
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    IncomeTaxResult {
        annual_gross,
        annual_tax,
        amount,
        slabs,
        audit_step,
    }
}
