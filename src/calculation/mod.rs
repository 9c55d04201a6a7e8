//! Calculation logic for the Payroll Engine.
//!
//! This module contains the statutory deduction calculations: provident
//! fund (rate with a hard ceiling), state insurance (threshold cliff),
//! progressive income tax (marginal slabs), and the combined
//! [`DeductionCalculator`] that rounds each component and totals them.
//!
//! Every calculation clamps its input with [`bounded_amount`] first, so no
//! record can push the arithmetic past the `Decimal` range.

mod deductions;
mod income_tax;
mod provident_fund;
mod state_insurance;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::MAX_AMOUNT;

pub use deductions::{DeductionCalculator, sum_total_deductions};
pub use income_tax::{
    IncomeTaxResult, MONTHS_PER_YEAR, SlabTax, annual_tax, calculate_income_tax, tax_by_slab,
};
pub use provident_fund::{ProvidentFundResult, calculate_provident_fund};
pub use state_insurance::{StateInsuranceResult, calculate_state_insurance};

/// Rounds a deduction component to a whole unit, halves away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_component;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_component(Decimal::new(1125, 1)), Decimal::from(113));
/// ```
pub fn round_component(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps an amount into `[0, MAX_AMOUNT]` before it is used as a calculation base.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::bounded_amount;
/// use payroll_engine::models::MAX_AMOUNT;
/// use rust_decimal::Decimal;
///
/// assert_eq!(bounded_amount(Decimal::from(-5)), Decimal::ZERO);
/// assert_eq!(bounded_amount(Decimal::MAX), MAX_AMOUNT);
/// ```
pub fn bounded_amount(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, MAX_AMOUNT)
}
