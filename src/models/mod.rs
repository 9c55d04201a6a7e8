//! Core data models for the Payroll Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit_trace;
mod batch;
mod deduction;
mod flag;
mod record;
mod validation;

pub use audit_trace::{AuditStep, AuditTrace};
pub use batch::{BatchStatus, CycleTotals, PayRunBatch};
pub use deduction::{DeductionBreakdown, DeductionCalculation};
pub use flag::{AnomalyFlag, ComplianceViolation, Severity};
pub use record::{CompensationRecord, MAX_AMOUNT};
pub use validation::{CheckSeverity, CheckStatus, ReadinessReport, ReadinessScore, ValidationCheck};
