//! Pre-run validation for a pay cycle.
//!
//! A fixed catalog of named checks (attendance, leave, claims, data
//! integrity, flag counts) runs across every record of a cycle. Each check
//! reports how many records fail it, and the share of passing checks
//! becomes the cycle's readiness score.

mod checks;
mod cycle;

pub use checks::{CheckDefinition, CheckRule, DEFAULT_CHECKS};
pub use cycle::CycleValidator;
