//! Record-level auditing.
//!
//! Two independent scanners run over each record: the [`AnomalyDetector`]
//! looks for structurally or numerically suspicious data, and the
//! [`ComplianceAuditor`] checks statutory policy. Neither ever fails; both
//! return a possibly empty list of findings.

mod anomaly;
mod compliance;

pub use anomaly::{AnomalyDetector, AnomalyRule, DEFAULT_GROSS_SPIKE_FACTOR};
pub use compliance::{ComplianceAuditor, ComplianceRule, HRA_BASIC_RATIO};
