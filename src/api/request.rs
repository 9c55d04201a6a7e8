//! Request types for the Payroll Engine API.

use serde::{Deserialize, Serialize};

use crate::models::CompensationRecord;

/// Request body for the `/deductions` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionRequest {
    /// Records to compute deductions for.
    pub records: Vec<CompensationRecord>,
}

/// Request body for the cycle-level endpoints (`/scan`, `/readiness`, `/pay-runs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRequest {
    /// The pay cycle identifier.
    pub cycle_id: String,
    /// The cycle's compensation records.
    pub records: Vec<CompensationRecord>,
    /// Records from the previous cycle, used by trend rules during `/scan`.
    #[serde(default)]
    pub prior_records: Vec<CompensationRecord>,
}

impl CycleRequest {
    /// Returns an error message if the request cannot be processed.
    pub fn validate(&self) -> Result<(), String> {
        if self.cycle_id.trim().is_empty() {
            return Err("cycle_id must not be empty".to_string());
        }
        Ok(())
    }
}
