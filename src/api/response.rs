//! Response types for the Payroll Engine API.
//!
//! This module defines the success bodies, the error response structure,
//! and the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AnomalyFlag, ComplianceViolation, DeductionBreakdown, DeductionCalculation};
use crate::pipeline::RecordScan;

/// Response body for `/deductions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionResponse {
    /// One calculation per input record, in input order.
    pub calculations: Vec<DeductionCalculation>,
    /// Sum of every record's total deductions.
    pub total_deductions: Decimal,
}

/// Per-record findings in a `/scan` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEntry {
    /// The record identifier.
    pub record_id: String,
    /// Computed deductions.
    pub breakdown: DeductionBreakdown,
    /// Anomaly flags raised.
    pub anomalies: Vec<AnomalyFlag>,
    /// Compliance violations raised.
    pub violations: Vec<ComplianceViolation>,
}

impl From<RecordScan> for ScanEntry {
    fn from(scan: RecordScan) -> Self {
        Self {
            record_id: scan.record.id,
            breakdown: scan.breakdown,
            anomalies: scan.anomalies,
            violations: scan.violations,
        }
    }
}

/// Response body for `/scan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    /// The scanned cycle.
    pub cycle_id: String,
    /// Findings per record, in input order.
    pub records: Vec<ScanEntry>,
    /// Number of records with at least one critical finding.
    pub critical_records: usize,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error response for work that did not run to completion.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    /// Creates a not-found error response for a pay run.
    pub fn pay_run_not_found(cycle_id: &str) -> Self {
        Self::new(
            "PAY_RUN_NOT_FOUND",
            format!("No pay run batch exists for cycle '{}'", cycle_id),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                )
            }
            EngineError::InvalidRuleSet { .. } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("INVALID_RULE_SET", "Rule set is invalid", message),
            ),
            EngineError::EmptyPayRun { .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "EMPTY_PAY_RUN",
                    message,
                    "A pay run needs at least one compensation record",
                ),
            ),
            EngineError::TotalsOverflow { .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "AMOUNT_OUT_OF_RANGE",
                    message,
                    "Records flagged AMOUNT_OUT_OF_RANGE must be corrected before aggregation",
                ),
            ),
            EngineError::ReadinessBelowThreshold { .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("READINESS_BELOW_THRESHOLD", message),
            ),
            EngineError::DuplicateBatch { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "DUPLICATE_PAY_RUN",
                    message,
                    "Batches are immutable; issue a correction under a new cycle id",
                ),
            ),
            EngineError::RecordSourceError { .. } | EngineError::BatchSinkError { .. } => {
                ApiErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("STORAGE_ERROR", "Storage boundary failed", message),
                )
            }
        }
    }
}
