//! Error types for the Payroll Engine.
//!
//! Per-record data-quality problems are never errors; they surface as flags.
//! The variants here cover configuration, aggregation and the injected
//! record-source / batch-sink boundaries.

use thiserror::Error;

/// The main error type for the Payroll Engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rules.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rules.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rule set failed validation.
    #[error("Invalid rule set field '{field}': {message}")]
    InvalidRuleSet {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A pay run was requested for a cycle with no records.
    #[error("Cannot create a pay run for cycle '{cycle_id}' with no records")]
    EmptyPayRun {
        /// The cycle identifier.
        cycle_id: String,
    },

    /// Cycle totals left the representable amount range.
    #[error("Totals for cycle '{cycle_id}' are outside the representable amount range")]
    TotalsOverflow {
        /// The cycle identifier.
        cycle_id: String,
    },

    /// A batch already exists for this cycle.
    #[error("A pay run batch already exists for cycle '{cycle_id}'")]
    DuplicateBatch {
        /// The cycle identifier.
        cycle_id: String,
    },

    /// The readiness score is below an opt-in gating threshold.
    #[error("Readiness score {score}% for cycle '{cycle_id}' is below the required {minimum}%")]
    ReadinessBelowThreshold {
        /// The cycle identifier.
        cycle_id: String,
        /// The computed readiness score.
        score: u8,
        /// The configured minimum.
        minimum: u8,
    },

    /// The record source failed to supply records.
    #[error("Record source failed for cycle '{cycle_id}': {message}")]
    RecordSourceError {
        /// The cycle identifier.
        cycle_id: String,
        /// A description of the failure.
        message: String,
    },

    /// The batch sink failed to persist a batch.
    #[error("Batch sink failed: {message}")]
    BatchSinkError {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
