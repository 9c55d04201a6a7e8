//! Pay run orchestration over injected record and batch stores.
//!
//! The engine never reads or writes persistent storage itself. Callers
//! supply a [`RecordSource`] and a [`BatchSink`]; tests and the HTTP adapter
//! use the in-memory implementations here.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationRecord, PayRunBatch, ReadinessReport, ReadinessScore};
use crate::pipeline::scan_cycle;
use crate::validation::CycleValidator;

use super::BatchAggregator;
use super::aggregator::reject_empty;

/// Supplies the compensation records for a pay cycle.
pub trait RecordSource: Send + Sync {
    /// Returns all records for `cycle_id`; an unknown cycle yields no records.
    fn fetch(&self, cycle_id: &str) -> EngineResult<Vec<CompensationRecord>>;
}

/// Receives frozen pay run batches.
pub trait BatchSink: Send + Sync {
    /// Stores `batch` in one step. Implementations must refuse a second
    /// batch for a cycle that already has one.
    fn append(&self, batch: PayRunBatch) -> EngineResult<()>;

    /// Returns the batch stored for `cycle_id`, if any.
    fn get(&self, cycle_id: &str) -> EngineResult<Option<PayRunBatch>>;
}

impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    fn fetch(&self, cycle_id: &str) -> EngineResult<Vec<CompensationRecord>> {
        (**self).fetch(cycle_id)
    }
}

impl<T: BatchSink + ?Sized> BatchSink for Arc<T> {
    fn append(&self, batch: PayRunBatch) -> EngineResult<()> {
        (**self).append(batch)
    }

    fn get(&self, cycle_id: &str) -> EngineResult<Option<PayRunBatch>> {
        (**self).get(cycle_id)
    }
}

/// Records held in memory, keyed by cycle id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    cycles: HashMap<String, Vec<CompensationRecord>>,
}

impl InMemoryRecordSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding a single cycle.
    pub fn single(cycle_id: impl Into<String>, records: Vec<CompensationRecord>) -> Self {
        Self::new().with_cycle(cycle_id, records)
    }

    /// Adds (or replaces) the records for a cycle.
    pub fn with_cycle(mut self, cycle_id: impl Into<String>, records: Vec<CompensationRecord>) -> Self {
        self.cycles.insert(cycle_id.into(), records);
        self
    }
}

impl RecordSource for InMemoryRecordSource {
    fn fetch(&self, cycle_id: &str) -> EngineResult<Vec<CompensationRecord>> {
        Ok(self.cycles.get(cycle_id).cloned().unwrap_or_default())
    }
}

/// Batches held in memory, one per cycle id.
///
/// Uses `parking_lot::RwLock`, which cannot be poisoned, so reads never fail.
#[derive(Debug, Default)]
pub struct InMemoryBatchSink {
    batches: RwLock<HashMap<String, PayRunBatch>>,
}

impl InMemoryBatchSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored batches.
    pub fn len(&self) -> usize {
        self.batches.read().len()
    }

    /// Returns true if no batch has been stored.
    pub fn is_empty(&self) -> bool {
        self.batches.read().is_empty()
    }
}

impl BatchSink for InMemoryBatchSink {
    fn append(&self, batch: PayRunBatch) -> EngineResult<()> {
        let mut batches = self.batches.write();

        if batches.contains_key(batch.cycle_id()) {
            return Err(EngineError::DuplicateBatch {
                cycle_id: batch.cycle_id().to_string(),
            });
        }

        batches.insert(batch.cycle_id().to_string(), batch);
        Ok(())
    }

    fn get(&self, cycle_id: &str) -> EngineResult<Option<PayRunBatch>> {
        Ok(self.batches.read().get(cycle_id).cloned())
    }
}

/// Whether a readiness score may stop a pay run.
///
/// The default is [`ReadinessPolicy::Advisory`]: an operator may initiate a
/// run whatever the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "minimum", rename_all = "snake_case")]
pub enum ReadinessPolicy {
    /// The score is reported but never blocks.
    #[default]
    Advisory,
    /// Runs scoring below the minimum are refused.
    MinimumScore(u8),
}

impl ReadinessPolicy {
    /// Applies the policy to a cycle's score.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ReadinessBelowThreshold`] only under
    /// [`ReadinessPolicy::MinimumScore`] when the score is too low.
    pub fn enforce(&self, cycle_id: &str, score: ReadinessScore) -> EngineResult<()> {
        match self {
            ReadinessPolicy::Advisory => {
                if score.value() < 100 {
                    warn!(
                        cycle_id = %cycle_id,
                        score = score.value(),
                        "Initiating pay run below full readiness"
                    );
                }
                Ok(())
            }
            ReadinessPolicy::MinimumScore(minimum) if score.value() < *minimum => {
                warn!(
                    cycle_id = %cycle_id,
                    score = score.value(),
                    minimum = *minimum,
                    "Pay run blocked by readiness policy"
                );
                Err(EngineError::ReadinessBelowThreshold {
                    cycle_id: cycle_id.to_string(),
                    score: score.value(),
                    minimum: *minimum,
                })
            }
            ReadinessPolicy::MinimumScore(_) => Ok(()),
        }
    }
}

/// Runs a cycle end to end: fetch, scan, validate, aggregate, append.
///
/// # Example
///
/// ```
/// use payroll_engine::batch::{BatchSink, InMemoryBatchSink, InMemoryRecordSource, PayRunService};
/// use payroll_engine::config::RuleSet;
/// use payroll_engine::models::CompensationRecord;
/// use rust_decimal::Decimal;
///
/// let source = InMemoryRecordSource::single(
///     "2026-09",
///     vec![CompensationRecord::new("emp_001", Decimal::from(10000), Decimal::from(15000))],
/// );
/// let service = PayRunService::new(source, InMemoryBatchSink::new(), RuleSet::default());
///
/// let batch = service.run("2026-09")?;
/// assert_eq!(batch.total_deductions(), Decimal::from(1513));
/// assert!(service.sink().get("2026-09")?.is_some());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug)]
pub struct PayRunService<S, K> {
    source: S,
    sink: K,
    rules: RuleSet,
    validator: CycleValidator,
    policy: ReadinessPolicy,
}

impl<S: RecordSource, K: BatchSink> PayRunService<S, K> {
    /// Creates a service with the default check catalog and an advisory policy.
    pub fn new(source: S, sink: K, rules: RuleSet) -> Self {
        Self {
            source,
            sink,
            rules,
            validator: CycleValidator::default(),
            policy: ReadinessPolicy::default(),
        }
    }

    /// Replaces the readiness policy.
    pub fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the validator.
    pub fn with_validator(mut self, validator: CycleValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Returns the rule set in use.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the batch sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Scores a cycle without creating a batch.
    pub fn readiness(&self, cycle_id: &str) -> EngineResult<ReadinessReport> {
        let records = self.source.fetch(cycle_id)?;
        Ok(self.validator.validate_records(cycle_id, &records, &self.rules))
    }

    /// Creates and stores the batch for `cycle_id`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EmptyPayRun`] if the source has no records for the cycle
    /// - [`EngineError::ReadinessBelowThreshold`] if a gating policy refuses the run
    /// - [`EngineError::TotalsOverflow`] if the cycle totals cannot be represented
    /// - [`EngineError::DuplicateBatch`] if the sink already holds a batch for the cycle
    /// - any error raised by the source or sink
    pub fn run(&self, cycle_id: &str) -> EngineResult<PayRunBatch> {
        let records = self.source.fetch(cycle_id)?;
        reject_empty(cycle_id, records.len())?;

        let scans = scan_cycle(&records, &self.rules);
        let report = self.validator.validate(cycle_id, &scans);
        self.policy.enforce(cycle_id, report.score)?;

        let batch = BatchAggregator::create_pay_run_from_scans(cycle_id, &scans, Some(report.score))?;
        self.sink.append(batch.clone())?;

        info!(
            cycle_id = %cycle_id,
            batch_id = %batch.batch_id(),
            readiness = report.score.value(),
            "Pay run stored"
        );
        Ok(batch)
    }
}
