//! Cycle aggregation and pay run creation.
//!
//! [`BatchAggregator`] turns a cycle's records into an immutable
//! [`crate::models::PayRunBatch`]. [`PayRunService`] wires it to an
//! injected [`RecordSource`] and [`BatchSink`], scoring readiness on the way
//! without letting the score block the run unless a gating
//! [`ReadinessPolicy`] is chosen.

mod aggregator;
mod service;

pub use aggregator::BatchAggregator;
pub use service::{
    BatchSink, InMemoryBatchSink, InMemoryRecordSource, PayRunService, ReadinessPolicy,
    RecordSource,
};
