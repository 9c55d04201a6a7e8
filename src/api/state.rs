//! Application state for the Payroll Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::batch::{InMemoryBatchSink, ReadinessPolicy};
use crate::config::{ConfigLoader, RuleSet};

/// Shared application state.
///
/// Holds the rule set loaded at startup, the store pay runs are appended
/// to, and the readiness policy applied when a run is requested.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    batches: Arc<InMemoryBatchSink>,
    policy: ReadinessPolicy,
}

impl AppState {
    /// Creates a new application state with an empty batch store and an
    /// advisory readiness policy.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
            batches: Arc::new(InMemoryBatchSink::new()),
            policy: ReadinessPolicy::default(),
        }
    }

    /// Replaces the readiness policy.
    pub fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the loaded rule set.
    pub fn rules(&self) -> &RuleSet {
        self.config.rules()
    }

    /// Returns a handle to the batch store.
    pub fn batches(&self) -> Arc<InMemoryBatchSink> {
        Arc::clone(&self.batches)
    }

    /// Returns the readiness policy.
    pub fn policy(&self) -> ReadinessPolicy {
        self.policy
    }
}
