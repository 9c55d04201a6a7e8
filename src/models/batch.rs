//! Pay run batch model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ReadinessScore;
use crate::error::{EngineError, EngineResult};

/// Lifecycle state of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Frozen and handed to disbursement.
    Initiated,
}

/// Cycle totals with the record count they were summed over.
///
/// Partial totals combine with [`CycleTotals::checked_merge`], which is
/// associative and commutative with `CycleTotals::default()` as identity, so
/// a cycle can be summed in shards. A merge whose sums leave the `Decimal`
/// range yields `None` instead of panicking.
///
/// # Example
///
/// ```
/// use payroll_engine::models::CycleTotals;
/// use rust_decimal::Decimal;
///
/// let a = CycleTotals::single(Decimal::from(15000), Decimal::from(1513));
/// let b = CycleTotals::single(Decimal::from(60000), Decimal::from(4250));
/// let total = a.checked_merge(b).unwrap();
/// assert_eq!(total.record_count, 2);
/// assert_eq!(total.net_payable(), Some(Decimal::from(69237)));
///
/// let full = CycleTotals::single(Decimal::MAX, Decimal::ZERO);
/// assert_eq!(full.checked_merge(a), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTotals {
    /// Sum of gross pay.
    pub total_gross: Decimal,
    /// Sum of total deductions.
    pub total_deductions: Decimal,
    /// Number of records summed.
    pub record_count: usize,
}

impl CycleTotals {
    /// Totals for a single record.
    pub fn single(gross: Decimal, deductions: Decimal) -> Self {
        Self {
            total_gross: gross,
            total_deductions: deductions,
            record_count: 1,
        }
    }

    /// Combines two partial totals, or `None` if either sum overflows.
    pub fn checked_merge(self, other: Self) -> Option<Self> {
        Some(Self {
            total_gross: self.total_gross.checked_add(other.total_gross)?,
            total_deductions: self.total_deductions.checked_add(other.total_deductions)?,
            record_count: self.record_count.checked_add(other.record_count)?,
        })
    }

    /// Gross less deductions, or `None` if the difference overflows.
    pub fn net_payable(&self) -> Option<Decimal> {
        self.total_gross.checked_sub(self.total_deductions)
    }
}

/// The frozen, aggregated record of a disbursement cycle.
///
/// A batch has no setters. Corrections are made by creating a new batch
/// under a new cycle id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRunBatch {
    batch_id: Uuid,
    cycle_id: String,
    total_gross: Decimal,
    total_deductions: Decimal,
    net_payable: Decimal,
    record_count: usize,
    status: BatchStatus,
    readiness_score: Option<ReadinessScore>,
    created_at: DateTime<Utc>,
}

impl PayRunBatch {
    /// Freezes cycle totals into a new batch.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TotalsOverflow`] if the net payable cannot be
    /// represented.
    pub fn initiate(
        cycle_id: impl Into<String>,
        totals: CycleTotals,
        readiness_score: Option<ReadinessScore>,
    ) -> EngineResult<Self> {
        let cycle_id = cycle_id.into();
        let Some(net_payable) = totals.net_payable() else {
            return Err(EngineError::TotalsOverflow { cycle_id });
        };

        Ok(Self {
            batch_id: Uuid::new_v4(),
            cycle_id,
            total_gross: totals.total_gross,
            total_deductions: totals.total_deductions,
            net_payable,
            record_count: totals.record_count,
            status: BatchStatus::Initiated,
            readiness_score,
            created_at: Utc::now(),
        })
    }

    /// Unique batch identifier.
    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    /// The pay cycle this batch disburses.
    pub fn cycle_id(&self) -> &str {
        &self.cycle_id
    }

    /// Sum of gross pay.
    pub fn total_gross(&self) -> Decimal {
        self.total_gross
    }

    /// Sum of deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.total_deductions
    }

    /// Gross less deductions.
    pub fn net_payable(&self) -> Decimal {
        self.net_payable
    }

    /// Number of records in the batch.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Current status.
    pub fn status(&self) -> BatchStatus {
        self.status
    }

    /// Readiness score captured when the batch was initiated, if one was computed.
    pub fn readiness_score(&self) -> Option<ReadinessScore> {
        self.readiness_score
    }

    /// When the batch was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the totals this batch was frozen from.
    pub fn totals(&self) -> CycleTotals {
        CycleTotals {
            total_gross: self.total_gross,
            total_deductions: self.total_deductions,
            record_count: self.record_count,
        }
    }
}
