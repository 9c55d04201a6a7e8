//! Pay run aggregation.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::calculation::DeductionCalculator;
use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationRecord, CycleTotals, PayRunBatch, ReadinessScore};
use crate::pipeline::RecordScan;

/// Sums a cycle's records into a frozen [`PayRunBatch`].
///
/// Totals are reduced in parallel with [`CycleTotals::checked_merge`], so the
/// result does not depend on how the records are partitioned or ordered. Sums
/// that leave the `Decimal` range fail the pay run instead of panicking.
///
/// # Example
///
/// ```
/// use payroll_engine::batch::BatchAggregator;
/// use payroll_engine::config::RuleSet;
/// use payroll_engine::models::CompensationRecord;
/// use rust_decimal::Decimal;
///
/// let rules = RuleSet::default();
/// let records = vec![
///     CompensationRecord::new("emp_001", Decimal::from(10000), Decimal::from(15000)),
///     CompensationRecord::new("emp_002", Decimal::from(50000), Decimal::from(60000)),
/// ];
///
/// let batch = BatchAggregator::new(&rules).create_pay_run("2026-09", &records)?;
/// assert_eq!(batch.total_gross(), Decimal::from(75000));
/// assert_eq!(batch.total_deductions(), Decimal::from(5763));
/// assert_eq!(batch.net_payable(), Decimal::from(69237));
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchAggregator<'a> {
    calculator: DeductionCalculator<'a>,
}

impl<'a> BatchAggregator<'a> {
    /// Creates an aggregator that computes deductions with `rules`.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            calculator: DeductionCalculator::new(rules),
        }
    }

    /// Sums gross and computed deductions over `records`.
    ///
    /// Returns `None` if a sum overflows.
    pub fn totals(&self, records: &[CompensationRecord]) -> Option<CycleTotals> {
        records
            .par_iter()
            .map(|record| {
                let breakdown = self.calculator.compute(record);
                Some(CycleTotals::single(record.gross, breakdown.total_deductions))
            })
            .try_reduce(CycleTotals::default, CycleTotals::checked_merge)
    }

    /// Sums gross and deductions over already-scanned records.
    ///
    /// Returns `None` if a sum overflows.
    pub fn totals_from_scans(scans: &[RecordScan]) -> Option<CycleTotals> {
        scans
            .par_iter()
            .map(|scan| {
                Some(CycleTotals::single(
                    scan.record.gross,
                    scan.breakdown.total_deductions,
                ))
            })
            .try_reduce(CycleTotals::default, CycleTotals::checked_merge)
    }

    /// Creates a batch for `cycle_id` from raw records.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyPayRun`] if `records` is empty, or
    /// [`EngineError::TotalsOverflow`] if the totals cannot be represented.
    pub fn create_pay_run(
        &self,
        cycle_id: &str,
        records: &[CompensationRecord],
    ) -> EngineResult<PayRunBatch> {
        reject_empty(cycle_id, records.len())?;
        freeze(cycle_id, self.totals(records), None)
    }

    /// Creates a batch from scans, recording the readiness score observed at initiation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyPayRun`] if `scans` is empty, or
    /// [`EngineError::TotalsOverflow`] if the totals cannot be represented.
    pub fn create_pay_run_from_scans(
        cycle_id: &str,
        scans: &[RecordScan],
        readiness_score: Option<ReadinessScore>,
    ) -> EngineResult<PayRunBatch> {
        reject_empty(cycle_id, scans.len())?;
        freeze(cycle_id, Self::totals_from_scans(scans), readiness_score)
    }
}

pub(super) fn reject_empty(cycle_id: &str, count: usize) -> EngineResult<()> {
    if count == 0 {
        warn!(cycle_id = %cycle_id, "Rejected pay run with no records");
        return Err(EngineError::EmptyPayRun {
            cycle_id: cycle_id.to_string(),
        });
    }
    Ok(())
}

fn freeze(
    cycle_id: &str,
    totals: Option<CycleTotals>,
    readiness_score: Option<ReadinessScore>,
) -> EngineResult<PayRunBatch> {
    let batch = totals
        .ok_or_else(|| EngineError::TotalsOverflow {
            cycle_id: cycle_id.to_string(),
        })
        .and_then(|totals| PayRunBatch::initiate(cycle_id, totals, readiness_score))
        .inspect_err(|_| {
            warn!(cycle_id = %cycle_id, "Rejected pay run with totals out of range");
        })?;

    info!(
        cycle_id = %cycle_id,
        batch_id = %batch.batch_id(),
        records = batch.record_count(),
        total_gross = %batch.total_gross(),
        total_deductions = %batch.total_deductions(),
        net_payable = %batch.net_payable(),
        "Pay run batch initiated"
    );
    Ok(batch)
}
