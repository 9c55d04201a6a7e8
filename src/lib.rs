//! Payroll Engine
//!
//! This crate computes statutory deductions for compensation records, scans
//! pay cycles for anomalies and compliance violations, scores cycle
//! readiness, and freezes cycle totals into immutable pay run batches.

#![warn(missing_docs)]

pub mod api;
pub mod audit;
pub mod batch;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod validation;
