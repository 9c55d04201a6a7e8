//! Configuration loading and management for the Payroll Engine.
//!
//! This module provides the statutory [`RuleSet`] and the loader that reads
//! it from YAML. A rule set is validated once, before any record is
//! processed, and is immutable afterwards.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/rules.yaml").unwrap();
//! println!("ESI threshold: {}", loader.rules().esi_threshold());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{RuleSet, RuleSetConfig, TaxSlab};
