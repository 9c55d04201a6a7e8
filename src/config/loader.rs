//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a statutory
//! [`RuleSet`] from YAML.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};

use super::types::{RuleSet, RuleSetConfig};

/// Loads a rule set from YAML and validates it before handing it out.
///
/// The file holds a single mapping; any key left out falls back to the
/// statutory default:
///
/// ```text
/// pf_rate: "0.12"
/// pf_cap: "1800"
/// esi_rate: "0.0075"
/// esi_threshold: "21000"
/// professional_tax: "200"
/// tax_slabs:
///   - { limit: "300000", rate: "0" }
///   - { limit: null, rate: "0.05" }
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/rules.yaml")?;
/// println!("PF cap: {}", loader.rules().pf_cap());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    rules: RuleSet,
}

impl ConfigLoader {
    /// Loads and validates the rule set at `path`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] if the file cannot be read
    /// - [`EngineError::ConfigParseError`] if it is not valid YAML for a rule set
    /// - [`EngineError::InvalidRuleSet`] if the values fail validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let loader = Self::parse(&content, &path_str)?;
        info!(path = %path_str, slabs = loader.rules.tax_slabs().len(), "Loaded rule set");
        Ok(loader)
    }

    /// Parses and validates a rule set held in memory.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    /// Wraps an already-validated rule set.
    pub fn from_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    fn parse(content: &str, path: &str) -> EngineResult<Self> {
        let config: RuleSetConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let rules = RuleSet::new(config).inspect_err(|err| {
            warn!(path = %path, error = %err, "Rejected rule set");
        })?;

        Ok(Self { rules })
    }

    /// Returns the loaded rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::from_rules(RuleSet::default())
    }
}
