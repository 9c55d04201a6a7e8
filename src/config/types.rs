//! Configuration types for statutory deductions.
//!
//! [`RuleSetConfig`] is the raw shape deserialized from YAML; [`RuleSet`] is the
//! validated, immutable form every calculation reads from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::MAX_AMOUNT;

/// One band of the progressive income-tax table.
///
/// `limit` is the cumulative annual income at which this band ends. The
/// final band has no limit and covers everything above the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    /// Upper bound of the band (inclusive), or `None` for the open-ended top band.
    pub limit: Option<Decimal>,
    /// Marginal rate applied to income inside the band.
    pub rate: Decimal,
}

impl TaxSlab {
    /// Creates a bounded slab.
    pub fn bounded(limit: Decimal, rate: Decimal) -> Self {
        Self {
            limit: Some(limit),
            rate,
        }
    }

    /// Creates the open-ended top slab.
    pub fn unbounded(rate: Decimal) -> Self {
        Self { limit: None, rate }
    }
}

fn default_pf_rate() -> Decimal {
    Decimal::new(12, 2)
}

fn default_pf_cap() -> Decimal {
    Decimal::from(1800)
}

fn default_esi_rate() -> Decimal {
    Decimal::new(75, 4)
}

fn default_esi_threshold() -> Decimal {
    Decimal::from(21000)
}

fn default_professional_tax() -> Decimal {
    Decimal::from(200)
}

fn default_tax_slabs() -> Vec<TaxSlab> {
    vec![
        TaxSlab::bounded(Decimal::from(300_000), Decimal::ZERO),
        TaxSlab::bounded(Decimal::from(600_000), Decimal::new(5, 2)),
        TaxSlab::bounded(Decimal::from(900_000), Decimal::new(10, 2)),
        TaxSlab::bounded(Decimal::from(1_200_000), Decimal::new(15, 2)),
        TaxSlab::bounded(Decimal::from(1_500_000), Decimal::new(20, 2)),
        TaxSlab::unbounded(Decimal::new(30, 2)),
    ]
}

fn default_executive_variance_threshold() -> Decimal {
    Decimal::from(500_000)
}

fn default_minimum_wage_floor() -> Decimal {
    Decimal::from(15000)
}

/// Raw rule set as it appears in `rules.yaml`.
///
/// Every key is optional; missing keys take the statutory defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Employee provident fund rate applied to basic pay.
    #[serde(default = "default_pf_rate")]
    pub pf_rate: Decimal,
    /// Employer provident fund rate applied to basic pay.
    #[serde(default = "default_pf_rate")]
    pub pf_employer_rate: Decimal,
    /// Monthly ceiling on each provident fund contribution.
    #[serde(default = "default_pf_cap")]
    pub pf_cap: Decimal,
    /// State insurance rate applied to gross pay.
    #[serde(default = "default_esi_rate")]
    pub esi_rate: Decimal,
    /// Gross pay at or below which state insurance applies.
    #[serde(default = "default_esi_threshold")]
    pub esi_threshold: Decimal,
    /// Flat monthly professional tax.
    #[serde(default = "default_professional_tax")]
    pub professional_tax: Decimal,
    /// Progressive income-tax table, ordered by limit.
    #[serde(default = "default_tax_slabs")]
    pub tax_slabs: Vec<TaxSlab>,
    /// Basic pay above which a record is flagged as an outlier.
    #[serde(default = "default_executive_variance_threshold")]
    pub executive_variance_threshold: Decimal,
    /// Minimum gross monthly wage.
    #[serde(default = "default_minimum_wage_floor")]
    pub minimum_wage_floor: Decimal,
}

impl Default for RuleSetConfig {
    fn default() -> Self {
        Self {
            pf_rate: default_pf_rate(),
            pf_employer_rate: default_pf_rate(),
            pf_cap: default_pf_cap(),
            esi_rate: default_esi_rate(),
            esi_threshold: default_esi_threshold(),
            professional_tax: default_professional_tax(),
            tax_slabs: default_tax_slabs(),
            executive_variance_threshold: default_executive_variance_threshold(),
            minimum_wage_floor: default_minimum_wage_floor(),
        }
    }
}

/// Validated statutory constants for one pay cycle.
///
/// A `RuleSet` comes from [`RuleSet::new`], the loader (which calls it), or
/// `Default` (the statutory values), so every instance is valid. It is never
/// mutated after construction and is safe to share across threads.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{RuleSet, RuleSetConfig};
/// use rust_decimal::Decimal;
///
/// let rules = RuleSet::new(RuleSetConfig::default()).unwrap();
/// assert_eq!(rules.pf_cap(), Decimal::from(1800));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    config: RuleSetConfig,
}

impl RuleSet {
    /// Validates a raw configuration and freezes it into a rule set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleSet`] when a rate is outside `0..=1`,
    /// an amount is negative, or the slab table is empty, non-increasing, or
    /// not closed by a single open-ended slab.
    pub fn new(config: RuleSetConfig) -> EngineResult<Self> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Checks a raw configuration without building a rule set.
    ///
    /// # Errors
    ///
    /// See [`RuleSet::new`].
    pub fn validate(config: &RuleSetConfig) -> EngineResult<()> {
        validate_rate("pf_rate", config.pf_rate)?;
        validate_rate("pf_employer_rate", config.pf_employer_rate)?;
        validate_rate("esi_rate", config.esi_rate)?;
        validate_amount("pf_cap", config.pf_cap)?;
        validate_amount("esi_threshold", config.esi_threshold)?;
        validate_amount("professional_tax", config.professional_tax)?;
        validate_amount(
            "executive_variance_threshold",
            config.executive_variance_threshold,
        )?;
        validate_amount("minimum_wage_floor", config.minimum_wage_floor)?;
        validate_slabs(&config.tax_slabs)
    }

    /// Returns the raw configuration this rule set was built from.
    pub fn config(&self) -> &RuleSetConfig {
        &self.config
    }

    /// Employee provident fund rate.
    pub fn pf_rate(&self) -> Decimal {
        self.config.pf_rate
    }

    /// Employer provident fund rate.
    pub fn pf_employer_rate(&self) -> Decimal {
        self.config.pf_employer_rate
    }

    /// Monthly provident fund ceiling.
    pub fn pf_cap(&self) -> Decimal {
        self.config.pf_cap
    }

    /// State insurance rate.
    pub fn esi_rate(&self) -> Decimal {
        self.config.esi_rate
    }

    /// Inclusive gross threshold for state insurance.
    pub fn esi_threshold(&self) -> Decimal {
        self.config.esi_threshold
    }

    /// Flat monthly professional tax.
    pub fn professional_tax(&self) -> Decimal {
        self.config.professional_tax
    }

    /// Income-tax slabs, ordered by limit with the open-ended slab last.
    pub fn tax_slabs(&self) -> &[TaxSlab] {
        &self.config.tax_slabs
    }

    /// Highest marginal rate in the slab table.
    pub fn max_tax_rate(&self) -> Decimal {
        self.config
            .tax_slabs
            .iter()
            .map(|slab| slab.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Basic pay above which the outlier heuristic fires.
    pub fn executive_variance_threshold(&self) -> Decimal {
        self.config.executive_variance_threshold
    }

    /// Minimum gross monthly wage.
    pub fn minimum_wage_floor(&self) -> Decimal {
        self.config.minimum_wage_floor
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        // The statutory defaults are known-good, so skip re-validation.
        Self {
            config: RuleSetConfig::default(),
        }
    }
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidRuleSet {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate_rate(field: &str, rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(invalid(field, format!("must be between 0 and 1, got {}", rate)));
    }
    Ok(())
}

fn validate_amount(field: &str, amount: Decimal) -> EngineResult<()> {
    if amount < Decimal::ZERO {
        return Err(invalid(field, format!("must not be negative, got {}", amount)));
    }
    if amount > MAX_AMOUNT {
        return Err(invalid(
            field,
            format!("must not exceed {}, got {}", MAX_AMOUNT, amount),
        ));
    }
    Ok(())
}

fn validate_slabs(slabs: &[TaxSlab]) -> EngineResult<()> {
    if slabs.is_empty() {
        return Err(invalid("tax_slabs", "at least one slab is required"));
    }

    let mut previous_limit = Decimal::ZERO;
    let last_index = slabs.len() - 1;

    for (index, slab) in slabs.iter().enumerate() {
        validate_rate(&format!("tax_slabs[{}].rate", index), slab.rate)?;

        match slab.limit {
            Some(limit) => {
                if index == last_index {
                    return Err(invalid(
                        "tax_slabs",
                        "the final slab must be open-ended (limit: null)",
                    ));
                }
                if limit <= previous_limit {
                    return Err(invalid(
                        &format!("tax_slabs[{}].limit", index),
                        format!(
                            "limits must be strictly increasing, got {} after {}",
                            limit, previous_limit
                        ),
                    ));
                }
                previous_limit = limit;
            }
            None if index != last_index => {
                return Err(invalid(
                    &format!("tax_slabs[{}].limit", index),
                    "only the final slab may be open-ended",
                ));
            }
            None => {}
        }
    }

    Ok(())
}
