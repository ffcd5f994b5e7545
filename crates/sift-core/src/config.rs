//! Analysis configuration
//!
//! One explicit [`Config`] value is threaded through every engine call; no
//! module reads ambient global state. Loaded from a TOML file when present,
//! otherwise the defaults below apply.
//!
//! ```toml
//! [detector]
//! min_occurrences = 3
//! interval_stddev_ratio = 0.25
//! amount_variance_ratio = 0.10
//!
//! [debt]
//! monthly_budget = "850.00"
//! strategy = "avalanche"
//!
//! [wants]
//! cooling_off_days = 30
//! grace_period_days = 14
//!
//! [inventory]
//! expiration_horizon_days = 14
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::Strategy;

/// Thresholds for the recurrence detector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum charges before a merchant group can qualify
    pub min_occurrences: usize,
    /// Gap stddev must stay within this fraction of the mean gap
    pub interval_stddev_ratio: f64,
    /// Amount spread (max - min) must stay within this fraction of the mean.
    /// The right value is a product decision; tune per taste.
    pub amount_variance_ratio: f64,
    /// A subscription quiet for this multiple of its interval is lapsed
    pub lapse_factor: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 3,
            interval_stddev_ratio: 0.25,
            amount_variance_ratio: 0.10,
            lapse_factor: 1.5,
        }
    }
}

/// Debt simulation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtConfig {
    /// Monthly payoff budget; simulation commands require it here or as a flag
    pub monthly_budget: Option<Decimal>,
    pub strategy: Strategy,
}

impl Default for DebtConfig {
    fn default() -> Self {
        Self {
            monthly_budget: None,
            strategy: Strategy::Avalanche,
        }
    }
}

/// Cooling-off policy for wants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WantsConfig {
    /// Default waiting period for newly logged wants
    pub cooling_off_days: u32,
    /// How long after the waiting period a want stays confirmable
    pub grace_period_days: u32,
}

impl Default for WantsConfig {
    fn default() -> Self {
        Self {
            cooling_off_days: 30,
            grace_period_days: 14,
        }
    }
}

/// Inventory restock alerting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Items depleting within this many days show up in restock alerts
    pub expiration_horizon_days: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            expiration_horizon_days: 14,
        }
    }
}

/// Top-level analysis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub debt: DebtConfig,
    pub wants: WantsConfig,
    pub inventory: InventoryConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            Some(p) => {
                debug!(path = %p.display(), "config file not found; using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}
