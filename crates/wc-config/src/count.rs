//! Count model configuration types.
//!
//! A minimal JSON file:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "distribution": { "rate": 3.0, "shape": 1.2 }
//! }
//! ```
//!
//! The same layout is accepted as TOML when the file ends in `.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Complete count model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountConfig {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    pub distribution: DistributionSection,

    #[serde(default)]
    pub negative_mass: NegativeMassMode,

    #[serde(default)]
    pub lookup: LookupSection,
}

/// Distribution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSection {
    pub rate: f64,
    pub shape: f64,

    #[serde(default = "default_time")]
    pub time: f64,

    #[serde(default = "default_precision")]
    pub precision: usize,

    #[serde(default = "default_outcomes")]
    pub outcomes: usize,
}

/// Handling of negative mass values from series truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeMassMode {
    #[default]
    ClampToZero,
    InfinitySentinel,
}

/// Quantile lookup settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSection {
    /// Answer quantile queries from a precomputed table.
    #[serde(default)]
    pub accelerated: bool,

    /// Table holds `100^lookup_precision` buckets.
    #[serde(default = "default_lookup_precision")]
    pub lookup_precision: u32,
}

impl Default for LookupSection {
    fn default() -> Self {
        Self {
            accelerated: false,
            lookup_precision: default_lookup_precision(),
        }
    }
}

fn default_time() -> f64 {
    wc_math::DEFAULT_TIME
}

fn default_precision() -> usize {
    wc_math::DEFAULT_PRECISION
}

fn default_outcomes() -> usize {
    wc_math::DEFAULT_OUTCOMES
}

fn default_lookup_precision() -> u32 {
    wc_math::DEFAULT_LOOKUP_PRECISION
}

impl CountConfig {
    /// Config for the given rate and shape with every other field defaulted.
    pub fn new(rate: f64, shape: f64) -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            distribution: DistributionSection {
                rate,
                shape,
                time: default_time(),
                precision: default_precision(),
                outcomes: default_outcomes(),
            },
            negative_mass: NegativeMassMode::default(),
            lookup: LookupSection::default(),
        }
    }

    /// Load from a file; `.toml` files are parsed as TOML, anything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        tracing::debug!(
            target: "wc_config::load",
            path = %path.display(),
            format = if is_toml { "toml" } else { "json" },
            "loading count config"
        );

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ValidationError> {
        toml::from_str(toml_str)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    pub fn to_json_pretty(&self) -> Result<String, ValidationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Serialize failed: {}", e)))
    }

    /// Semantic validation; see [`crate::validate::validate_config`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_config(self)
    }
}
