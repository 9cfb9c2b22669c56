//! Config-driven Weibull count model.
//!
//! [`CountModel`] turns a validated [`CountConfig`] into an engine, evaluates
//! the distribution once and answers every query from that evaluation. When
//! the lookup section enables acceleration, the percentile table is built up
//! front as well.

use std::path::Path;

use rand::Rng;
use wc_config::{resolve_config, ConfigSource, CountConfig, NegativeMassMode, ValidationError};
use wc_math::{
    sample_indices, uniform_draws, CountDistribution, CountParams, NegativeMassPolicy,
    PercentileTable, PpfMode, Quantile, WeibullCount,
};

use crate::error::Result;

/// Map the config's negative-mass mode onto the engine policy.
pub fn policy_for(mode: NegativeMassMode) -> NegativeMassPolicy {
    match mode {
        NegativeMassMode::ClampToZero => NegativeMassPolicy::ClampToZero,
        NegativeMassMode::InfinitySentinel => NegativeMassPolicy::InfinitySentinel,
    }
}

/// Map the config's lookup section onto a quantile mode.
pub fn ppf_mode_for(config: &CountConfig) -> PpfMode {
    if config.lookup.accelerated {
        PpfMode::Accelerated {
            lookup_precision: config.lookup.lookup_precision,
        }
    } else {
        PpfMode::Scan
    }
}

#[derive(Debug, Clone)]
pub struct CountModel {
    engine: WeibullCount,
    mode: PpfMode,
    distribution: CountDistribution,
    table: Option<PercentileTable>,
    source: ConfigSource,
}

impl CountModel {
    /// Validate `config` and evaluate the distribution it describes.
    pub fn from_config(config: &CountConfig) -> Result<Self> {
        Self::build(config, ConfigSource::NotFound)
    }

    /// Resolve, read and build. `cli_path` takes precedence over the
    /// environment and the XDG config directory.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let resolved = resolve_config(cli_path);
        let path = resolved.path.ok_or_else(|| {
            ValidationError::MissingConfig(
                "no count config found (CLI path, WEIBULL_COUNT_CONFIG, WEIBULL_COUNT_CONFIG_DIR, XDG)"
                    .to_string(),
            )
        })?;

        tracing::info!(
            target: "wc_core::model",
            path = %path.display(),
            source = %resolved.source,
            "loading count model"
        );

        let config = CountConfig::from_file(&path)?;
        Self::build(&config, resolved.source)
    }

    fn build(config: &CountConfig, source: ConfigSource) -> Result<Self> {
        config.validate()?;

        let d = &config.distribution;
        let params = CountParams::new(d.rate, d.shape)
            .with_time(d.time)
            .with_precision(d.precision)
            .with_outcomes(d.outcomes);
        let engine = WeibullCount::new(params)?.with_policy(policy_for(config.negative_mass));
        let mode = ppf_mode_for(config);
        let distribution = engine.distribution();

        let table = match mode {
            PpfMode::Accelerated { lookup_precision } => {
                Some(distribution.percentile_table(lookup_precision)?)
            }
            PpfMode::Scan => None,
        };

        tracing::debug!(
            target: "wc_core::model",
            ?mode,
            total_mass = distribution.total_mass(),
            clamped = distribution.clamped().len(),
            "count model ready"
        );

        Ok(Self {
            engine,
            mode,
            distribution,
            table,
            source,
        })
    }

    pub fn engine(&self) -> &WeibullCount {
        &self.engine
    }

    pub fn params(&self) -> &CountParams {
        self.engine.params()
    }

    pub fn mode(&self) -> PpfMode {
        self.mode
    }

    /// Where the configuration came from; `NotFound` for in-memory configs.
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    pub fn distribution(&self) -> &CountDistribution {
        &self.distribution
    }

    pub fn pmf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        Ok(self.distribution.pmf(indices)?)
    }

    pub fn logpmf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        Ok(self.distribution.logpmf(indices)?)
    }

    pub fn cdf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        Ok(self.distribution.cdf(indices)?)
    }

    pub fn sf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        Ok(self.distribution.sf(indices)?)
    }

    /// Quantiles in the configured mode.
    pub fn ppf(&self, probabilities: &[f64]) -> Result<Vec<Quantile>> {
        let quantiles = match &self.table {
            Some(table) => table.lookup_many(probabilities)?,
            None => self.distribution.ppf(probabilities, PpfMode::Scan)?,
        };
        Ok(quantiles)
    }

    /// Draw `size` counts in the configured mode.
    pub fn rvs<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Result<Vec<usize>> {
        let draws = uniform_draws(size, rng);
        Ok(sample_indices(&self.ppf(&draws)?))
    }

    pub fn mean(&self) -> f64 {
        self.distribution.mean()
    }

    pub fn variance(&self) -> f64 {
        self.distribution.variance()
    }

    pub fn dispersion_index(&self) -> f64 {
        self.distribution.dispersion_index()
    }
}
