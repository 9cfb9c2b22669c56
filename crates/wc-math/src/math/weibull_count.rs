//! Weibull count distribution.
//!
//! Counts the renewal events in a window `[0, t]` when inter-event times are
//! Weibull distributed with rate `λ` and shape `c`. With `c = 1` this is the
//! Poisson distribution with mean `λ·t`; `c < 1` gives over-dispersed counts
//! and `c > 1` under-dispersed counts.
//!
//! The mass for outcome `n` is a truncated alternating series:
//!
//! ```text
//! P(N = n) ≈ Σ_{j=n}^{n+precision-1} (-1)^(j+n) · (λ t^c)^j · α_j^n / Γ(c·j + 1)
//! ```
//!
//! Only the first `outcomes` counts are computed. Every query rebuilds the
//! coefficient arena and mass vector from the parameters; callers that issue
//! many queries against the same parameters can hold a [`CountDistribution`]
//! instead.
//!
//! # Truncation artifacts
//!
//! When `precision` is too small for the given `rate`/`shape` the truncated
//! series can evaluate negative. [`NegativeMassPolicy::ClampToZero`] (the
//! default) replaces such values with zero and logs a warning;
//! [`NegativeMassPolicy::InfinitySentinel`] keeps the legacy
//! behaviour of writing `+∞`, which poisons every cumulative value after it.
//!
//! ```
//! use wc_math::{CountParams, PpfMode, Quantile, WeibullCount};
//!
//! let model = WeibullCount::new(CountParams::new(3.0, 1.0)).unwrap();
//! let p1 = model.pmf(&[1]).unwrap()[0];
//! assert!((p1 - 0.1494).abs() < 1e-3);
//!
//! let q = model.ppf(&[0.5], PpfMode::Scan).unwrap();
//! assert_eq!(q, vec![Quantile::Found(3)]);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::alpha::AlphaCache;
use super::percentile::PercentileTable;
use super::series::SeriesTerms;

pub const DEFAULT_TIME: f64 = 1.0;
pub const DEFAULT_PRECISION: usize = 20;
pub const DEFAULT_OUTCOMES: usize = 10;
/// Draws per [`WeibullCount::rvs`] call when the caller has no preference.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Largest series depth per outcome. Work grows with `outcomes · precision²`.
pub const MAX_PRECISION: usize = 400;

/// Largest number of outcomes evaluated.
pub const MAX_OUTCOMES: usize = 1000;

/// Errors from Weibull count construction and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CountError {
    #[error("Invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Outcome index {index} out of range (outcomes = {outcomes})")]
    OutcomeOutOfRange { index: usize, outcomes: usize },

    #[error("Probability {0} outside [0, 1)")]
    InvalidProbability(f64),

    #[error("Lookup precision {got} outside 1..={max}")]
    InvalidLookupPrecision { got: u32, max: u32 },

    #[error("Cumulative distribution is empty")]
    EmptyDistribution,
}

/// Result type for Weibull count operations.
pub type Result<T> = std::result::Result<T, CountError>;

pub(crate) fn check_probability(p: f64) -> Result<()> {
    if p.is_finite() && (0.0..1.0).contains(&p) {
        Ok(())
    } else {
        Err(CountError::InvalidProbability(p))
    }
}

fn default_time() -> f64 {
    DEFAULT_TIME
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

fn default_outcomes() -> usize {
    DEFAULT_OUTCOMES
}

/// Distribution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountParams {
    /// Event rate λ (> 0).
    pub rate: f64,

    /// Weibull shape c (> 0). `1.0` reduces to Poisson.
    pub shape: f64,

    /// Observation window length t (> 0).
    #[serde(default = "default_time")]
    pub time: f64,

    /// Series terms summed per outcome.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Number of counts `0..outcomes` evaluated.
    #[serde(default = "default_outcomes")]
    pub outcomes: usize,
}

impl CountParams {
    /// Parameters with the default window, precision and outcome count.
    pub fn new(rate: f64, shape: f64) -> Self {
        Self {
            rate,
            shape,
            time: DEFAULT_TIME,
            precision: DEFAULT_PRECISION,
            outcomes: DEFAULT_OUTCOMES,
        }
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_outcomes(mut self, outcomes: usize) -> Self {
        self.outcomes = outcomes;
        self
    }

    /// `rate · time^shape`, the intensity the series is expanded in.
    pub fn scaled_rate(&self) -> f64 {
        self.rate * self.time.powf(self.shape)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("rate", self.rate), ("shape", self.shape), ("time", self.time)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CountError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and > 0",
                });
            }
        }
        for (name, value, max) in [
            ("precision", self.precision, MAX_PRECISION),
            ("outcomes", self.outcomes, MAX_OUTCOMES),
        ] {
            if value == 0 {
                return Err(CountError::InvalidParameter {
                    name,
                    value: 0.0,
                    reason: "must be >= 1",
                });
            }
            if value > max {
                return Err(CountError::InvalidParameter {
                    name,
                    value: value as f64,
                    reason: "exceeds the supported maximum",
                });
            }
        }
        Ok(())
    }
}

/// What to do with a mass value the truncated series drove below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeMassPolicy {
    /// Replace with 0.0 and log a warning.
    #[default]
    ClampToZero,
    /// Replace with +∞, the legacy marker for an invalid probability.
    InfinitySentinel,
}

/// Result of a quantile query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantile {
    /// Smallest outcome whose cumulative probability exceeds `p`.
    Found(usize),
    /// No computed outcome reached `p`; `last` is the final outcome scanned.
    Exhausted { last: usize },
}

impl Quantile {
    /// Outcome index, falling back to the last scanned outcome on exhaustion.
    pub fn index(&self) -> usize {
        match *self {
            Quantile::Found(j) => j,
            Quantile::Exhausted { last } => last,
        }
    }

    pub fn found(&self) -> Option<usize> {
        match *self {
            Quantile::Found(j) => Some(j),
            Quantile::Exhausted { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Quantile::Exhausted { .. })
    }
}

/// How `ppf` resolves probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PpfMode {
    /// Linear scan of the cumulative vector per probability.
    #[default]
    Scan,
    /// Build a [`PercentileTable`] once and look every probability up in it.
    Accelerated { lookup_precision: u32 },
}

/// Mass and cumulative vectors for one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct CountDistribution {
    mass: Vec<f64>,
    cumulative: Vec<f64>,
    clamped: Vec<usize>,
    policy: NegativeMassPolicy,
}

impl CountDistribution {
    /// Apply the negative-mass policy to raw series sums and accumulate.
    pub fn from_raw_mass(mut mass: Vec<f64>, policy: NegativeMassPolicy) -> Self {
        let mut clamped = Vec::new();
        for (i, m) in mass.iter_mut().enumerate() {
            if *m < 0.0 {
                clamped.push(i);
                *m = match policy {
                    NegativeMassPolicy::ClampToZero => 0.0,
                    NegativeMassPolicy::InfinitySentinel => f64::INFINITY,
                };
            }
        }

        if !clamped.is_empty() {
            tracing::warn!(
                target: "wc_math::mass",
                ?policy,
                count = clamped.len(),
                first = clamped[0],
                "series truncation produced negative mass; increase precision"
            );
        }

        let cumulative = mass
            .iter()
            .scan(0.0, |acc, m| {
                *acc += m;
                Some(*acc)
            })
            .collect();

        Self {
            mass,
            cumulative,
            clamped,
            policy,
        }
    }

    pub fn mass(&self) -> &[f64] {
        &self.mass
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Outcomes whose raw mass was negative before the policy was applied.
    pub fn clamped(&self) -> &[usize] {
        &self.clamped
    }

    pub fn policy(&self) -> NegativeMassPolicy {
        self.policy
    }

    pub fn outcomes(&self) -> usize {
        self.mass.len()
    }

    /// Probability captured by the computed outcomes (`< 1` under truncation).
    pub fn total_mass(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn checked(&self, index: usize) -> Result<usize> {
        if index < self.mass.len() {
            Ok(index)
        } else {
            Err(CountError::OutcomeOutOfRange {
                index,
                outcomes: self.mass.len(),
            })
        }
    }

    pub fn pmf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        indices
            .iter()
            .map(|&i| self.checked(i).map(|i| self.mass[i]))
            .collect()
    }

    /// Natural log of the mass. Zero mass gives `-∞`, the sentinel gives `+∞`.
    pub fn logpmf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        indices
            .iter()
            .map(|&i| self.checked(i).map(|i| self.mass[i].ln()))
            .collect()
    }

    pub fn cdf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        indices
            .iter()
            .map(|&i| self.checked(i).map(|i| self.cumulative[i]))
            .collect()
    }

    /// Survival function `1 - cdf`.
    pub fn sf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        indices
            .iter()
            .map(|&i| self.checked(i).map(|i| 1.0 - self.cumulative[i]))
            .collect()
    }

    /// Smallest outcome with `cumulative > p`, scanning from zero.
    pub fn quantile(&self, p: f64) -> Result<Quantile> {
        check_probability(p)?;
        if self.cumulative.is_empty() {
            return Err(CountError::EmptyDistribution);
        }
        match self.cumulative.iter().position(|&c| c > p) {
            Some(j) => Ok(Quantile::Found(j)),
            None => Ok(Quantile::Exhausted {
                last: self.mass.len() - 1,
            }),
        }
    }

    pub fn percentile_table(&self, lookup_precision: u32) -> Result<PercentileTable> {
        PercentileTable::build(&self.cumulative, lookup_precision)
    }

    pub fn ppf(&self, probabilities: &[f64], mode: PpfMode) -> Result<Vec<Quantile>> {
        match mode {
            PpfMode::Scan => probabilities.iter().map(|&p| self.quantile(p)).collect(),
            PpfMode::Accelerated { lookup_precision } => self
                .percentile_table(lookup_precision)?
                .lookup_many(probabilities),
        }
    }

    /// Mean of the counts, conditioned on the computed outcomes.
    pub fn mean(&self) -> f64 {
        let total = self.total_mass();
        let first: f64 = self
            .mass
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum();
        first / total
    }

    /// Variance of the counts, conditioned on the computed outcomes.
    pub fn variance(&self) -> f64 {
        let total = self.total_mass();
        let mean = self.mean();
        let second: f64 = self
            .mass
            .iter()
            .enumerate()
            .map(|(k, p)| {
                let d = k as f64 - mean;
                d * d * p
            })
            .sum();
        second / total
    }

    /// Variance-to-mean ratio: 1 for Poisson, > 1 over-dispersed, < 1 under.
    pub fn dispersion_index(&self) -> f64 {
        self.variance() / self.mean()
    }
}

/// `size` uniforms in `[0, 1)` for inverse-transform sampling.
pub fn uniform_draws<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<f64> {
    (0..size).map(|_| rng.random::<f64>()).collect()
}

/// Collapse sampled quantiles to outcome indices.
///
/// Exhausted draws become the last computed outcome; how many did so is
/// logged at debug level.
pub fn sample_indices(quantiles: &[Quantile]) -> Vec<usize> {
    let exhausted = quantiles.iter().filter(|q| q.is_exhausted()).count();
    if exhausted > 0 {
        tracing::debug!(
            target: "wc_math::sample",
            exhausted,
            size = quantiles.len(),
            "draws exceeded the computed outcomes"
        );
    }
    quantiles.iter().map(Quantile::index).collect()
}

/// Weibull count distribution with validated parameters.
#[derive(Debug, Clone)]
pub struct WeibullCount {
    params: CountParams,
    policy: NegativeMassPolicy,
    terms: SeriesTerms,
}

impl WeibullCount {
    pub fn new(params: CountParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            policy: NegativeMassPolicy::default(),
            terms: SeriesTerms::new(params.rate, params.shape, params.time),
        })
    }

    pub fn with_policy(mut self, policy: NegativeMassPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn params(&self) -> &CountParams {
        &self.params
    }

    pub fn policy(&self) -> NegativeMassPolicy {
        self.policy
    }

    /// Series sums per outcome before the negative-mass policy is applied.
    pub fn raw_mass(&self) -> Vec<f64> {
        let CountParams {
            precision,
            outcomes,
            ..
        } = self.params;
        let mut alpha = AlphaCache::new(self.terms, precision, outcomes);
        let mut mass = Vec::with_capacity(outcomes);
        for n in 0..outcomes {
            let sum = match alpha.row(n) {
                Some(row) => self.terms.outer_sum(n, row),
                None => break,
            };
            mass.push(sum);
        }
        mass
    }

    /// Evaluate the full mass and cumulative vectors.
    pub fn distribution(&self) -> CountDistribution {
        let p = &self.params;
        tracing::debug!(
            target: "wc_math::mass",
            rate = p.rate,
            shape = p.shape,
            time = p.time,
            scaled_rate = p.scaled_rate(),
            precision = p.precision,
            outcomes = p.outcomes,
            "evaluating weibull count distribution"
        );
        CountDistribution::from_raw_mass(self.raw_mass(), self.policy)
    }

    pub fn pmf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        self.distribution().pmf(indices)
    }

    pub fn logpmf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        self.distribution().logpmf(indices)
    }

    pub fn cdf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        self.distribution().cdf(indices)
    }

    pub fn sf(&self, indices: &[usize]) -> Result<Vec<f64>> {
        self.distribution().sf(indices)
    }

    pub fn ppf(&self, probabilities: &[f64], mode: PpfMode) -> Result<Vec<Quantile>> {
        self.distribution().ppf(probabilities, mode)
    }

    /// Draw `size` counts by inverse-transform sampling.
    ///
    /// Draws past the last computed outcome are reported as that outcome.
    pub fn rvs<R: Rng + ?Sized>(
        &self,
        size: usize,
        mode: PpfMode,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        let draws = uniform_draws(size, rng);
        let quantiles = self.distribution().ppf(&draws, mode)?;
        Ok(sample_indices(&quantiles))
    }

    pub fn mean(&self) -> f64 {
        self.distribution().mean()
    }

    pub fn variance(&self) -> f64 {
        self.distribution().variance()
    }

    pub fn dispersion_index(&self) -> f64 {
        self.distribution().dispersion_index()
    }
}
