//! Quantised percentile lookup table.
//!
//! A table of `100^lookup_precision` keys maps a probability bucket
//! `floor(p · size)` to the smallest outcome whose cumulative probability
//! exceeds the bucket's lower edge. Building is one forward pass over the
//! keys; each lookup is O(1). Answers agree with the linear scan up to the
//! bucket width `1 / size`.

use super::weibull_count::{check_probability, CountError, Quantile};

/// Largest supported lookup precision (10^6 entries).
pub const MAX_LOOKUP_PRECISION: u32 = 3;

/// Lookup precision used when none is configured.
pub const DEFAULT_LOOKUP_PRECISION: u32 = 2;

#[derive(Debug, Clone)]
pub struct PercentileTable {
    lookup_precision: u32,
    outcomes: usize,
    /// Outcome index per key; `outcomes` marks an exhausted scan.
    entries: Vec<usize>,
}

impl PercentileTable {
    /// Build the table from a cumulative probability vector.
    pub fn build(cumulative: &[f64], lookup_precision: u32) -> Result<Self, CountError> {
        if !(1..=MAX_LOOKUP_PRECISION).contains(&lookup_precision) {
            return Err(CountError::InvalidLookupPrecision {
                got: lookup_precision,
                max: MAX_LOOKUP_PRECISION,
            });
        }
        if cumulative.is_empty() {
            return Err(CountError::EmptyDistribution);
        }

        let size = 100usize.pow(lookup_precision);
        let scale = size as f64;
        let outcomes = cumulative.len();
        let mut entries = Vec::with_capacity(size);
        let mut cursor = 0usize;

        for key in 0..size {
            let edge = key as f64;
            // Negated comparison so a NaN entry is skipped like a non-match.
            while cursor < outcomes && !(cumulative[cursor] * scale > edge) {
                cursor += 1;
            }
            entries.push(cursor);
        }

        tracing::debug!(
            target: "wc_math::percentile",
            lookup_precision,
            size,
            outcomes,
            "built percentile table"
        );

        Ok(Self {
            lookup_precision,
            outcomes,
            entries,
        })
    }

    pub fn lookup_precision(&self) -> u32 {
        self.lookup_precision
    }

    /// Number of keys in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Quantile for probability `p` in `[0, 1)`.
    pub fn lookup(&self, p: f64) -> Result<Quantile, CountError> {
        check_probability(p)?;
        let key = ((p * self.entries.len() as f64) as usize).min(self.entries.len() - 1);
        let entry = self.entries[key];
        if entry >= self.outcomes {
            Ok(Quantile::Exhausted {
                last: self.outcomes - 1,
            })
        } else {
            Ok(Quantile::Found(entry))
        }
    }

    pub fn lookup_many(&self, probabilities: &[f64]) -> Result<Vec<Quantile>, CountError> {
        probabilities.iter().map(|&p| self.lookup(p)).collect()
    }
}
