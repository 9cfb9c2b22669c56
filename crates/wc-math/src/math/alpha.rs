//! Alpha coefficient arena for the Weibull count series.
//!
//! Row `n` holds `precision` coefficients, slot `i` belonging to series index
//! `j = n + i`. Row 0 is `inner(i, 0)`. For `n > 0`, slot `i` is the dot
//! product of the first `i + 1` coefficients of row `n - 1` with
//! `inner(j, m)` for `m` in `n-1..j`. Each row reads only its predecessor.
//!
//! Rows are stored contiguously and built lazily up to the highest row
//! requested. The arena is scratch space for a single evaluation and is only
//! created by the engine.

use super::series::SeriesTerms;
use super::weibull_count::{MAX_OUTCOMES, MAX_PRECISION};

#[derive(Debug, Clone)]
pub(crate) struct AlphaCache {
    terms: SeriesTerms,
    precision: usize,
    outcomes: usize,
    /// Row-major `outcomes × precision`.
    coeffs: Vec<f64>,
    /// Number of rows already computed.
    built: usize,
}

impl AlphaCache {
    /// Dimensions come from validated [`CountParams`](super::weibull_count::CountParams),
    /// which caps both at `MAX_PRECISION` and `MAX_OUTCOMES`.
    pub(crate) fn new(terms: SeriesTerms, precision: usize, outcomes: usize) -> Self {
        debug_assert!(precision <= MAX_PRECISION && outcomes <= MAX_OUTCOMES);
        Self {
            terms,
            precision,
            outcomes,
            coeffs: vec![0.0; outcomes * precision],
            built: 0,
        }
    }

    /// Rows computed so far.
    #[cfg(test)]
    fn built(&self) -> usize {
        self.built
    }

    /// Coefficient row for outcome `n`, building every missing row up to it.
    ///
    /// Returns `None` when `n` is past the last outcome.
    pub(crate) fn row(&mut self, n: usize) -> Option<&[f64]> {
        if n >= self.outcomes {
            return None;
        }
        while self.built <= n {
            self.build_next();
        }
        let start = n * self.precision;
        Some(&self.coeffs[start..start + self.precision])
    }

    fn build_next(&mut self) {
        let n = self.built;
        let p = self.precision;

        if n == 0 {
            for i in 0..p {
                self.coeffs[i] = self.terms.inner(i, 0);
            }
        } else {
            let (done, rest) = self.coeffs.split_at_mut(n * p);
            let prev = &done[(n - 1) * p..];
            let row = &mut rest[..p];
            for (i, slot) in row.iter_mut().enumerate() {
                let j = n + i;
                let sweep = self.terms.inner_sweep(j, n - 1..j);
                *slot = prev[..sweep.len()]
                    .iter()
                    .zip(&sweep)
                    .map(|(a, b)| a * b)
                    .sum();
            }
        }

        self.built += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    fn binomial(n: u64, k: u64) -> f64 {
        (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
    }

    #[test]
    fn base_row_is_inner_against_zero() {
        let terms = SeriesTerms::new(2.0, 1.5, 1.0);
        let mut cache = AlphaCache::new(terms, 6, 3);
        let row = cache.row(0).unwrap().to_vec();
        for (i, v) in row.iter().enumerate() {
            assert_eq!(*v, terms.inner(i, 0));
        }
        assert_eq!(cache.built(), 1);
    }

    #[test]
    fn exponential_shape_gives_binomial_coefficients() {
        // With shape 1 every inner term is 1, so row n slot i = C(n + i, n).
        let terms = SeriesTerms::new(1.0, 1.0, 1.0);
        let mut cache = AlphaCache::new(terms, 8, 5);
        for n in 0..5u64 {
            let row = cache.row(n as usize).unwrap().to_vec();
            for (i, v) in row.iter().enumerate() {
                let expected = binomial(n + i as u64, n);
                assert!(
                    approx_eq(*v, expected, 1e-9 * expected.max(1.0)),
                    "row {} slot {}: got {}, expected {}",
                    n,
                    i,
                    v,
                    expected
                );
            }
        }
    }

    #[test]
    fn slot_is_dot_product_of_previous_prefix() {
        let terms = SeriesTerms::new(1.0, 0.7, 1.0);
        let mut cache = AlphaCache::new(terms, 5, 4);
        let prev = cache.row(1).unwrap().to_vec();
        let row = cache.row(2).unwrap().to_vec();
        // slot 3 => j = 5, baseline m in 1..5
        let sweep = terms.inner_sweep(5, 1..5);
        let expected: f64 = prev[..4].iter().zip(&sweep).map(|(a, b)| a * b).sum();
        assert_eq!(row[3], expected);
    }

    #[test]
    fn rows_build_lazily_and_once() {
        let terms = SeriesTerms::new(1.0, 1.2, 1.0);
        let mut cache = AlphaCache::new(terms, 4, 6);
        assert_eq!(cache.built(), 0);
        let r3 = cache.row(3).unwrap().to_vec();
        assert_eq!(cache.built(), 4);
        let _ = cache.row(1);
        assert_eq!(cache.built(), 4);
        assert_eq!(cache.row(3).unwrap(), r3.as_slice());
    }

    #[test]
    fn out_of_range_row_is_none() {
        let terms = SeriesTerms::new(1.0, 1.0, 1.0);
        let mut cache = AlphaCache::new(terms, 4, 2);
        assert!(cache.row(2).is_none());
        assert_eq!(cache.built(), 0);
    }

    #[test]
    fn coefficients_are_positive() {
        let terms = SeriesTerms::new(2.0, 0.6, 1.0);
        let mut cache = AlphaCache::new(terms, 10, 6);
        for n in 0..6 {
            assert!(cache.row(n).unwrap().iter().all(|v| *v > 0.0));
        }
    }
}
