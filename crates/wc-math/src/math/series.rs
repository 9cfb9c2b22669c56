//! Series terms of the Weibull count expansion.
//!
//! The probability of `n` events in `[0, t]` is an alternating series
//!
//! ```text
//! P(N = n) = Σ_{j ≥ n} (-1)^(j+n) · (λ t^c)^j · α_j^n / Γ(c·j + 1)
//! ```
//!
//! where `c` is the Weibull shape and `α_j^n` are the coefficients built in
//! [`super::alpha`]. Two building blocks live here:
//!
//! - the *inner* term `Γ(c·(j-m) + 1) / Γ(j-m+1)`, which feeds the alpha
//!   recurrence;
//! - the *outer* term, the signed summand above for one `j`.

use std::ops::Range;

use super::stable::{gamma_ratio, log_gamma};

/// Parameter-bound evaluator for inner and outer series terms.
#[derive(Debug, Clone, Copy)]
pub struct SeriesTerms {
    shape: f64,
    /// ln(rate · time^shape)
    log_scaled_rate: f64,
}

impl SeriesTerms {
    pub fn new(rate: f64, shape: f64, time: f64) -> Self {
        Self {
            shape,
            log_scaled_rate: rate.ln() + shape * time.ln(),
        }
    }

    /// Inner term for series index `j` against baseline index `m` (`m <= j`).
    #[inline]
    pub fn inner(&self, j: usize, m: usize) -> f64 {
        debug_assert!(m <= j, "inner term needs m <= j (j={}, m={})", j, m);
        let d = (j - m) as f64;
        gamma_ratio(self.shape * d + 1.0, d + 1.0)
    }

    /// Inner terms for a fixed `j` over a sweep of baseline indices.
    pub fn inner_sweep(&self, j: usize, baseline: Range<usize>) -> Vec<f64> {
        baseline.map(|m| self.inner(j, m)).collect()
    }

    /// Outer term for series index `j`, outcome `n` and coefficient `alpha`.
    ///
    /// Evaluated as `±exp(j·ln λ + ln|α| - lnΓ(c·j + 1))` so deep series
    /// indices do not overflow the gamma function.
    #[inline]
    pub fn outer(&self, j: usize, n: usize, alpha: f64) -> f64 {
        if alpha == 0.0 {
            return 0.0;
        }
        if alpha.is_nan() {
            return f64::NAN;
        }
        let log_mag =
            j as f64 * self.log_scaled_rate + alpha.abs().ln() - log_gamma(self.shape * j as f64 + 1.0);
        let odd = (j + n) % 2 == 1;
        let negative = odd != alpha.is_sign_negative();
        if negative {
            -log_mag.exp()
        } else {
            log_mag.exp()
        }
    }

    /// Sum of the outer terms for outcome `n` over `j = n..n + alpha_row.len()`,
    /// pairing each `j` with the matching alpha slot.
    pub fn outer_sum(&self, n: usize, alpha_row: &[f64]) -> f64 {
        alpha_row
            .iter()
            .enumerate()
            .map(|(i, &alpha)| self.outer(n + i, n, alpha))
            .sum()
    }
}
