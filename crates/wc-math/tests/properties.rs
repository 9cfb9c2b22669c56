//! Property-based tests for the Weibull count distribution.
//!
//! Parameters stay in a range where `precision = 30` keeps the truncated
//! series accurate (`rate · time^shape` below ~4).

use proptest::prelude::*;
use wc_math::{
    gamma_ratio, log_factorial, log_gamma, CountParams, PercentileTable, Quantile, WeibullCount,
};

/// Slack for round-off when the captured mass is essentially 1.
const MASS_TOL: f64 = 1e-9;

const PRECISION: usize = 30;
const OUTCOMES: usize = 12;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

fn build(rate: f64, shape: f64, time: f64) -> WeibullCount {
    let params = CountParams::new(rate, shape)
        .with_time(time)
        .with_precision(PRECISION)
        .with_outcomes(OUTCOMES);
    WeibullCount::new(params).expect("valid params")
}

// ============================================================================
// gamma ratio properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Γ(z+1)/Γ(z) = z.
    #[test]
    fn gamma_ratio_recurrence(z in 0.5..150.0f64) {
        let r = gamma_ratio(z + 1.0, z);
        prop_assert!(approx_eq(r, z, 1e-9), "Γ({}+1)/Γ({}) = {}", z, z, r);
    }

    /// Ratios at integers are falling factorials.
    #[test]
    fn gamma_ratio_integers(n in 1u64..40, k in 0u64..10) {
        let r = gamma_ratio((n + k) as f64 + 1.0, n as f64 + 1.0);
        let expected = (log_factorial(n + k) - log_factorial(n)).exp();
        prop_assert!(approx_eq(r, expected, 1e-9));
    }

    /// Swapping arguments inverts the ratio.
    #[test]
    fn gamma_ratio_antisymmetric(a in 0.5..60.0f64, b in 0.5..60.0f64) {
        let forward = gamma_ratio(a, b);
        let backward = gamma_ratio(b, a);
        prop_assert!(approx_eq(forward * backward, 1.0, 1e-9));
        prop_assert!(approx_eq(forward.ln(), log_gamma(a) - log_gamma(b), 1e-9));
    }
}

// ============================================================================
// distribution properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Cumulative probabilities never decrease and stay within [0, 1].
    #[test]
    fn cumulative_monotone_and_bounded(
        rate in 0.2..2.5f64,
        shape in 0.9..2.0f64,
        time in 0.5..1.2f64,
    ) {
        let dist = build(rate, shape, time).distribution();
        for w in dist.cumulative().windows(2) {
            prop_assert!(w[0] <= w[1], "cumulative decreased: {:?}", w);
        }
        prop_assert!(dist.cumulative()[0] >= 0.0);
        prop_assert!(dist.total_mass() <= 1.0 + MASS_TOL, "total {}", dist.total_mass());
        for (k, m) in dist.mass().iter().enumerate() {
            prop_assert!(m.is_finite() && *m >= 0.0 && *m <= 1.0, "mass[{}] = {}", k, m);
        }
    }

    /// No count occurs with probability exp(-rate · time^shape).
    #[test]
    fn zero_count_is_weibull_survival(
        rate in 0.2..2.5f64,
        shape in 0.9..2.0f64,
        time in 0.5..1.2f64,
    ) {
        let model = build(rate, shape, time);
        let p0 = model.pmf(&[0]).unwrap()[0];
        let expected = (-rate * time.powf(shape)).exp();
        prop_assert!(approx_eq(p0, expected, 1e-9), "P(0) = {}, expected {}", p0, expected);
    }

    /// Shape 1 is a Poisson process with mean rate · time.
    #[test]
    fn shape_one_is_poisson(rate in 0.2..3.0f64, time in 0.5..1.2f64, k in 0usize..OUTCOMES) {
        let model = build(rate, 1.0, time);
        let mu = rate * time;
        let p = model.pmf(&[k]).unwrap()[0];
        let expected = (k as f64 * mu.ln() - mu - log_factorial(k as u64)).exp();
        prop_assert!(approx_eq(p, expected, 1e-8), "k={} got {} expected {}", k, p, expected);
    }

    /// Identical parameters give identical vectors.
    #[test]
    fn reproducible(rate in 0.2..2.5f64, shape in 0.9..2.0f64) {
        let a = build(rate, shape, 1.0).distribution();
        let b = build(rate, shape, 1.0).distribution();
        prop_assert_eq!(a, b);
    }

    /// A quantile j satisfies cdf(j) > p and cdf(j-1) <= p unless the scan ran out.
    #[test]
    fn quantile_consistency(
        rate in 0.2..2.5f64,
        shape in 0.9..2.0f64,
        p in 0.0..1.0f64,
    ) {
        let dist = build(rate, shape, 1.0).distribution();
        let cumulative = dist.cumulative();
        match dist.quantile(p).unwrap() {
            Quantile::Found(j) => {
                prop_assert!(cumulative[j] > p);
                if j > 0 {
                    prop_assert!(cumulative[j - 1] <= p);
                }
            }
            Quantile::Exhausted { last } => {
                prop_assert_eq!(last, OUTCOMES - 1);
                prop_assert!(cumulative.iter().all(|&c| c <= p));
            }
        }
    }

    /// The lookup table answers like the scan except inside the bucket that
    /// holds a cumulative value.
    #[test]
    fn accelerated_matches_scan(
        rate in 0.2..2.5f64,
        shape in 0.9..2.0f64,
        probs in prop::collection::vec(0.0..1.0f64, 1..32),
    ) {
        let dist = build(rate, shape, 1.0).distribution();
        let table = PercentileTable::build(dist.cumulative(), 2).unwrap();
        let width = 1.0 / table.len() as f64;
        for &p in &probs {
            let scan = dist.quantile(p).unwrap();
            let fast = table.lookup(p).unwrap();
            if scan != fast {
                let near_edge = dist
                    .cumulative()
                    .iter()
                    .any(|&c| (c - p).abs() <= width);
                prop_assert!(near_edge, "p={} scan={:?} fast={:?}", p, scan, fast);
            }
        }
    }
}
