//! Fuzz target for the Weibull count engine.
//!
//! Arbitrary parameters and probabilities: construction either fails with
//! `InvalidParameter` or every query returns without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wc_math::{CountParams, NegativeMassPolicy, PpfMode, WeibullCount};

#[derive(Debug, Arbitrary)]
struct Input {
    rate: f64,
    shape: f64,
    time: f64,
    precision: u8,
    outcomes: u8,
    sentinel: bool,
    lookup_precision: u8,
    probabilities: Vec<f64>,
    indices: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let params = CountParams::new(input.rate, input.shape)
        .with_time(input.time)
        .with_precision(usize::from(input.precision % 64))
        .with_outcomes(usize::from(input.outcomes % 64));
    let Ok(model) = WeibullCount::new(params) else {
        return;
    };
    let model = if input.sentinel {
        model.with_policy(NegativeMassPolicy::InfinitySentinel)
    } else {
        model
    };

    let dist = model.distribution();
    let indices: Vec<usize> = input.indices.iter().map(|&i| usize::from(i)).collect();
    let _ = dist.pmf(&indices);
    let _ = dist.logpmf(&indices);
    let _ = dist.cdf(&indices);
    let _ = dist.sf(&indices);
    let _ = dist.ppf(&input.probabilities, PpfMode::Scan);
    // Precisions 1 and 2 only; 3 allocates a million entries.
    let lookup_precision = u32::from(input.lookup_precision % 2) + 1;
    let _ = dist.ppf(&input.probabilities, PpfMode::Accelerated { lookup_precision });
    let _ = dist.dispersion_index();
});
