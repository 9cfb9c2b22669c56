//! Weibull count distribution math.
//!
//! Probability mass, cumulative probability, quantiles and sampling for the
//! number of renewal events in a fixed window when inter-event times follow
//! a Weibull distribution.

pub mod math;

pub use math::percentile::{PercentileTable, DEFAULT_LOOKUP_PRECISION, MAX_LOOKUP_PRECISION};
pub use math::series::SeriesTerms;
pub use math::stable::*;
pub use math::weibull_count::*;
