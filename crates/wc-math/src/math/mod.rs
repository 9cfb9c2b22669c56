//! Core math modules.

pub mod alpha;
pub mod percentile;
pub mod series;
pub mod stable;
pub mod weibull_count;
