//! Weibull count model facade.
//!
//! Ties the numeric engine in `wc-math` to file-based configuration from
//! `wc-config`, with a unified error type and logging setup.

pub mod error;
pub mod logging;
pub mod model;

pub use error::{Error, ErrorCategory, Result};
pub use model::CountModel;

pub use wc_config::{CountConfig, NegativeMassMode};
pub use wc_math::{CountDistribution, CountParams, NegativeMassPolicy, PpfMode, Quantile};
