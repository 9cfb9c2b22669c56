//! Error types for the Weibull count facade.
//!
//! Every error carries a stable numeric code and a category:
//! - 20-29: domain errors (parameters the series cannot be evaluated for)
//! - 30-39: query errors (indices, probabilities, lookup precision)
//! - 60-69: configuration errors, including reading the file (codes from
//!   `wc_config::ValidationError`)

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wc_config::ValidationError;
use wc_math::CountError;

/// Result type alias for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration loading and validation.
    Config,
    /// Invalid distribution parameters.
    Domain,
    /// Invalid arguments to a query on a valid distribution.
    Query,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Domain => write!(f, "domain"),
            ErrorCategory::Query => write!(f, "query"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ValidationError),

    #[error(transparent)]
    Count(#[from] CountError),
}

impl Error {
    /// Stable error code.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(e) => e.code(),
            Error::Count(e) => match e {
                CountError::InvalidParameter { .. } => 20,
                CountError::OutcomeOutOfRange { .. } => 30,
                CountError::InvalidProbability(_) => 31,
                CountError::InvalidLookupPrecision { .. } => 32,
                CountError::EmptyDistribution => 33,
            },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::Count(CountError::InvalidParameter { .. }) => ErrorCategory::Domain,
            Error::Count(_) => ErrorCategory::Query,
        }
    }

    /// Structured form for machine consumers.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "category": self.category(),
            "message": self.to_string(),
        })
    }
}
