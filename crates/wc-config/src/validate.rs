//! Configuration validation errors and semantic validation.

use thiserror::Error;

use wc_math::{MAX_LOOKUP_PRECISION, MAX_OUTCOMES, MAX_PRECISION};

use crate::count::CountConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing config: {0}")]
    MissingConfig(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::MissingConfig(_) => 62,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a count configuration semantically.
pub fn validate_config(config: &CountConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let dist = &config.distribution;
    validate_positive("distribution.rate", dist.rate)?;
    validate_positive("distribution.shape", dist.shape)?;
    validate_positive("distribution.time", dist.time)?;

    validate_dimension("distribution.precision", dist.precision, MAX_PRECISION)?;
    validate_dimension("distribution.outcomes", dist.outcomes, MAX_OUTCOMES)?;

    let lp = config.lookup.lookup_precision;
    if !(1..=MAX_LOOKUP_PRECISION).contains(&lp) {
        return Err(ValidationError::InvalidValue {
            field: "lookup.lookup_precision".to_string(),
            message: format!("Must be in [1, {}], got {}", MAX_LOOKUP_PRECISION, lp),
        });
    }

    Ok(())
}

fn validate_dimension(field: &str, value: usize, max: usize) -> ValidationResult<()> {
    if !(1..=max).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [1, {}], got {}", max, value),
        });
    }
    Ok(())
}

fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be finite and > 0, got {}", value),
        });
    }
    Ok(())
}
