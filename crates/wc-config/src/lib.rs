//! Weibull count configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the count model file (JSON or TOML)
//! - Config resolution (CLI → env → XDG → none)
//! - Semantic validation with stable error codes

pub mod count;
pub mod resolve;
pub mod validate;

pub use count::{CountConfig, DistributionSection, LookupSection, NegativeMassMode};
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
