//! Primitives error type

use thiserror::Error;

/// Failures raised while validating or converting values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitivesError {
    /// A form field is missing or malformed.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// An amount could not be converted between ether and wei.
    #[error("Unit conversion error: {0}")]
    UnitConversionError(String),
    /// A timestamp does not fit a calendar date.
    #[error("Timestamp out of range: {0}")]
    TimestampError(String),
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result alias over [`PrimitivesError`].
pub type Result<T> = core::result::Result<T, PrimitivesError>;
