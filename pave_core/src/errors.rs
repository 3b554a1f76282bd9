//! # Error Types
//!
//! Structured error types for pave_core. Errors serialize to JSON with a
//! `type` tag so a presentation layer can map them to user-facing messages
//! without string matching.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::errors::{CalcError, CalcResult, ValidationReason};
//!
//! fn require_area(area_sq_ft: Option<f64>) -> CalcResult<f64> {
//!     match area_sq_ft {
//!         Some(a) if a > 0.0 => Ok(a),
//!         _ => Err(CalcError::validation(
//!             "area_sq_ft",
//!             ValidationReason::MissingOrNonpositiveArea,
//!         )),
//!     }
//! }
//!
//! assert!(require_area(Some(0.0)).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pave_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Machine-readable reason attached to a [`CalcError::Validation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    /// Area is missing, non-numeric, or not greater than zero
    MissingOrNonpositiveArea,
    /// Water percentage must be in `[0, 100)`
    WaterPercentOutOfRange,
}

impl ValidationReason {
    /// Stable string form, identical to the serialized value
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::MissingOrNonpositiveArea => "missing_or_nonpositive_area",
            ValidationReason::WaterPercentOutOfRange => "water_percent_out_of_range",
        }
    }
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error type for estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Estimate input rejected before any arithmetic ran
    #[error("Validation failed for '{field}': {reason}")]
    Validation {
        field: String,
        reason: ValidationReason,
    },

    /// An input or configuration value is invalid (out of range, negative, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create a Validation error
    pub fn validation(field: impl Into<String>, reason: ValidationReason) -> Self {
        CalcError::Validation {
            field: field.into(),
            reason,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Validation failures are user-correctable; everything else is not.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, CalcError::Validation { .. } | CalcError::InvalidInput { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::Validation { .. } => "VALIDATION_ERROR",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}
