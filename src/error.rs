//! Error types for the Merit Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while allocating a merit pool.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classification of an [`EngineError`].
///
/// Configuration and validation errors are fixed by editing the inputs;
/// infeasible allocations are fixed by raising the pool or lowering the
/// minimum increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The options or lookup tables are wrong or incomplete.
    Configuration,
    /// An employee record is inconsistent.
    Validation,
    /// The guaranteed minimum raises cannot fit in the pool.
    Infeasible,
}

/// The main error type for the Merit Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use merit_engine::error::{EngineError, ErrorCategory};
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// assert_eq!(error.category(), ErrorCategory::Configuration);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An employee's rating has no entry in the performance translation table.
    #[error("Rating '{rating}' of employee '{employee}' has no entry in perf_translate")]
    RatingNotFound {
        /// The employee carrying the unknown rating.
        employee: String,
        /// The rating that was not found.
        rating: String,
    },

    /// An allocation option was out of range.
    #[error("Invalid option '{option}': {message}")]
    InvalidOption {
        /// The option that was invalid.
        option: String,
        /// A description of what made the option invalid.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee '{name}' field '{field}': {message}")]
    InvalidEmployee {
        /// The name of the employee.
        name: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The guaranteed minimum raises alone exceed the pool.
    #[error("Pool of {pool} is too small to meet minimum raises totalling {required}")]
    InfeasibleAllocation {
        /// The configured pool.
        pool: Decimal,
        /// The sum of the guaranteed minimum raises.
        required: Decimal,
    },
}

impl EngineError {
    /// Returns the broad category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::RatingNotFound { .. }
            | EngineError::InvalidOption { .. } => ErrorCategory::Configuration,
            EngineError::InvalidEmployee { .. } => ErrorCategory::Validation,
            EngineError::InfeasibleAllocation { .. } => ErrorCategory::Infeasible,
        }
    }

    pub(crate) fn invalid_option(option: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidOption {
            option: option.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_employee(name: &str, field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidEmployee {
            name: name.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
