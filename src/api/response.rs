//! Response types for the Merit Engine API.
//!
//! This module defines the success envelope and the error response
//! structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, ErrorCategory};
use crate::models::Allocation;

/// Successful response from the `/allocate` endpoint.
///
/// Wraps the deterministic [`Allocation`] with per-request metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the allocation.
    pub engine_version: String,
    /// How long the allocation took, in microseconds.
    pub duration_us: u64,
    /// The allocation itself.
    pub allocation: Allocation,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = match error.category() {
            ErrorCategory::Configuration | ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Infeasible => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let message = error.to_string();
        let error = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiError::new("CONFIG_ERROR", message)
            }
            EngineError::RatingNotFound { .. } => ApiError::with_details(
                "RATING_NOT_FOUND",
                message,
                "Add the rating to perf_translate or correct the employee's rating",
            ),
            EngineError::InvalidOption { .. } => ApiError::new("INVALID_OPTION", message),
            EngineError::InvalidEmployee { .. } => ApiError::with_details(
                "INVALID_EMPLOYEE",
                message,
                "The employee data contains invalid information",
            ),
            EngineError::InfeasibleAllocation { .. } => ApiError::with_details(
                "INFEASIBLE_ALLOCATION",
                message,
                "Raise the pool or lower the minimum salary increase",
            ),
        };
        ApiErrorResponse { status, error }
    }
}
