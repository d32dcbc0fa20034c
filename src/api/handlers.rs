//! HTTP request handlers for the Merit Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::calculation::allocate;

use super::request::AllocationRequest;
use super::response::{AllocationResponse, ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/allocate", post(allocate_handler))
        .with_state(state)
}

/// Handler for POST /allocate endpoint.
///
/// Accepts employees and optional options, and returns the allocation.
async fn allocate_handler(
    State(state): State<AppState>,
    payload: Result<Json<AllocationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let calculation_id = Uuid::new_v4();
    info!(calculation_id = %calculation_id, "Processing allocation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        calculation_id = %calculation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        calculation_id = %calculation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let options = request
        .options
        .map(Arc::new)
        .unwrap_or_else(|| state.default_options());
    let employees = request.employees;

    // the solver is CPU bound, keep it off the async workers
    let start_time = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || allocate(&employees, &options)).await;

    match outcome {
        Ok(Ok(allocation)) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            info!(
                calculation_id = %calculation_id,
                employees = allocation.results.len(),
                total_allocated = %allocation.total_allocated,
                duration_us,
                "Allocation completed successfully"
            );
            let response = AllocationResponse {
                calculation_id,
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                duration_us,
                allocation,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            warn!(
                calculation_id = %calculation_id,
                category = ?err.category(),
                error = %err,
                "Allocation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
        Err(join_error) => {
            error!(
                calculation_id = %calculation_id,
                error = %join_error,
                "Allocation task did not complete"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("INTERNAL_ERROR", "Allocation task did not complete")),
            )
                .into_response()
        }
    }
}
