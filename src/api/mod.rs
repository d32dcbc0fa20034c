//! HTTP API module for the Merit Engine.
//!
//! This module provides the REST endpoint for allocating a merit pool over a
//! posted list of employees.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::AllocationRequest;
pub use response::{AllocationResponse, ApiError};
pub use state::AppState;
