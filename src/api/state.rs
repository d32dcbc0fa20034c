//! Application state for the Merit Engine API.

use std::sync::Arc;

use crate::config::AllocationOptions;

/// Shared application state.
///
/// Holds the default allocation options used when a request does not carry
/// its own.
#[derive(Clone)]
pub struct AppState {
    default_options: Arc<AllocationOptions>,
}

impl AppState {
    /// Creates a new application state with the given default options.
    pub fn new(default_options: AllocationOptions) -> Self {
        Self {
            default_options: Arc::new(default_options),
        }
    }

    /// Returns a shared handle to the default allocation options.
    pub fn default_options(&self) -> Arc<AllocationOptions> {
        Arc::clone(&self.default_options)
    }
}
