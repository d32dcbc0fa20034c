//! Request types for the Merit Engine API.
//!
//! This module defines the JSON request structure for the `/allocate` endpoint.

use serde::{Deserialize, Serialize};

use crate::config::AllocationOptions;
use crate::models::EmployeeRecord;

/// Request body for the `/allocate` endpoint.
///
/// `options` may be omitted, in which case the server's default options are
/// used. When present, any field it leaves out takes its built-in default.
///
/// # Example
///
/// ```
/// use merit_engine::api::AllocationRequest;
///
/// let json = r#"{
///     "employees": [{
///         "name": "alice",
///         "cur_salary": "50000",
///         "mrp": "55000",
///         "mrp_bottom_range": "44000",
///         "mrp_top_range": "66000",
///         "rating": 3
///     }],
///     "options": { "pool": "1000", "divisions": 10 }
/// }"#;
///
/// let request: AllocationRequest = serde_json::from_str(json).unwrap();
/// assert_eq!(request.employees.len(), 1);
/// assert_eq!(request.options.unwrap().divisions, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// The employees taking part in the distribution.
    pub employees: Vec<EmployeeRecord>,
    /// Options for this run, overriding the server defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<AllocationOptions>,
}
