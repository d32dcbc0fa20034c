//! Core data models for the Merit Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allocation_result;
mod employee;

pub use allocation_result::{Allocation, AllocationResult, AuditStep, AuditTrace, AuditWarning};
pub use employee::{EmployeeRecord, Rating};
