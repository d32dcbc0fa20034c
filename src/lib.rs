//! Merit Engine for merit-raise pool distribution
//!
//! This crate allocates a fixed merit pool across employees, weighting each
//! employee by performance rating and pay band position, and choosing raises
//! with a discretised multiple-choice knapsack. Guaranteed minimum increases
//! are applied afterwards and reconciled with the pool.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
