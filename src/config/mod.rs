//! Configuration loading and management for the Merit Engine.
//!
//! This module provides functionality to load distribution options and
//! employee records from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use merit_engine::config::ConfigLoader;
//!
//! let options = ConfigLoader::load_options("./config/sample/distributor_options.yaml").unwrap();
//! println!("Pool: {}", options.pool);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AllocationOptions, MAX_DIVISIONS, PerfTranslate};
