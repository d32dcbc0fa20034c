//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading distribution
//! options and employee records from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::EmployeeRecord;

use super::types::AllocationOptions;

/// Loads distribution options and employee records.
///
/// # File Layout
///
/// ```text
/// config/sample/
/// ├── distributor_options.yaml  # Pool, divisions, rating weights, minimums
/// └── employees.yaml            # A YAML list of employee records
/// ```
///
/// Every key in the options file is optional; missing keys keep their
/// defaults.
///
/// # Example
///
/// ```no_run
/// use merit_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load(
///     "./config/sample/distributor_options.yaml",
///     "./config/sample/employees.yaml",
/// )?;
/// println!("Pool: {}", loader.options().pool);
/// # Ok::<(), merit_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    options: AllocationOptions,
    employees: Vec<EmployeeRecord>,
}

impl ConfigLoader {
    /// Loads both the options file and the employees file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Either file is missing
    /// - Either file contains invalid YAML
    /// - An employee record is missing a required field
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        options_path: P,
        employees_path: Q,
    ) -> EngineResult<Self> {
        let options = Self::load_options(options_path)?;
        let employees = Self::load_employees(employees_path)?;
        Ok(Self { options, employees })
    }

    /// Loads an options file, merging its keys over the defaults.
    pub fn load_options<P: AsRef<Path>>(path: P) -> EngineResult<AllocationOptions> {
        let path = path.as_ref();
        // An empty file deserialises to unit rather than a mapping
        let options = match Self::read(path)?.trim() {
            "" => AllocationOptions::default(),
            content => Self::parse_yaml(path, content)?,
        };
        debug!(
            path = %path.display(),
            pool = %options.pool,
            divisions = options.divisions,
            "Loaded distribution options"
        );
        Ok(options)
    }

    /// Loads an employees file.
    pub fn load_employees<P: AsRef<Path>>(path: P) -> EngineResult<Vec<EmployeeRecord>> {
        let path = path.as_ref();
        let content = Self::read(path)?;
        let employees: Vec<EmployeeRecord> = Self::parse_yaml(path, &content)?;
        debug!(
            path = %path.display(),
            count = employees.len(),
            "Loaded employee records"
        );
        Ok(employees)
    }

    fn read(path: &Path) -> EngineResult<String> {
        fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path.display().to_string(),
        })
    }

    /// Parses YAML content read from `path`.
    fn parse_yaml<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the loaded options.
    pub fn options(&self) -> &AllocationOptions {
        &self.options
    }

    /// Returns the loaded employee records.
    pub fn employees(&self) -> &[EmployeeRecord] {
        &self.employees
    }

    /// Consumes the loader, returning its parts.
    pub fn into_parts(self) -> (Vec<EmployeeRecord>, AllocationOptions) {
        (self.employees, self.options)
    }
}
