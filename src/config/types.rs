//! Configuration types for merit allocation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeRecord, Rating};

/// Largest accepted `divisions`. The solver table grows with
/// `employees x divisions` and the solve time with `divisions^2`.
pub const MAX_DIVISIONS: u32 = 10_000;

/// Translation table from performance rating to weight.
///
/// Lookups never fall back to a default: a rating missing from the table is a
/// configuration error, since an unweighted employee would otherwise drop out
/// of the merit pool without any diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerfTranslate(BTreeMap<Rating, Decimal>);

impl PerfTranslate {
    /// Creates a table from `(rating, weight)` pairs.
    pub fn new<I, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (R, Decimal)>,
        R: Into<Rating>,
    {
        Self(entries.into_iter().map(|(r, w)| (r.into(), w)).collect())
    }

    /// Returns the weight for `rating`, if present.
    pub fn get(&self, rating: &Rating) -> Option<Decimal> {
        self.0.get(rating).copied()
    }

    /// Returns the number of ratings in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the table has no ratings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(rating, weight)` pairs in rating order.
    pub fn iter(&self) -> impl Iterator<Item = (&Rating, &Decimal)> {
        self.0.iter()
    }

    /// Checks that every weight is non-negative.
    pub fn validate_weights(&self) -> EngineResult<()> {
        match self.0.iter().find(|(_, w)| **w < Decimal::ZERO) {
            Some((rating, weight)) => Err(EngineError::invalid_option(
                "perf_translate",
                format!("weight for rating '{}' is negative: {}", rating, weight),
            )),
            None => Ok(()),
        }
    }

    /// Checks that every employee's rating has an entry in the table.
    ///
    /// Fails on the first employee, in input order, whose rating is missing.
    pub fn validate_coverage(&self, employees: &[EmployeeRecord]) -> EngineResult<()> {
        match employees.iter().find(|e| !self.0.contains_key(&e.rating)) {
            Some(employee) => Err(EngineError::RatingNotFound {
                employee: employee.name.clone(),
                rating: employee.rating.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for PerfTranslate {
    fn default() -> Self {
        Self::new([
            (1, Decimal::ZERO),
            (2, Decimal::ZERO),
            (3, Decimal::ONE),
            (4, Decimal::new(15, 1)),
            (5, Decimal::from(2)),
        ])
    }
}

/// Options controlling a merit distribution run.
///
/// Every field has a default, so an options file only needs to list the
/// values it overrides.
///
/// # Example
///
/// ```
/// use merit_engine::config::AllocationOptions;
/// use rust_decimal::Decimal;
///
/// let options: AllocationOptions = serde_yaml::from_str("pool: 25000\n").unwrap();
/// assert_eq!(options.pool, Decimal::from(25_000));
/// assert_eq!(options.divisions, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationOptions {
    /// The total merit pool available for raises.
    pub pool: Decimal,
    /// Number of budget units the pool is divided into.
    pub divisions: u32,
    /// Rating to weight translation table.
    pub perf_translate: PerfTranslate,
    /// Minimum raise as a fraction of current salary.
    pub min_salary_increase: Decimal,
    /// Whether zero-weight employees still receive the minimum raise.
    pub bad_performer_gets_min: bool,
    /// Largest discretionary raise as a fraction of current salary.
    pub max_salary_increase: Decimal,
    /// Whether raises are capped at the top of each employee's pay band.
    pub respect_band_top: bool,
}

impl Default for AllocationOptions {
    fn default() -> Self {
        Self {
            pool: Decimal::from(10_000),
            divisions: 100,
            perf_translate: PerfTranslate::default(),
            min_salary_increase: Decimal::ZERO,
            bad_performer_gets_min: false,
            max_salary_increase: Decimal::new(10, 2),
            respect_band_top: true,
        }
    }
}

impl AllocationOptions {
    /// Checks the options for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` when the pool, either increase bound or any
    /// weight is negative, or `divisions` is outside `1..=MAX_DIVISIONS`.
    pub fn validate(&self) -> EngineResult<()> {
        if self.pool < Decimal::ZERO {
            return Err(EngineError::invalid_option(
                "pool",
                format!("must not be negative, got {}", self.pool),
            ));
        }
        if self.divisions == 0 {
            return Err(EngineError::invalid_option("divisions", "must be at least 1"));
        }
        if self.divisions > MAX_DIVISIONS {
            return Err(EngineError::invalid_option(
                "divisions",
                format!("must not exceed {}, got {}", MAX_DIVISIONS, self.divisions),
            ));
        }
        if self.min_salary_increase < Decimal::ZERO {
            return Err(EngineError::invalid_option(
                "min_salary_increase",
                format!("must not be negative, got {}", self.min_salary_increase),
            ));
        }
        if self.max_salary_increase < Decimal::ZERO {
            return Err(EngineError::invalid_option(
                "max_salary_increase",
                format!("must not be negative, got {}", self.max_salary_increase),
            ));
        }
        self.perf_translate.validate_weights()
    }
}
