//! Employee model and related types.
//!
//! This module defines the [`EmployeeRecord`] struct and the [`Rating`] key
//! used to look up an employee's performance weight.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A performance rating category.
///
/// Ratings are opaque keys. Configuration files may write them as integers
/// (`3`) or strings (`"exceeds"`); both forms normalise to the same key text,
/// so `3` and `"3"` are the same rating.
///
/// # Example
///
/// ```
/// use merit_engine::models::Rating;
///
/// let from_int: Rating = serde_json::from_str("3").unwrap();
/// let from_str: Rating = serde_json::from_str("\"3\"").unwrap();
/// assert_eq!(from_int, from_str);
/// assert_eq!(from_int.as_str(), "3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RatingRepr", into = "String")]
pub struct Rating(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingRepr {
    Number(i64),
    Text(String),
}

impl From<RatingRepr> for Rating {
    fn from(repr: RatingRepr) -> Self {
        match repr {
            RatingRepr::Number(n) => Rating(n.to_string()),
            RatingRepr::Text(s) => Rating(s),
        }
    }
}

impl From<Rating> for String {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl From<&str> for Rating {
    fn from(s: &str) -> Self {
        Rating(s.to_string())
    }
}

impl From<i32> for Rating {
    fn from(n: i32) -> Self {
        Rating(n.to_string())
    }
}

impl Rating {
    /// Returns the rating key as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An employee taking part in a merit distribution cycle.
///
/// Pay band values are absolute currency amounts. A company that does not use
/// a market reference point can set `mrp` to the middle of the pay band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub name: String,
    /// The employee's current salary.
    pub cur_salary: Decimal,
    /// The market reference point for the employee's job.
    pub mrp: Decimal,
    /// The bottom of the pay band.
    pub mrp_bottom_range: Decimal,
    /// The top of the pay band.
    pub mrp_top_range: Decimal,
    /// The employee's performance rating.
    pub rating: Rating,
    /// Optional per-employee minimum increase fraction, overriding the
    /// pool-wide `min_salary_increase`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_perc_increase: Option<Decimal>,
}

impl EmployeeRecord {
    /// Checks the record for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmployee` when the name is empty, the salary is not
    /// positive, the MRP is negative, the band is degenerate, the MRP lies
    /// outside the band, or the per-employee minimum is negative.
    ///
    /// # Example
    ///
    /// ```
    /// use merit_engine::models::EmployeeRecord;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = EmployeeRecord {
    ///     name: "alice".to_string(),
    ///     cur_salary: Decimal::from(50_000),
    ///     mrp: Decimal::from(55_000),
    ///     mrp_bottom_range: Decimal::from(44_000),
    ///     mrp_top_range: Decimal::from(66_000),
    ///     rating: 3.into(),
    ///     min_perc_increase: None,
    /// };
    /// assert!(employee.validate().is_ok());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::invalid_employee(
                &self.name,
                "name",
                "must not be empty",
            ));
        }
        if self.cur_salary <= Decimal::ZERO {
            return Err(EngineError::invalid_employee(
                &self.name,
                "cur_salary",
                format!("must be positive, got {}", self.cur_salary),
            ));
        }
        if self.mrp < Decimal::ZERO {
            return Err(EngineError::invalid_employee(
                &self.name,
                "mrp",
                format!("must not be negative, got {}", self.mrp),
            ));
        }
        self.validate_band()?;
        if self.mrp < self.mrp_bottom_range || self.mrp > self.mrp_top_range {
            return Err(EngineError::invalid_employee(
                &self.name,
                "mrp",
                format!(
                    "{} lies outside the pay band [{}, {}]",
                    self.mrp, self.mrp_bottom_range, self.mrp_top_range
                ),
            ));
        }
        if let Some(min) = self.min_perc_increase {
            if min < Decimal::ZERO {
                return Err(EngineError::invalid_employee(
                    &self.name,
                    "min_perc_increase",
                    format!("must not be negative, got {}", min),
                ));
            }
        }
        Ok(())
    }

    /// Fails when the pay band is empty or inverted.
    pub fn validate_band(&self) -> EngineResult<()> {
        if self.mrp_top_range <= self.mrp_bottom_range {
            return Err(EngineError::invalid_employee(
                &self.name,
                "mrp_top_range",
                format!(
                    "top of band {} must exceed bottom of band {}",
                    self.mrp_top_range, self.mrp_bottom_range
                ),
            ));
        }
        Ok(())
    }

    /// Returns true if the current salary is above the top of the pay band.
    pub fn is_above_band(&self) -> bool {
        self.cur_salary > self.mrp_top_range
    }

    /// Returns the room left between the current salary and the band top,
    /// never negative.
    pub fn room_to_band_top(&self) -> Decimal {
        (self.mrp_top_range - self.cur_salary).max(Decimal::ZERO)
    }

    /// Returns `salary` as a fraction of MRP, or `None` when MRP is zero.
    pub fn perc_of_mrp(&self, salary: Decimal) -> Option<Decimal> {
        if self.mrp.is_zero() {
            None
        } else {
            Some(salary / self.mrp)
        }
    }
}
