//! Pay band position calculation.
//!
//! An employee's position within their pay band scales the value of every
//! raise they could receive: employees low in the band have more room to grow
//! and are preferred recipients, all else being equal.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AuditStep, EmployeeRecord};

/// Smallest factor an employee inside (or below) their band can receive,
/// reached exactly at the top of the band.
pub const MIN_IN_BAND_FACTOR: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Factor given to employees paid above the top of their band.
///
/// Non-zero so they are not excluded outright, but lower than any in-band
/// factor.
pub const ABOVE_RANGE_FACTOR: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// The result of locating an employee within their pay band.
#[derive(Debug, Clone)]
pub struct RangePosition {
    /// `(cur_salary - bottom) / (top - bottom)` clamped to `[0, 1]`.
    pub band_ratio: Decimal,
    /// The factor applied to the value of the employee's raises.
    pub position_factor: Decimal,
    /// Whether the salary is above the top of the band.
    pub above_band: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the position factor for an employee.
///
/// The factor falls linearly from 1 at the bottom of the band to
/// [`MIN_IN_BAND_FACTOR`] at the top. Salaries below the bottom clamp to 1;
/// salaries above the top receive [`ABOVE_RANGE_FACTOR`].
///
/// # Errors
///
/// Returns `InvalidEmployee` if the band is degenerate (top <= bottom).
///
/// # Examples
///
/// ```
/// use merit_engine::calculation::calculate_position_factor;
/// use merit_engine::models::EmployeeRecord;
/// use rust_decimal::Decimal;
///
/// // Exactly mid-band
/// let employee = EmployeeRecord {
///     name: "alice".to_string(),
///     cur_salary: Decimal::from(55_000),
///     mrp: Decimal::from(55_000),
///     mrp_bottom_range: Decimal::from(44_000),
///     mrp_top_range: Decimal::from(66_000),
///     rating: 3.into(),
///     min_perc_increase: None,
/// };
///
/// let result = calculate_position_factor(&employee, 1).unwrap();
/// assert_eq!(result.position_factor, Decimal::new(55, 2));
/// ```
pub fn calculate_position_factor(
    employee: &EmployeeRecord,
    step_number: u32,
) -> EngineResult<RangePosition> {
    employee.validate_band()?;

    let span = employee.mrp_top_range - employee.mrp_bottom_range;
    let raw_ratio = (employee.cur_salary - employee.mrp_bottom_range) / span;
    let band_ratio = raw_ratio.clamp(Decimal::ZERO, Decimal::ONE);
    let above_band = employee.is_above_band();

    let position_factor = if above_band {
        ABOVE_RANGE_FACTOR
    } else {
        MIN_IN_BAND_FACTOR + (Decimal::ONE - MIN_IN_BAND_FACTOR) * (Decimal::ONE - band_ratio)
    };

    let reasoning = if above_band {
        format!(
            "Salary ${} is above band top ${}; factor fixed at {}",
            employee.cur_salary, employee.mrp_top_range, ABOVE_RANGE_FACTOR
        )
    } else {
        format!(
            "Salary ${} sits at {} of band [${}, ${}]; factor = {} + {} x (1 - {}) = {}",
            employee.cur_salary,
            band_ratio.normalize(),
            employee.mrp_bottom_range,
            employee.mrp_top_range,
            MIN_IN_BAND_FACTOR,
            Decimal::ONE - MIN_IN_BAND_FACTOR,
            band_ratio.normalize(),
            position_factor.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "range_position".to_string(),
        rule_name: "Pay Band Position".to_string(),
        input: serde_json::json!({
            "employee": employee.name,
            "cur_salary": employee.cur_salary.to_string(),
            "mrp_bottom_range": employee.mrp_bottom_range.to_string(),
            "mrp_top_range": employee.mrp_top_range.to_string()
        }),
        output: serde_json::json!({
            "band_ratio": band_ratio.normalize().to_string(),
            "position_factor": position_factor.normalize().to_string(),
            "above_band": above_band
        }),
        reasoning,
    };

    Ok(RangePosition {
        band_ratio,
        position_factor,
        above_band,
        audit_step,
    })
}
