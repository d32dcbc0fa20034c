//! Performance weight resolution.
//!
//! This module translates an employee's performance rating into the weight
//! used to value their candidate raises.

use rust_decimal::Decimal;

use crate::config::PerfTranslate;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, EmployeeRecord};

/// The result of resolving an employee's weight, including the audit step.
#[derive(Debug, Clone)]
pub struct WeightResolution {
    /// The weight looked up for the employee's rating.
    pub weight: Decimal,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Resolves an employee's performance weight from the translation table.
///
/// # Arguments
///
/// * `employee` - The employee whose rating is looked up
/// * `perf_translate` - The rating to weight table
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `WeightResolution`, or `RatingNotFound` if the rating has no
/// entry in the table. There is no fallback weight.
///
/// # Examples
///
/// ```
/// use merit_engine::calculation::resolve_weight;
/// use merit_engine::config::PerfTranslate;
/// use merit_engine::models::EmployeeRecord;
/// use rust_decimal::Decimal;
///
/// let employee = EmployeeRecord {
///     name: "alice".to_string(),
///     cur_salary: Decimal::from(50_000),
///     mrp: Decimal::from(55_000),
///     mrp_bottom_range: Decimal::from(44_000),
///     mrp_top_range: Decimal::from(66_000),
///     rating: 4.into(),
///     min_perc_increase: None,
/// };
///
/// let result = resolve_weight(&employee, &PerfTranslate::default(), 1).unwrap();
/// assert_eq!(result.weight, Decimal::new(15, 1));
/// ```
pub fn resolve_weight(
    employee: &EmployeeRecord,
    perf_translate: &PerfTranslate,
    step_number: u32,
) -> EngineResult<WeightResolution> {
    let weight =
        perf_translate
            .get(&employee.rating)
            .ok_or_else(|| EngineError::RatingNotFound {
                employee: employee.name.clone(),
                rating: employee.rating.to_string(),
            })?;

    let reasoning = if weight.is_zero() {
        format!(
            "Rating '{}' translates to weight 0; '{}' earns no discretionary value",
            employee.rating, employee.name
        )
    } else {
        format!(
            "Rating '{}' translates to weight {}",
            employee.rating,
            weight.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "weight_resolution".to_string(),
        rule_name: "Performance Weight Resolution".to_string(),
        input: serde_json::json!({
            "employee": employee.name,
            "rating": employee.rating.as_str()
        }),
        output: serde_json::json!({
            "weight": weight.normalize().to_string()
        }),
        reasoning,
    };

    Ok(WeightResolution { weight, audit_step })
}
