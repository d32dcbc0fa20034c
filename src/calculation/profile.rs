//! Per-employee derived values.
//!
//! An [`EmployeeProfile`] pairs an input record with the weight and position
//! factor computed for it. Profiles are independent of one another and are
//! the unit every later stage consumes by index.

use rust_decimal::Decimal;

use crate::config::PerfTranslate;
use crate::error::EngineResult;
use crate::models::{AuditStep, EmployeeRecord};

use super::range_position::calculate_position_factor;
use super::weight::resolve_weight;

/// An employee together with its resolved weight and band position.
#[derive(Debug, Clone)]
pub struct EmployeeProfile<'a> {
    /// Position of the employee in the input sequence.
    pub index: usize,
    /// The input record.
    pub employee: &'a EmployeeRecord,
    /// The resolved performance weight.
    pub weight: Decimal,
    /// The pay band position factor.
    pub position_factor: Decimal,
    /// Whether the salary is above the band top.
    pub above_band: bool,
}

impl EmployeeProfile<'_> {
    /// Value of one currency unit of raise for this employee.
    pub fn value_rate(&self) -> Decimal {
        self.weight * self.position_factor
    }
}

/// A profile and the audit steps that produced it.
#[derive(Debug, Clone)]
pub struct ProfileResult<'a> {
    /// The computed profile.
    pub profile: EmployeeProfile<'a>,
    /// Weight resolution followed by range position.
    pub audit_steps: Vec<AuditStep>,
}

/// Resolves the weight and position factor for one employee.
pub fn build_profile<'a>(
    index: usize,
    employee: &'a EmployeeRecord,
    perf_translate: &PerfTranslate,
    step_number: u32,
) -> EngineResult<ProfileResult<'a>> {
    let weight = resolve_weight(employee, perf_translate, step_number)?;
    let position = calculate_position_factor(employee, step_number + 1)?;

    Ok(ProfileResult {
        profile: EmployeeProfile {
            index,
            employee,
            weight: weight.weight,
            position_factor: position.position_factor,
            above_band: position.above_band,
        },
        audit_steps: vec![weight.audit_step, position.audit_step],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::Rating;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(rating: i32) -> EmployeeRecord {
        EmployeeRecord {
            name: "alice".to_string(),
            cur_salary: dec("60000"),
            mrp: dec("60000"),
            mrp_bottom_range: dec("50000"),
            mrp_top_range: dec("70000"),
            rating: Rating::from(rating),
            min_perc_increase: None,
        }
    }

    #[test]
    fn test_profile_combines_weight_and_position() {
        let employee = create_test_employee(5);
        let result = build_profile(2, &employee, &PerfTranslate::default(), 10).unwrap();

        assert_eq!(result.profile.index, 2);
        assert_eq!(result.profile.weight, dec("2"));
        assert_eq!(result.profile.position_factor, dec("0.55"));
        assert_eq!(result.profile.value_rate(), dec("1.1"));
        assert!(!result.profile.above_band);
    }

    #[test]
    fn test_audit_steps_are_numbered_in_order() {
        let employee = create_test_employee(3);
        let result = build_profile(0, &employee, &PerfTranslate::default(), 4).unwrap();

        assert_eq!(result.audit_steps.len(), 2);
        assert_eq!(result.audit_steps[0].rule_id, "weight_resolution");
        assert_eq!(result.audit_steps[0].step_number, 4);
        assert_eq!(result.audit_steps[1].rule_id, "range_position");
        assert_eq!(result.audit_steps[1].step_number, 5);
    }

    #[test]
    fn test_missing_rating_stops_profile() {
        let employee = create_test_employee(6);
        let result = build_profile(0, &employee, &PerfTranslate::default(), 1);
        assert!(matches!(result, Err(EngineError::RatingNotFound { .. })));
    }
}
