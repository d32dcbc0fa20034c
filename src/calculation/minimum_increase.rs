//! Minimum increase enforcement.
//!
//! After the solver has spent the pool, every eligible employee is lifted to
//! their guaranteed minimum raise. Eligibility follows the employee's weight:
//! employees with a positive weight always qualify, zero-weight employees only
//! when `bad_performer_gets_min` is set.
//!
//! Lifting raises can push the total above the pool. That is expected here and
//! reconciled by the normalizer; only floors that cannot fit in the pool on
//! their own are an error.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::config::AllocationOptions;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, EmployeeRecord};

use super::candidates::CURRENCY_DECIMAL_PLACES;
use super::normalizer::checked_total;
use super::profile::EmployeeProfile;

/// Raises after the minimum increase policy has been applied.
#[derive(Debug, Clone)]
pub struct MinimumEnforcement {
    /// `max(solver raise, floor)` per employee, in input order.
    pub raises: Vec<Decimal>,
    /// The guaranteed floor per employee; zero when not eligible.
    pub floors: Vec<Decimal>,
    /// Sum of all floors.
    pub total_floor: Decimal,
    /// Number of employees whose raise was lifted to their floor.
    pub raised_count: usize,
    /// The audit step recording the enforcement.
    pub audit_step: AuditStep,
}

/// Returns the guaranteed minimum raise for one employee.
///
/// The fraction is the employee's own `min_perc_increase` when set, otherwise
/// the pool-wide `min_salary_increase`. The floor is rounded up to whole
/// cents. With `respect_band_top` it is capped at the room left below the
/// band top.
///
/// # Errors
///
/// Returns `InvalidEmployee` when the floor overflows.
///
/// # Example
///
/// ```
/// use merit_engine::calculation::guaranteed_minimum;
/// use merit_engine::config::AllocationOptions;
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
/// let options = AllocationOptions {
///     min_salary_increase: Decimal::new(2, 2),
///     ..AllocationOptions::default()
/// };
///
/// let floor = guaranteed_minimum(&employee, Decimal::ONE, &options).unwrap();
/// assert_eq!(floor, Decimal::from(1_000));
///
/// let floor = guaranteed_minimum(&employee, Decimal::ZERO, &options).unwrap();
/// assert_eq!(floor, Decimal::ZERO);
/// ```
pub fn guaranteed_minimum(
    employee: &EmployeeRecord,
    weight: Decimal,
    options: &AllocationOptions,
) -> EngineResult<Decimal> {
    let eligible = weight > Decimal::ZERO || options.bad_performer_gets_min;
    if !eligible {
        return Ok(Decimal::ZERO);
    }

    let fraction = employee
        .min_perc_increase
        .unwrap_or(options.min_salary_increase);
    let floor = employee
        .cur_salary
        .checked_mul(fraction)
        .ok_or_else(|| {
            EngineError::invalid_employee(
                &employee.name,
                "min_perc_increase",
                format!("minimum of {} on {} overflows", fraction, employee.cur_salary),
            )
        })?
        .round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::AwayFromZero);

    if options.respect_band_top {
        Ok(floor.min(employee.room_to_band_top()))
    } else {
        Ok(floor)
    }
}

/// Lifts every eligible employee's raise to their guaranteed minimum.
///
/// `solver_raises` holds the currency raise chosen by the solver for each
/// profile, in the same order.
///
/// # Errors
///
/// Returns `InfeasibleAllocation` when the floors alone exceed the pool.
pub fn enforce_minimums(
    profiles: &[EmployeeProfile<'_>],
    solver_raises: &[Decimal],
    options: &AllocationOptions,
    step_number: u32,
) -> EngineResult<MinimumEnforcement> {
    let floors: Vec<Decimal> = profiles
        .iter()
        .map(|p| guaranteed_minimum(p.employee, p.weight, options))
        .collect::<EngineResult<_>>()?;
    let total_floor = checked_total(&floors, "minimum raises")?;

    if total_floor > options.pool {
        debug!(
            pool = %options.pool,
            required = %total_floor,
            "Minimum raises exceed the pool"
        );
        return Err(EngineError::InfeasibleAllocation {
            pool: options.pool,
            required: total_floor,
        });
    }

    let raises: Vec<Decimal> = solver_raises
        .iter()
        .zip(&floors)
        .map(|(&raise, &floor)| raise.max(floor))
        .collect();

    let lifted: Vec<&str> = profiles
        .iter()
        .zip(solver_raises.iter().zip(&floors))
        .filter(|(_, (raise, floor))| floor > raise)
        .map(|(p, _)| p.employee.name.as_str())
        .collect();
    let raised_count = lifted.len();

    let total = checked_total(&raises, "raises after minimums")?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "minimum_increase".to_string(),
        rule_name: "Minimum Increase Enforcement".to_string(),
        input: serde_json::json!({
            "min_salary_increase": options.min_salary_increase.normalize().to_string(),
            "bad_performer_gets_min": options.bad_performer_gets_min,
            "respect_band_top": options.respect_band_top
        }),
        output: serde_json::json!({
            "total_floor": total_floor.normalize().to_string(),
            "raised": lifted,
            "total_after_floors": total.normalize().to_string()
        }),
        reasoning: if raised_count == 0 {
            "Every solver raise already met its guaranteed minimum".to_string()
        } else {
            format!(
                "Lifted {} employee(s) to their guaranteed minimum; floors total {}",
                raised_count,
                total_floor.normalize()
            )
        },
    };

    Ok(MinimumEnforcement {
        raises,
        floors,
        total_floor,
        raised_count,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(name: &str, cur_salary: &str) -> EmployeeRecord {
        EmployeeRecord {
            name: name.to_string(),
            cur_salary: dec(cur_salary),
            mrp: dec("60000"),
            mrp_bottom_range: dec("50000"),
            mrp_top_range: dec("70000"),
            rating: Rating::from(3),
            min_perc_increase: None,
        }
    }

    fn profile<'a>(employee: &'a EmployeeRecord, index: usize, weight: &str) -> EmployeeProfile<'a> {
        EmployeeProfile {
            index,
            employee,
            weight: dec(weight),
            position_factor: dec("0.5"),
            above_band: employee.is_above_band(),
        }
    }

    fn options(pool: &str, min: &str) -> AllocationOptions {
        AllocationOptions {
            pool: dec(pool),
            min_salary_increase: dec(min),
            ..AllocationOptions::default()
        }
    }

    #[test]
    fn test_floor_lifts_low_raise() {
        let alice = create_test_employee("alice", "60000");
        let profiles = vec![profile(&alice, 0, "1")];
        let result =
            enforce_minimums(&profiles, &[dec("500")], &options("5000", "0.02"), 1).unwrap();

        assert_eq!(result.floors, vec![dec("1200")]);
        assert_eq!(result.raises, vec![dec("1200")]);
        assert_eq!(result.raised_count, 1);
    }

    #[test]
    fn test_raise_above_floor_is_kept() {
        let alice = create_test_employee("alice", "60000");
        let profiles = vec![profile(&alice, 0, "1")];
        let result =
            enforce_minimums(&profiles, &[dec("2000")], &options("5000", "0.02"), 1).unwrap();

        assert_eq!(result.raises, vec![dec("2000")]);
        assert_eq!(result.raised_count, 0);
    }

    #[test]
    fn test_zero_weight_gets_no_floor_by_default() {
        let bob = create_test_employee("bob", "60000");
        let profiles = vec![profile(&bob, 0, "0")];
        let result =
            enforce_minimums(&profiles, &[Decimal::ZERO], &options("5000", "0.02"), 1).unwrap();

        assert_eq!(result.floors, vec![Decimal::ZERO]);
        assert_eq!(result.raises, vec![Decimal::ZERO]);
    }

    #[test]
    fn test_bad_performer_gets_min_when_enabled() {
        let bob = create_test_employee("bob", "60000");
        let profiles = vec![profile(&bob, 0, "0")];
        let mut opts = options("5000", "0.02");
        opts.bad_performer_gets_min = true;

        let result = enforce_minimums(&profiles, &[Decimal::ZERO], &opts, 1).unwrap();
        assert_eq!(result.raises, vec![dec("1200")]);
    }

    #[test]
    fn test_employee_override_replaces_pool_minimum() {
        let mut alice = create_test_employee("alice", "60000");
        alice.min_perc_increase = Some(dec("0.005"));
        let profiles = vec![profile(&alice, 0, "1")];

        let result =
            enforce_minimums(&profiles, &[Decimal::ZERO], &options("5000", "0.02"), 1).unwrap();
        assert_eq!(result.floors, vec![dec("300")]);
    }

    #[test]
    fn test_override_does_not_make_zero_weight_eligible() {
        let mut bob = create_test_employee("bob", "60000");
        bob.min_perc_increase = Some(dec("0.05"));
        let profiles = vec![profile(&bob, 0, "0")];

        let result =
            enforce_minimums(&profiles, &[Decimal::ZERO], &options("5000", "0.02"), 1).unwrap();
        assert_eq!(result.floors, vec![Decimal::ZERO]);
    }

    #[test]
    fn test_band_top_caps_floor() {
        let carol = create_test_employee("carol", "69500");
        let profiles = vec![profile(&carol, 0, "1")];
        let mut opts = options("5000", "0.02");
        opts.respect_band_top = true;

        let result = enforce_minimums(&profiles, &[Decimal::ZERO], &opts, 1).unwrap();
        assert_eq!(result.floors, vec![dec("500")]);
    }

    #[test]
    fn test_floors_exceeding_pool_are_infeasible() {
        // 2% of 60000 three times is 3600, more than the 3000 pool
        let employees: Vec<EmployeeRecord> = ["a", "b", "c"]
            .iter()
            .map(|n| create_test_employee(n, "60000"))
            .collect();
        let profiles: Vec<EmployeeProfile> = employees
            .iter()
            .enumerate()
            .map(|(i, e)| profile(e, i, "1"))
            .collect();

        let result = enforce_minimums(
            &profiles,
            &[Decimal::ZERO; 3],
            &options("3000", "0.02"),
            1,
        );
        match result {
            Err(EngineError::InfeasibleAllocation { pool, required }) => {
                assert_eq!(pool, dec("3000"));
                assert_eq!(required, dec("3600"));
            }
            other => panic!("Expected InfeasibleAllocation, got {:?}", other),
        }
    }

    #[test]
    fn test_floors_equal_to_pool_are_feasible() {
        let alice = create_test_employee("alice", "60000");
        let profiles = vec![profile(&alice, 0, "1")];
        let result = enforce_minimums(&profiles, &[Decimal::ZERO], &options("1200", "0.02"), 1);
        assert!(result.is_ok());
    }

    #[test]
    fn test_audit_step_lists_lifted_employees() {
        let alice = create_test_employee("alice", "60000");
        let bob = create_test_employee("bob", "60000");
        let profiles = vec![profile(&alice, 0, "1"), profile(&bob, 1, "1")];
        let result = enforce_minimums(
            &profiles,
            &[dec("3000"), dec("100")],
            &options("5000", "0.02"),
            6,
        )
        .unwrap();

        assert_eq!(result.audit_step.step_number, 6);
        assert_eq!(result.audit_step.rule_id, "minimum_increase");
        assert_eq!(result.audit_step.output["raised"], serde_json::json!(["bob"]));
    }

    #[test]
    fn test_floor_rounds_up_to_whole_cents() {
        // 1.5% of 51234.57 is 768.51855
        let alice = create_test_employee("alice", "51234.57");
        let floor = guaranteed_minimum(&alice, Decimal::ONE, &options("5000", "0.015")).unwrap();
        assert_eq!(floor, dec("768.52"));
    }

    #[test]
    fn test_overflowing_floor_is_rejected() {
        let mut alice = create_test_employee("alice", "60000000000000000000");
        alice.mrp_top_range = dec("70000000000000000000");
        alice.min_perc_increase = Some(dec("10000000000"));

        let result = guaranteed_minimum(&alice, Decimal::ONE, &options("5000", "0.01"));
        match result {
            Err(EngineError::InvalidEmployee { name, field, .. }) => {
                assert_eq!(name, "alice");
                assert_eq!(field, "min_perc_increase");
            }
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }
}
