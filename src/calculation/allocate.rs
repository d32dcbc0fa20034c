//! The merit allocation pipeline.
//!
//! [`allocate`] validates its inputs, resolves each employee's weight and band
//! position, solves the knapsack over the discretised pool, then applies the
//! minimum increase policy and reconciles the result with the pool. Any error
//! aborts the whole run.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::AllocationOptions;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allocation, AllocationResult, AuditStep, AuditTrace, AuditWarning, EmployeeRecord,
};

use super::candidates::{BudgetGrid, CandidateLadder, generate_candidates};
use super::knapsack::solve;
use super::minimum_increase::enforce_minimums;
use super::normalizer::normalize_allocation;
use super::profile::{EmployeeProfile, build_profile};

/// Allocates the merit pool across `employees`.
///
/// Results come back in input order. Identical inputs always produce an
/// identical [`Allocation`].
///
/// # Errors
///
/// * `InvalidOption` or `RatingNotFound` for configuration mistakes
/// * `InvalidEmployee` for inconsistent or duplicate employee records
/// * `InfeasibleAllocation` when the guaranteed minimums exceed the pool
///
/// # Example
///
/// ```
/// use merit_engine::calculation::allocate;
/// use merit_engine::config::AllocationOptions;
/// use merit_engine::models::EmployeeRecord;
/// use rust_decimal::Decimal;
///
/// let employees = vec![EmployeeRecord {
///     name: "alice".to_string(),
///     cur_salary: Decimal::from(50_000),
///     mrp: Decimal::from(55_000),
///     mrp_bottom_range: Decimal::from(44_000),
///     mrp_top_range: Decimal::from(66_000),
///     rating: 3.into(),
///     min_perc_increase: None,
/// }];
/// let options = AllocationOptions {
///     pool: Decimal::from(1_000),
///     divisions: 10,
///     ..AllocationOptions::default()
/// };
///
/// let allocation = allocate(&employees, &options).unwrap();
/// assert_eq!(allocation.results[0].allocated_raise, Decimal::from(1_000));
/// assert_eq!(allocation.pool_remaining, Decimal::ZERO);
/// ```
pub fn allocate(
    employees: &[EmployeeRecord],
    options: &AllocationOptions,
) -> EngineResult<Allocation> {
    info!(
        employees = employees.len(),
        pool = %options.pool,
        divisions = options.divisions,
        "Starting merit allocation"
    );

    options.validate()?;
    validate_employees(employees)?;
    options.perf_translate.validate_coverage(employees)?;

    let grid = BudgetGrid::new(options.pool, options.divisions)?;

    let mut all_audit_steps: Vec<AuditStep> = Vec::new();
    let mut all_warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    // Weight and band position per employee
    let mut profiles: Vec<EmployeeProfile<'_>> = Vec::with_capacity(employees.len());
    for (index, employee) in employees.iter().enumerate() {
        let result = build_profile(index, employee, &options.perf_translate, step_number)?;
        step_number += result.audit_steps.len() as u32;
        all_audit_steps.extend(result.audit_steps);

        if result.profile.above_band {
            all_warnings.push(AuditWarning {
                code: "ABOVE_BAND".to_string(),
                message: format!(
                    "'{}' is paid {} above the band top of {}",
                    employee.name,
                    employee.cur_salary - employee.mrp_top_range,
                    employee.mrp_top_range
                ),
                severity: "medium".to_string(),
            });
        }
        profiles.push(result.profile);
    }

    // Candidate ladders
    let ladders: Vec<CandidateLadder> = profiles
        .iter()
        .map(|p| generate_candidates(p, &grid, options))
        .collect::<EngineResult<_>>()?;
    let capped: Vec<&str> = profiles
        .iter()
        .zip(&ladders)
        .filter(|(_, ladder)| ladder.capped_at_band_top)
        .map(|(p, _)| p.employee.name.as_str())
        .collect();
    debug!(unit = %grid.unit, capped = capped.len(), "Candidate ladders generated");

    all_audit_steps.push(AuditStep {
        step_number,
        rule_id: "candidate_generation".to_string(),
        rule_name: "Candidate Raise Generation".to_string(),
        input: serde_json::json!({
            "pool": options.pool.to_string(),
            "divisions": options.divisions,
            "max_salary_increase": options.max_salary_increase.normalize().to_string(),
            "respect_band_top": options.respect_band_top
        }),
        output: serde_json::json!({
            "unit": grid.unit.to_string(),
            "budget_units": grid.units(),
            "capped_at_band_top": capped
        }),
        reasoning: format!(
            "Pool {} divided into {} units of {}; ladders stop at {} of current salary",
            options.pool,
            options.divisions,
            grid.unit,
            options.max_salary_increase.normalize()
        ),
    });
    step_number += 1;

    // Knapsack over the discretised pool
    let solution = solve(&ladders, grid.units(), step_number);
    all_audit_steps.push(solution.audit_step);
    step_number += 1;

    let solver_raises: Vec<Decimal> = solution
        .choices
        .iter()
        .map(|&units| grid.cost_of(units))
        .collect();

    // Minimum increases
    let enforcement = enforce_minimums(&profiles, &solver_raises, options, step_number)?;
    all_audit_steps.push(enforcement.audit_step);
    step_number += 1;

    // Reconcile with the pool
    let normalized = normalize_allocation(
        &enforcement.raises,
        &enforcement.floors,
        options.pool,
        step_number,
    )?;
    all_audit_steps.push(normalized.audit_step);

    if normalized.scaled {
        all_warnings.push(AuditWarning {
            code: "RAISES_SCALED".to_string(),
            message: format!(
                "Minimum raises pushed the total {} over the pool; discretionary raises were scaled down",
                normalized.excess.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    let results: Vec<AllocationResult> = profiles
        .iter()
        .zip(normalized.raises.iter().zip(&enforcement.floors))
        .map(|(profile, (&raise, &floor))| build_result(profile, raise, floor))
        .collect::<EngineResult<_>>()?;

    let total_allocated: Decimal = results.iter().map(|r| r.allocated_raise).sum();
    let pool_remaining = options.pool - total_allocated;

    if pool_remaining > Decimal::ZERO && !employees.is_empty() {
        all_warnings.push(AuditWarning {
            code: "POOL_REMAINING".to_string(),
            message: format!("{} of the pool was left unallocated", pool_remaining),
            severity: "low".to_string(),
        });
    }

    info!(
        employees = results.len(),
        total_allocated = %total_allocated,
        pool_remaining = %pool_remaining,
        "Merit allocation completed"
    );

    Ok(Allocation {
        results,
        pool: options.pool,
        total_allocated,
        pool_remaining,
        audit_trace: AuditTrace {
            steps: all_audit_steps,
            warnings: all_warnings,
        },
    })
}

/// Validates every record and rejects duplicate names.
fn validate_employees(employees: &[EmployeeRecord]) -> EngineResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(employees.len());
    for employee in employees {
        employee.validate()?;
        if !seen.insert(employee.name.as_str()) {
            return Err(EngineError::invalid_employee(
                &employee.name,
                "name",
                "appears more than once",
            ));
        }
    }
    Ok(())
}

fn build_result(
    profile: &EmployeeProfile<'_>,
    raise: Decimal,
    floor: Decimal,
) -> EngineResult<AllocationResult> {
    let employee = profile.employee;
    let final_salary = employee.cur_salary.checked_add(raise).ok_or_else(|| {
        EngineError::invalid_employee(&employee.name, "cur_salary", "too large to raise")
    })?;
    Ok(AllocationResult {
        name: employee.name.clone(),
        current_salary: employee.cur_salary,
        allocated_raise: raise,
        final_salary,
        guaranteed_minimum: floor,
        weight: profile.weight,
        position_factor: profile.position_factor,
        current_perc_mrp: employee.perc_of_mrp(employee.cur_salary),
        final_perc_mrp: employee.perc_of_mrp(final_salary),
        perc_increase: raise / employee.cur_salary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PerfTranslate;
    use crate::error::ErrorCategory;
    use crate::models::Rating;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(name: &str, cur_salary: &str, rating: i32) -> EmployeeRecord {
        EmployeeRecord {
            name: name.to_string(),
            cur_salary: dec(cur_salary),
            mrp: dec("60000"),
            mrp_bottom_range: dec("50000"),
            mrp_top_range: dec("70000"),
            rating: Rating::from(rating),
            min_perc_increase: None,
        }
    }

    fn options(pool: &str, divisions: u32) -> AllocationOptions {
        AllocationOptions {
            pool: dec(pool),
            divisions,
            ..AllocationOptions::default()
        }
    }

    #[test]
    fn test_single_employee_consumes_pool() {
        let employees = vec![create_test_employee("alice", "60000", 3)];
        let allocation = allocate(&employees, &options("1000", 10)).unwrap();

        let alice = allocation.get("alice").unwrap();
        assert_eq!(alice.allocated_raise, dec("1000"));
        assert_eq!(alice.final_salary, dec("61000"));
        assert_eq!(alice.perc_increase, dec("1000") / dec("60000"));
        assert_eq!(allocation.total_allocated, dec("1000"));
        assert_eq!(allocation.pool_remaining, Decimal::ZERO);
    }

    #[test]
    fn test_zero_pool_gives_no_raises() {
        let employees = vec![
            create_test_employee("alice", "60000", 3),
            create_test_employee("bob", "55000", 5),
        ];
        let allocation = allocate(&employees, &options("0", 10)).unwrap();

        for result in &allocation.results {
            assert_eq!(result.allocated_raise, Decimal::ZERO);
            assert_eq!(result.final_salary, result.current_salary);
        }
        assert!(allocation.audit_trace.warnings.iter().all(|w| w.code != "POOL_REMAINING"));
    }

    #[test]
    fn test_higher_weight_gets_larger_raise() {
        let employees = vec![
            create_test_employee("alice", "60000", 5),
            create_test_employee("bob", "60000", 3),
        ];
        let allocation = allocate(&employees, &options("1000", 10)).unwrap();

        let alice = allocation.get("alice").unwrap();
        let bob = allocation.get("bob").unwrap();
        assert!(alice.allocated_raise > bob.allocated_raise);
    }

    #[test]
    fn test_zero_weight_employee_gets_nothing() {
        let employees = vec![
            create_test_employee("alice", "60000", 1),
            create_test_employee("bob", "60000", 3),
        ];
        let mut opts = options("1000", 10);
        opts.min_salary_increase = dec("0.01");
        let allocation = allocate(&employees, &opts).unwrap();

        assert_eq!(allocation.get("alice").unwrap().allocated_raise, Decimal::ZERO);
        assert_eq!(allocation.get("bob").unwrap().allocated_raise, dec("1000"));
    }

    #[test]
    fn test_bad_performer_gets_exact_minimum() {
        let employees = vec![
            create_test_employee("alice", "60000", 1),
            create_test_employee("bob", "60000", 3),
        ];
        let mut opts = options("2000", 10);
        opts.min_salary_increase = dec("0.01");
        opts.bad_performer_gets_min = true;
        let allocation = allocate(&employees, &opts).unwrap();

        let alice = allocation.get("alice").unwrap();
        assert_eq!(alice.allocated_raise, dec("600"));
        assert_eq!(alice.guaranteed_minimum, dec("600"));
        assert!(allocation.total_allocated <= allocation.pool);
    }

    #[test]
    fn test_scaled_run_emits_warning() {
        let employees = vec![
            create_test_employee("alice", "60000", 1),
            create_test_employee("bob", "60000", 3),
        ];
        let mut opts = options("2000", 10);
        opts.min_salary_increase = dec("0.01");
        opts.bad_performer_gets_min = true;
        let allocation = allocate(&employees, &opts).unwrap();

        // bob took the whole pool from the solver, alice's floor forces scaling
        assert_eq!(allocation.get("bob").unwrap().allocated_raise, dec("1400"));
        assert_eq!(allocation.total_allocated, dec("2000"));
        assert!(allocation.audit_trace.warnings.iter().any(|w| w.code == "RAISES_SCALED"));
    }

    #[test]
    fn test_infeasible_minimums_abort_run() {
        let employees = vec![
            create_test_employee("alice", "60000", 3),
            create_test_employee("bob", "60000", 4),
        ];
        let mut opts = options("1000", 10);
        opts.min_salary_increase = dec("0.02");

        let err = allocate(&employees, &opts).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Infeasible);
    }

    #[test]
    fn test_missing_rating_aborts_before_computation() {
        let employees = vec![create_test_employee("alice", "60000", 6)];
        let err = allocate(&employees, &options("1000", 10)).unwrap_err();

        assert!(matches!(err, EngineError::RatingNotFound { .. }));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_zero_divisions_is_configuration_error() {
        let employees = vec![create_test_employee("alice", "60000", 3)];
        let err = allocate(&employees, &options("1000", 0)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let employees = vec![
            create_test_employee("alice", "60000", 3),
            create_test_employee("alice", "55000", 4),
        ];
        let err = allocate(&employees, &options("1000", 10)).unwrap_err();

        match err {
            EngineError::InvalidEmployee { name, field, .. } => {
                assert_eq!(name, "alice");
                assert_eq!(field, "name");
            }
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_band_is_validation_error() {
        let mut employee = create_test_employee("alice", "60000", 3);
        employee.mrp_bottom_range = dec("70000");
        employee.mrp = dec("70000");
        let err = allocate(&[employee], &options("1000", 10)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_above_band_employee_is_flagged() {
        let employees = vec![create_test_employee("alice", "75000", 3)];
        let mut opts = options("1000", 10);
        opts.respect_band_top = false;
        let allocation = allocate(&employees, &opts).unwrap();

        assert!(allocation.audit_trace.warnings.iter().any(|w| w.code == "ABOVE_BAND"));
        // still a recipient, only at a reduced factor
        assert_eq!(allocation.get("alice").unwrap().allocated_raise, dec("1000"));
    }

    #[test]
    fn test_above_band_employee_gets_nothing_by_default() {
        let employees = vec![
            create_test_employee("alice", "75000", 3),
            create_test_employee("bob", "60000", 3),
        ];
        let allocation = allocate(&employees, &options("1000", 10)).unwrap();

        assert_eq!(allocation.get("alice").unwrap().allocated_raise, Decimal::ZERO);
        assert_eq!(allocation.get("bob").unwrap().allocated_raise, dec("1000"));
    }

    #[test]
    fn test_salary_ceiling_spreads_pool() {
        // 10% ceilings: alice 5200, bob 6000, carol 5000 of a 12000 pool
        let employees = vec![
            create_test_employee("alice", "52000", 5),
            create_test_employee("bob", "60000", 4),
            create_test_employee("carol", "50000", 3),
        ];
        let allocation = allocate(&employees, &options("12000", 120)).unwrap();

        assert_eq!(allocation.get("alice").unwrap().allocated_raise, dec("5200"));
        assert_eq!(allocation.get("bob").unwrap().allocated_raise, dec("1800"));
        assert_eq!(allocation.get("carol").unwrap().allocated_raise, dec("5000"));
        assert_eq!(allocation.total_allocated, dec("12000"));
    }

    #[test]
    fn test_weight_overflowing_pool_value_is_configuration_error() {
        let employees = vec![create_test_employee("alice", "60000", 3)];
        let mut opts = options("100000000000", 10);
        opts.perf_translate = PerfTranslate::new([(3, dec("100000000000000000000"))]);

        let err = allocate(&employees, &opts).unwrap_err();
        assert!(matches!(err, EngineError::InvalidOption { .. }));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_large_pool_with_bad_performer_minimum_fits() {
        let employees = vec![
            create_test_employee("alice", "60000", 1),
            create_test_employee("bob", "60000", 3),
        ];
        let mut opts = options("1000000000000000", 10);
        opts.min_salary_increase = dec("0.01");
        opts.bad_performer_gets_min = true;
        opts.respect_band_top = false;
        opts.max_salary_increase = dec("1000000000000");

        let allocation = allocate(&employees, &opts).unwrap();
        assert_eq!(allocation.get("alice").unwrap().allocated_raise, dec("600"));
        assert_eq!(allocation.total_allocated, opts.pool);
        assert!(allocation.audit_trace.warnings.iter().any(|w| w.code == "RAISES_SCALED"));
    }

    #[test]
    fn test_band_top_respected() {
        let employees = vec![
            create_test_employee("alice", "69750", 3),
            create_test_employee("bob", "75000", 3),
        ];
        let mut opts = options("1000", 10);
        opts.respect_band_top = true;
        let allocation = allocate(&employees, &opts).unwrap();

        assert_eq!(allocation.get("alice").unwrap().allocated_raise, dec("200"));
        assert_eq!(allocation.get("bob").unwrap().allocated_raise, Decimal::ZERO);
        assert_eq!(allocation.pool_remaining, dec("800"));
        assert!(allocation.audit_trace.warnings.iter().any(|w| w.code == "POOL_REMAINING"));
    }

    #[test]
    fn test_text_ratings_allocate() {
        let mut alice = create_test_employee("alice", "60000", 0);
        alice.rating = Rating::from("exceeds");
        let mut opts = options("500", 5);
        opts.perf_translate = PerfTranslate::new([("exceeds", dec("2"))]);

        let allocation = allocate(&[alice], &opts).unwrap();
        assert_eq!(allocation.results[0].allocated_raise, dec("500"));
    }

    #[test]
    fn test_perc_mrp_reporting() {
        let employees = vec![create_test_employee("alice", "60000", 3)];
        let allocation = allocate(&employees, &options("600", 10)).unwrap();

        let alice = allocation.get("alice").unwrap();
        assert_eq!(alice.current_perc_mrp, Some(Decimal::ONE));
        assert_eq!(alice.final_perc_mrp, Some(dec("1.01")));
    }

    #[test]
    fn test_audit_steps_are_sequential() {
        let employees = vec![
            create_test_employee("alice", "60000", 3),
            create_test_employee("bob", "52000", 4),
        ];
        let allocation = allocate(&employees, &options("1000", 10)).unwrap();

        let steps = &allocation.audit_trace.steps;
        // two per employee, then candidates, knapsack, minimums, normalization
        assert_eq!(steps.len(), 8);
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        assert_eq!(steps[7].rule_id, "normalization");
    }

    #[test]
    fn test_empty_employee_list() {
        let allocation = allocate(&[], &options("1000", 10)).unwrap();
        assert!(allocation.results.is_empty());
        assert_eq!(allocation.pool_remaining, dec("1000"));
    }
}
