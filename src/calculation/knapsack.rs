//! Multiple-choice knapsack solver.
//!
//! Picks exactly one candidate from every employee's ladder so that the total
//! cost fits in the budget and the total value is as large as possible.
//!
//! The solver runs an exact dynamic programme over budget units, working from
//! the last employee to the first. `best[i][b]` holds the best value employees
//! `i..` can reach by spending exactly `b` units. Exact spend (rather than
//! "at most") lets the solver see every spend level that reaches the optimum.
//!
//! Ties are broken deterministically:
//! 1. among spend levels reaching the optimal value, the smallest spend wins,
//!    so no budget is used for zero value;
//! 2. the allocation is then rebuilt in employee input order, each employee
//!    taking the largest candidate still consistent with the optimum, so value
//!    ties favour employees earlier in the input.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::AuditStep;

use super::candidates::CandidateLadder;

/// The solver's chosen allocation.
#[derive(Debug, Clone)]
pub struct KnapsackSolution {
    /// Chosen number of budget units per employee, in input order.
    pub choices: Vec<usize>,
    /// Total units spent.
    pub units_spent: usize,
    /// Total value of the chosen candidates.
    pub total_value: Decimal,
    /// The audit step recording the solve.
    pub audit_step: AuditStep,
}

/// Solves the multiple-choice knapsack over `budget_units`.
///
/// Runs in O(employees x budget_units x ladder length).
///
/// # Examples
///
/// ```
/// use merit_engine::calculation::{solve, Candidate, CandidateLadder};
/// use rust_decimal::Decimal;
///
/// let ladder = |rate: i64| CandidateLadder {
///     candidates: (0..=2usize)
///         .map(|k| Candidate {
///             units: k,
///             cost: Decimal::from(k * 100),
///             value: Decimal::from(rate) * Decimal::from(k * 100),
///         })
///         .collect(),
///     capped_at_band_top: false,
/// };
///
/// let solution = solve(&[ladder(1), ladder(3)], 2, 1);
/// assert_eq!(solution.choices, vec![0, 2]);
/// assert_eq!(solution.total_value, Decimal::from(600));
/// ```
pub fn solve(ladders: &[CandidateLadder], budget_units: usize, step_number: u32) -> KnapsackSolution {
    let n = ladders.len();

    // best[i][b]: best value of employees i.. spending exactly b units
    // choice[i][b]: units taken by employee i in that optimum
    let mut best: Vec<Vec<Option<Decimal>>> = vec![vec![None; budget_units + 1]; n + 1];
    let mut choice: Vec<Vec<usize>> = vec![vec![0; budget_units + 1]; n];
    best[n][0] = Some(Decimal::ZERO);

    for i in (0..n).rev() {
        let (head, tail) = best.split_at_mut(i + 1);
        let row = &mut head[i];
        let next = &tail[0];

        for b in 0..=budget_units {
            let mut cell: Option<Decimal> = None;
            for candidate in ladders[i].candidates.iter().take_while(|c| c.units <= b) {
                if let Some(rest) = next[b - candidate.units] {
                    let total = candidate.value + rest;
                    // >= keeps the largest candidate among equal totals
                    if cell.is_none_or(|current| total >= current) {
                        cell = Some(total);
                        choice[i][b] = candidate.units;
                    }
                }
            }
            row[b] = cell;
        }
    }

    let mut units_spent = 0;
    let mut total_value = Decimal::ZERO;
    for (b, cell) in best[0].iter().enumerate() {
        if let Some(value) = *cell {
            if value > total_value {
                total_value = value;
                units_spent = b;
            }
        }
    }

    let mut choices = Vec::with_capacity(n);
    let mut remaining = units_spent;
    for row in &choice {
        let units = row[remaining];
        choices.push(units);
        remaining -= units;
    }

    debug!(
        employees = n,
        budget_units,
        units_spent,
        total_value = %total_value,
        "Knapsack solved"
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "knapsack_solve".to_string(),
        rule_name: "Knapsack Allocation".to_string(),
        input: serde_json::json!({
            "employees": n,
            "budget_units": budget_units
        }),
        output: serde_json::json!({
            "choices": choices,
            "units_spent": units_spent,
            "residual_units": budget_units - units_spent,
            "total_value": total_value.normalize().to_string()
        }),
        reasoning: format!(
            "Spent {} of {} budget units for a total value of {}",
            units_spent,
            budget_units,
            total_value.normalize()
        ),
    };

    KnapsackSolution {
        choices,
        units_spent,
        total_value,
        audit_step,
    }
}
