//! Allocation result models for the Merit Engine.
//!
//! This module contains the [`Allocation`] type and its associated structures
//! that capture all outputs from a merit distribution run: per-employee
//! raises, pool totals, and audit traces.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The raise allocated to a single employee.
///
/// # Example
///
/// ```
/// use merit_engine::models::AllocationResult;
/// use rust_decimal::Decimal;
///
/// let result = AllocationResult {
///     name: "alice".to_string(),
///     current_salary: Decimal::from(50_000),
///     allocated_raise: Decimal::from(1_500),
///     final_salary: Decimal::from(51_500),
///     guaranteed_minimum: Decimal::from(1_000),
///     weight: Decimal::ONE,
///     position_factor: Decimal::new(75, 2),
///     current_perc_mrp: None,
///     final_perc_mrp: None,
///     perc_increase: Decimal::new(3, 2),
/// };
/// assert_eq!(result.current_salary + result.allocated_raise, result.final_salary);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// The employee's name.
    pub name: String,
    /// The salary before the raise.
    pub current_salary: Decimal,
    /// The raise allocated from the pool.
    pub allocated_raise: Decimal,
    /// `current_salary + allocated_raise`.
    pub final_salary: Decimal,
    /// The part of the raise guaranteed by the minimum increase policy.
    pub guaranteed_minimum: Decimal,
    /// The resolved performance weight.
    pub weight: Decimal,
    /// The pay band position factor used to value raises.
    pub position_factor: Decimal,
    /// The current salary as a fraction of MRP.
    pub current_perc_mrp: Option<Decimal>,
    /// The final salary as a fraction of MRP.
    pub final_perc_mrp: Option<Decimal>,
    /// The raise as a fraction of the current salary.
    pub perc_increase: Decimal,
}

/// A single step in the audit trace recording an allocation decision.
///
/// Each step captures the input, output, and reasoning for a stage of the
/// allocation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during allocation.
///
/// Warnings indicate conditions that don't prevent an allocation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for an allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of allocation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during allocation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a merit distribution run.
///
/// Results are kept in employee input order. The struct carries no
/// timestamps or generated identifiers, so two runs over identical inputs
/// serialise to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Per-employee results, in input order.
    pub results: Vec<AllocationResult>,
    /// The configured pool.
    pub pool: Decimal,
    /// The sum of all allocated raises.
    pub total_allocated: Decimal,
    /// `pool - total_allocated`.
    pub pool_remaining: Decimal,
    /// Complete audit trace of allocation decisions.
    pub audit_trace: AuditTrace,
}

impl Allocation {
    /// Returns the results keyed by employee name.
    pub fn by_name(&self) -> BTreeMap<&str, &AllocationResult> {
        self.results.iter().map(|r| (r.name.as_str(), r)).collect()
    }

    /// Looks up the result for a single employee.
    pub fn get(&self, name: &str) -> Option<&AllocationResult> {
        self.results.iter().find(|r| r.name == name)
    }
}
