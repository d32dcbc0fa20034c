//! Candidate raise generation.
//!
//! The pool is cut into `divisions` equal budget units. Every employee gets a
//! ladder of candidate raises, one per whole number of units from zero up to
//! a per-employee ceiling, which turns the allocation into a bounded multiple-choice
//! knapsack instead of a continuous problem.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::AllocationOptions;
use crate::error::{EngineError, EngineResult};

use super::profile::EmployeeProfile;

/// Number of decimal places money is tracked to when the pool is divided.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// The discretised pool.
///
/// `unit` is `pool / divisions` truncated to whole cents, so
/// `divisions * unit` never exceeds the pool.
///
/// # Example
///
/// ```
/// use merit_engine::calculation::BudgetGrid;
/// use rust_decimal::Decimal;
///
/// let grid = BudgetGrid::new(Decimal::from(1000), 3).unwrap();
/// assert_eq!(grid.unit, Decimal::new(33333, 2));
/// assert_eq!(grid.cost_of(3), Decimal::new(99999, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetGrid {
    /// The configured pool.
    pub pool: Decimal,
    /// The number of budget units.
    pub divisions: u32,
    /// The currency value of one budget unit.
    pub unit: Decimal,
}

impl BudgetGrid {
    /// Divides `pool` into `divisions` units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` if `divisions` is zero or the pool is negative.
    pub fn new(pool: Decimal, divisions: u32) -> EngineResult<Self> {
        if divisions == 0 {
            return Err(EngineError::invalid_option("divisions", "must be at least 1"));
        }
        if pool < Decimal::ZERO {
            return Err(EngineError::invalid_option(
                "pool",
                format!("must not be negative, got {}", pool),
            ));
        }
        let unit = (pool / Decimal::from(divisions))
            .round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::ToZero);
        Ok(Self {
            pool,
            divisions,
            unit,
        })
    }

    /// The number of units the solver may spend; zero when a unit is worth
    /// less than a cent.
    pub fn units(&self) -> usize {
        if self.unit.is_zero() {
            0
        } else {
            self.divisions as usize
        }
    }

    /// The currency cost of `units` budget units.
    pub fn cost_of(&self, units: usize) -> Decimal {
        self.unit * Decimal::from(units)
    }
}

/// A single candidate raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Number of budget units this raise costs.
    pub units: usize,
    /// The raise in currency.
    pub cost: Decimal,
    /// `weight * position_factor * cost`.
    pub value: Decimal,
}

/// The ordered candidate raises for one employee.
///
/// Candidates are contiguous: `candidates[k].units == k`, starting with the
/// zero raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLadder {
    /// Candidates in ascending cost order.
    pub candidates: Vec<Candidate>,
    /// Whether the top of the pay band cut the ladder below the salary ceiling.
    pub capped_at_band_top: bool,
}

impl CandidateLadder {
    /// The largest number of units any candidate costs.
    pub fn max_units(&self) -> usize {
        self.candidates.len().saturating_sub(1)
    }
}

/// Builds the candidate ladder for one employee.
///
/// Candidate `k` costs `k` budget units. The ladder stops at the employee's
/// ceiling: the largest whole number of units within `max_salary_increase` of
/// current salary, never more than the whole pool. With `respect_band_top` it
/// also stops at the room left below the top of the band. The zero candidate
/// is always present.
///
/// # Errors
///
/// Returns `InvalidOption` when the employee's weight is too large to value
/// the pool without overflowing.
pub fn generate_candidates(
    profile: &EmployeeProfile<'_>,
    grid: &BudgetGrid,
    options: &AllocationOptions,
) -> EngineResult<CandidateLadder> {
    let rate = profile.value_rate();
    // every candidate and every knapsack total is bounded by rate * pool
    if rate.checked_mul(grid.pool).is_none() {
        return Err(EngineError::invalid_option(
            "perf_translate",
            format!(
                "weight {} for '{}' is too large to value a pool of {}",
                profile.weight, profile.employee.name, grid.pool
            ),
        ));
    }

    let full = grid.units();
    let mut max_units = full;
    let mut capped_at_band_top = false;
    if !grid.unit.is_zero() {
        let ceiling = profile
            .employee
            .cur_salary
            .checked_mul(options.max_salary_increase);
        if let Some(ceiling) = ceiling {
            max_units = max_units.min(units_within(ceiling, grid.unit, full));
        }
        if options.respect_band_top {
            let room = units_within(profile.employee.room_to_band_top(), grid.unit, full);
            capped_at_band_top = room < max_units;
            max_units = max_units.min(room);
        }
    }

    let candidates = (0..=max_units)
        .map(|units| {
            let cost = grid.cost_of(units);
            Candidate {
                units,
                cost,
                value: rate * cost,
            }
        })
        .collect();

    Ok(CandidateLadder {
        candidates,
        capped_at_band_top,
    })
}

/// Whole units of `unit` that fit in `amount`, at most `limit`.
fn units_within(amount: Decimal, unit: Decimal, limit: usize) -> usize {
    (amount / unit)
        .floor()
        .to_usize()
        .map_or(limit, |units| units.min(limit))
}
