//! Calculation logic for the Merit Engine.
//!
//! This module contains every stage of a merit allocation: performance weight
//! resolution, pay band position, candidate raise generation, the knapsack
//! solver, minimum increase enforcement and pool normalization, plus the
//! [`allocate`] pipeline that runs them in order.

mod allocate;
mod candidates;
mod knapsack;
mod minimum_increase;
mod normalizer;
mod profile;
mod range_position;
mod weight;

pub use allocate::allocate;
pub use candidates::{
    BudgetGrid, CURRENCY_DECIMAL_PLACES, Candidate, CandidateLadder, generate_candidates,
};
pub use knapsack::{KnapsackSolution, solve};
pub use minimum_increase::{MinimumEnforcement, enforce_minimums, guaranteed_minimum};
pub use normalizer::{NormalizedAllocation, normalize_allocation};
pub use profile::{EmployeeProfile, ProfileResult, build_profile};
pub use range_position::{
    ABOVE_RANGE_FACTOR, MIN_IN_BAND_FACTOR, RangePosition, calculate_position_factor,
};
pub use weight::{WeightResolution, resolve_weight};
