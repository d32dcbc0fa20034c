//! Allocation normalization.
//!
//! When guaranteed minimums push the total above the pool, the discretionary
//! part of each raise (the amount above the employee's floor) is scaled down
//! proportionally until the total fits. Floors themselves are never touched.
//!
//! Scaled amounts are truncated to whole cents. The cents lost to truncation
//! are handed back one at a time by largest remainder, ties going to the
//! employee earlier in the input, so the result is deterministic.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::candidates::CURRENCY_DECIMAL_PLACES;

/// Raises after reconciliation with the pool.
#[derive(Debug, Clone)]
pub struct NormalizedAllocation {
    /// Final raise per employee, in input order.
    pub raises: Vec<Decimal>,
    /// Whether discretionary raises had to be scaled down.
    pub scaled: bool,
    /// How far the pre-normalization total exceeded the pool.
    pub excess: Decimal,
    /// The audit step recording the normalization.
    pub audit_step: AuditStep,
}

/// Reconciles `raises` with `pool` without reducing any raise below its floor.
///
/// `raises` and `floors` are parallel slices in employee input order, with
/// every raise at least its floor.
///
/// # Errors
///
/// Returns `InfeasibleAllocation` if the floors alone exceed the pool.
///
/// # Example
///
/// ```
/// use merit_engine::calculation::normalize_allocation;
/// use rust_decimal::Decimal;
///
/// let raises = [Decimal::from(1_200), Decimal::from(3_000)];
/// let floors = [Decimal::from(1_200), Decimal::from(1_000)];
///
/// let result = normalize_allocation(&raises, &floors, Decimal::from(3_000), 1).unwrap();
/// assert!(result.scaled);
/// assert_eq!(result.raises, vec![Decimal::from(1_200), Decimal::from(1_800)]);
/// ```
pub fn normalize_allocation(
    raises: &[Decimal],
    floors: &[Decimal],
    pool: Decimal,
    step_number: u32,
) -> EngineResult<NormalizedAllocation> {
    let total = checked_total(raises, "raises")?;
    let total_floor = checked_total(floors, "minimum raises")?;

    if total_floor > pool {
        return Err(EngineError::InfeasibleAllocation {
            pool,
            required: total_floor,
        });
    }

    if total <= pool {
        return Ok(NormalizedAllocation {
            raises: raises.to_vec(),
            scaled: false,
            excess: Decimal::ZERO,
            audit_step: AuditStep {
                step_number,
                rule_id: "normalization".to_string(),
                rule_name: "Allocation Normalization".to_string(),
                input: serde_json::json!({
                    "pool": pool.to_string(),
                    "total": total.normalize().to_string()
                }),
                output: serde_json::json!({
                    "scaled": false
                }),
                reasoning: format!(
                    "Total raises {} fit within pool {}; no scaling needed",
                    total.normalize(),
                    pool
                ),
            },
        });
    }

    let excess = total - pool;
    let available = pool - total_floor;
    let discretionary: Vec<Decimal> = raises.iter().zip(floors).map(|(r, f)| *r - *f).collect();
    let total_discretionary: Decimal = discretionary.iter().sum();

    let cent = Decimal::new(1, CURRENCY_DECIMAL_PLACES);
    // below one, since the total exceeds the pool
    let ratio = available / total_discretionary;
    let mut scaled_parts = Vec::with_capacity(discretionary.len());
    let mut remainders = Vec::with_capacity(discretionary.len());
    for disc in &discretionary {
        let exact = match disc.checked_mul(available) {
            Some(product) => product / total_discretionary,
            None => *disc * ratio,
        };
        let truncated =
            exact.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::ToZero);
        scaled_parts.push(truncated);
        remainders.push(exact - truncated);
    }

    let handed_out: Decimal = scaled_parts.iter().sum();
    let mut leftover_cents = ((available - handed_out) / cent).floor();

    let mut order: Vec<usize> = (0..discretionary.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));

    // a rounded ratio can overshoot by a cent; take it back from the smallest remainders
    for &i in order.iter().rev() {
        if leftover_cents >= Decimal::ZERO {
            break;
        }
        if scaled_parts[i] >= cent {
            scaled_parts[i] -= cent;
            leftover_cents += Decimal::ONE;
        }
    }

    for i in order {
        if leftover_cents <= Decimal::ZERO {
            break;
        }
        if scaled_parts[i] + cent <= discretionary[i] {
            scaled_parts[i] += cent;
            leftover_cents -= Decimal::ONE;
        }
    }

    let normalized: Vec<Decimal> = floors
        .iter()
        .zip(&scaled_parts)
        .map(|(f, d)| *f + *d)
        .collect();
    let normalized_total: Decimal = normalized.iter().sum();

    debug!(
        excess = %excess,
        available = %available,
        total = %normalized_total,
        "Discretionary raises scaled to fit pool"
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "normalization".to_string(),
        rule_name: "Allocation Normalization".to_string(),
        input: serde_json::json!({
            "pool": pool.to_string(),
            "total": total.normalize().to_string(),
            "total_floor": total_floor.normalize().to_string()
        }),
        output: serde_json::json!({
            "scaled": true,
            "excess": excess.normalize().to_string(),
            "total": normalized_total.normalize().to_string()
        }),
        reasoning: format!(
            "Total raises {} exceeded pool {} by {}; scaled discretionary raises of {} down to {}",
            total.normalize(),
            pool,
            excess.normalize(),
            total_discretionary.normalize(),
            available.normalize()
        ),
    };

    Ok(NormalizedAllocation {
        raises: normalized,
        scaled: true,
        excess,
        audit_step,
    })
}

/// Sums `values`, reporting overflow as an invalid pool.
pub(crate) fn checked_total(values: &[Decimal], what: &str) -> EngineResult<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))
        .ok_or_else(|| {
            EngineError::invalid_option("pool", format!("total of {} is too large to represent", what))
        })
}
