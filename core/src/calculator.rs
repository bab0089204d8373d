//! Fee breakdown calculation
//!
//! Pure function of `(gross, task_type)` and the injected schedule.
//! Arithmetic is exact: amounts stay in integer minor units, the
//! percentage is applied in basis points widened to i128, and the
//! single rounding step uses round-half-to-even.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::constants::BPS_DENOMINATOR;
use crate::error::{FeeError, Result};
use crate::schedule::FeeSchedule;
use crate::types::{Amount, FeeBreakdown, TaskType};

/// Computes fee breakdowns against one immutable schedule
#[derive(Debug, Clone)]
pub struct FeeCalculator {
    schedule: Arc<FeeSchedule>,
}

impl FeeCalculator {
    pub fn new(schedule: Arc<FeeSchedule>) -> Self {
        FeeCalculator { schedule }
    }

    /// Compute the split of `gross` for `task_type`.
    ///
    /// Guarantees `platform_fee + processing_fee + net == gross` with
    /// every field non-negative. The flat processing fee is waived at
    /// zero gross, and the combined deduction is clamped to gross so
    /// the payout can never go negative.
    pub fn compute(&self, gross: Amount, task_type: TaskType) -> Result<FeeBreakdown> {
        if gross < 0 {
            return Err(FeeError::InvalidAmount(gross));
        }

        // Barter's no-fee guarantee is a product commitment, enforced
        // here rather than trusting the table to hold zeros.
        if task_type == TaskType::Barter {
            return Ok(FeeBreakdown {
                gross,
                platform_fee: 0,
                processing_fee: 0,
                net: gross,
            });
        }

        let model = self.schedule.model(task_type)?;

        let mut platform_fee =
            div_round_half_even(gross as i128 * model.rate_bps as i128, BPS_DENOMINATOR as i128)
                as Amount;
        let mut processing_fee = if gross > 0 { model.flat_processing_fee } else { 0 };

        // Clamp: with rate <= 100% the platform fee alone cannot exceed
        // gross, but a flat fee larger than a near-zero gross can.
        if platform_fee > gross {
            platform_fee = gross;
        }
        if platform_fee + processing_fee > gross {
            processing_fee = gross - platform_fee;
        }

        let net = gross - platform_fee - processing_fee;

        Ok(FeeBreakdown {
            gross,
            platform_fee,
            processing_fee,
            net,
        })
    }
}

/// Integer division rounding half to even (banker's rounding).
/// Requires `numer >= 0` and `denom > 0`.
fn div_round_half_even(numer: i128, denom: i128) -> i128 {
    let quotient = numer / denom;
    let remainder = numer % denom;
    match (remainder * 2).cmp(&denom) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => {
            if quotient % 2 == 0 {
                quotient
            } else {
                quotient + 1
            }
        }
    }
}
