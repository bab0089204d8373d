//! Escrow custody policy
//!
//! Decides whether funds for a transaction must be held in custodial
//! escrow. Pure function of the injected schedule and the input.

use std::sync::Arc;

use crate::error::{FeeError, Result};
use crate::schedule::FeeSchedule;
use crate::types::{Amount, EscrowDecision, TaskType};

#[derive(Debug, Clone)]
pub struct EscrowPolicy {
    schedule: Arc<FeeSchedule>,
}

impl EscrowPolicy {
    pub fn new(schedule: Arc<FeeSchedule>) -> Self {
        EscrowPolicy { schedule }
    }

    /// Custody decision for `gross` at `task_type`.
    ///
    /// The threshold is an inclusive lower bound: an amount exactly
    /// equal to the threshold requires escrow. Barter never does,
    /// regardless of what the table says.
    pub fn decide(&self, gross: Amount, task_type: TaskType) -> Result<EscrowDecision> {
        if gross < 0 {
            return Err(FeeError::InvalidAmount(gross));
        }

        if task_type == TaskType::Barter {
            return Ok(EscrowDecision {
                requires_escrow: false,
                threshold: None,
            });
        }

        let model = self.schedule.model(task_type)?;
        let requires_escrow = match model.escrow_threshold {
            Some(threshold) => gross >= threshold,
            None => false,
        };

        Ok(EscrowDecision {
            requires_escrow,
            threshold: model.escrow_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeeModel;
    use std::collections::HashMap;

    fn policy() -> EscrowPolicy {
        EscrowPolicy::new(Arc::new(FeeSchedule::standard()))
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let policy = policy();
        for task_type in [TaskType::Solo, TaskType::Community, TaskType::Corporate] {
            let threshold = policy
                .schedule
                .threshold(task_type)
                .unwrap()
                .expect("charged types have thresholds");
            assert!(policy.decide(threshold, task_type).unwrap().requires_escrow);
            assert!(!policy.decide(threshold - 1, task_type).unwrap().requires_escrow);
        }
    }

    #[test]
    fn test_barter_never_escrowed() {
        // table claims barter escrows above zero; the policy ignores it
        let mut models = HashMap::new();
        models.insert(
            TaskType::Barter,
            FeeModel {
                rate_bps: 0,
                flat_processing_fee: 0,
                escrow_threshold: Some(0),
            },
        );
        let policy = EscrowPolicy::new(Arc::new(FeeSchedule::new(models)));
        for gross in [0, 1, 20_000, 10_000_000] {
            let decision = policy.decide(gross, TaskType::Barter).unwrap();
            assert!(!decision.requires_escrow);
            assert_eq!(decision.threshold, None);
        }
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert_eq!(
            policy().decide(-500, TaskType::Corporate).unwrap_err(),
            FeeError::InvalidAmount(-500)
        );
    }

    #[test]
    fn test_missing_threshold_means_never() {
        let mut models = HashMap::new();
        models.insert(
            TaskType::Solo,
            FeeModel {
                rate_bps: 1_000,
                flat_processing_fee: 0,
                escrow_threshold: None,
            },
        );
        let policy = EscrowPolicy::new(Arc::new(FeeSchedule::new(models)));
        assert!(!policy.decide(i64::MAX / 2, TaskType::Solo).unwrap().requires_escrow);
    }

    #[test]
    fn test_scenario_amounts() {
        let policy = policy();
        // $100 community below the $200 threshold
        assert!(!policy.decide(10_000, TaskType::Community).unwrap().requires_escrow);
        // $250 corporate above it
        assert!(policy.decide(25_000, TaskType::Corporate).unwrap().requires_escrow);
    }
}
