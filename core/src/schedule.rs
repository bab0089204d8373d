//! The per-task-type fee schedule
//!
//! One immutable table mapping task type to fee model. Loaded once at
//! process start (or built from `standard()`) and passed explicitly to
//! the calculator and policy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{BPS_DENOMINATOR, MINOR_UNIT};
use crate::error::{FeeError, Result};
use crate::types::{Amount, FeeModel, TaskType};

/// Immutable fee schedule. Cloning is cheap enough for the small fixed
/// set of task types; share via `Arc` where long-lived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    models: HashMap<TaskType, FeeModel>,
}

impl FeeSchedule {
    /// Build a schedule from an explicit model table
    pub fn new(models: HashMap<TaskType, FeeModel>) -> Self {
        FeeSchedule { models }
    }

    /// The standard product configuration: solo 10% + $0.30 processing,
    /// community 7%, corporate 15%, custody threshold $200.00 for all
    /// charged types, barter free and never escrowed.
    pub fn standard() -> Self {
        let threshold = 200 * MINOR_UNIT;
        let mut models = HashMap::new();
        models.insert(
            TaskType::Solo,
            FeeModel {
                rate_bps: 1_000,
                flat_processing_fee: 30,
                escrow_threshold: Some(threshold),
            },
        );
        models.insert(
            TaskType::Community,
            FeeModel {
                rate_bps: 700,
                flat_processing_fee: 0,
                escrow_threshold: Some(threshold),
            },
        );
        models.insert(
            TaskType::Corporate,
            FeeModel {
                rate_bps: 1_500,
                flat_processing_fee: 0,
                escrow_threshold: Some(threshold),
            },
        );
        models.insert(
            TaskType::Barter,
            FeeModel {
                rate_bps: 0,
                flat_processing_fee: 0,
                escrow_threshold: None,
            },
        );
        FeeSchedule { models }
    }

    /// Overlay models on top of this schedule (used when a config file
    /// overrides a subset of task types)
    pub fn with_overrides(mut self, overrides: HashMap<TaskType, FeeModel>) -> Self {
        for (task_type, model) in overrides {
            self.models.insert(task_type, model);
        }
        self
    }

    /// Look up the model for a task type. Lookup failure is surfaced,
    /// never silently defaulted.
    pub fn model(&self, task_type: TaskType) -> Result<&FeeModel> {
        self.models
            .get(&task_type)
            .ok_or(FeeError::UnknownTaskType(task_type))
    }

    pub fn models(&self) -> &HashMap<TaskType, FeeModel> {
        &self.models
    }

    /// Check every model against the schedule invariants: rate within
    /// [0, 100%], non-negative flat fee and threshold.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (task_type, model) in &self.models {
            if model.rate_bps > BPS_DENOMINATOR {
                return Err(format!(
                    "{}: rate {} bps exceeds 100%",
                    task_type, model.rate_bps
                ));
            }
            if model.flat_processing_fee < 0 {
                return Err(format!(
                    "{}: negative flat processing fee {}",
                    task_type, model.flat_processing_fee
                ));
            }
            if let Some(threshold) = model.escrow_threshold {
                if threshold < 0 {
                    return Err(format!("{}: negative escrow threshold {}", task_type, threshold));
                }
            }
        }
        Ok(())
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

/// Convenience accessor used by tests and the audit endpoint
impl FeeSchedule {
    pub fn threshold(&self, task_type: TaskType) -> Result<Option<Amount>> {
        Ok(self.model(task_type)?.escrow_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schedule_covers_all_types() {
        let schedule = FeeSchedule::standard();
        for task_type in TaskType::ALL {
            assert!(schedule.model(task_type).is_ok());
        }
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_is_surfaced() {
        let schedule = FeeSchedule::new(HashMap::new());
        let err = schedule.model(TaskType::Solo).unwrap_err();
        assert_eq!(err, FeeError::UnknownTaskType(TaskType::Solo));
    }

    #[test]
    fn test_overrides_replace_only_named_types() {
        let mut overrides = HashMap::new();
        overrides.insert(
            TaskType::Community,
            FeeModel {
                rate_bps: 500,
                flat_processing_fee: 0,
                escrow_threshold: Some(10_000),
            },
        );
        let schedule = FeeSchedule::standard().with_overrides(overrides);
        assert_eq!(schedule.model(TaskType::Community).unwrap().rate_bps, 500);
        // untouched type keeps the standard model
        assert_eq!(schedule.model(TaskType::Corporate).unwrap().rate_bps, 1_500);
    }

    #[test]
    fn test_validate_rejects_rate_over_100_percent() {
        let mut models = HashMap::new();
        models.insert(
            TaskType::Solo,
            FeeModel {
                rate_bps: 10_001,
                flat_processing_fee: 0,
                escrow_threshold: None,
            },
        );
        assert!(FeeSchedule::new(models).validate().is_err());
    }
}
