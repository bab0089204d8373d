//! Fee engine error types

use thiserror::Error;

use crate::types::TaskType;

/// Fee calculation and policy errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeError {
    #[error("Invalid amount: {0} (amounts are non-negative minor units)")]
    InvalidAmount(i64),

    #[error("No fee model configured for task type {0:?}")]
    UnknownTaskType(TaskType),
}

pub type Result<T> = std::result::Result<T, FeeError>;
