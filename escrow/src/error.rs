//! Escrow ledger error types

use thiserror::Error;

use crate::entry::EscrowStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    #[error("Escrow already open for transaction {0}")]
    DuplicateEscrow(String),

    #[error("Cannot {action} an entry in status {from:?}")]
    InvalidTransition {
        from: EscrowStatus,
        action: &'static str,
    },

    #[error("Escrow entry not found: {0}")]
    NotFound(String),

    #[error("Scheduled release not due until {eligible_at}")]
    ReleaseNotDue { eligible_at: i64 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, EscrowError>;
