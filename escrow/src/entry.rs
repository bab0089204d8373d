//! Escrow entry entity and lifecycle statuses

use market_core::Amount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an escrow entry. The single source of truth for
/// custody state; statuses like "released" and "disputed" can never be
/// true at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscrowStatus {
    /// Created, funds not yet confirmed captured
    Pending,
    /// Funds captured and in custody
    Held,
    /// Funds paid out to the counterpart (terminal)
    Released,
    /// Dispute filed while held
    Disputed,
    /// Dispute resolved by returning funds (terminal)
    Cancelled,
}

impl EscrowStatus {
    /// Terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, EscrowStatus::Released | EscrowStatus::Cancelled)
    }
}

/// Why a release happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseReason {
    /// Hold period elapsed, released by the periodic sweep
    Scheduled,
    /// Explicit authorized action
    Manual,
}

/// Outcome of a dispute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeOutcome {
    /// Pay out to the counterpart
    Release,
    /// Return funds to the payer
    Cancel,
}

/// One escrow entry per transaction that required custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowEntry {
    /// Opaque unique id
    pub id: String,
    /// Owning transaction, unique across entries
    pub transaction_ref: String,
    /// Amount in custody, minor units
    pub amount: Amount,
    pub status: EscrowStatus,
    /// Unix seconds
    pub created_at: i64,
    /// Earliest time a scheduled release may fire
    pub release_eligible_at: i64,
    /// Set exactly when a terminal status is entered
    pub resolved_at: Option<i64>,
}

impl EscrowEntry {
    pub fn new(
        transaction_ref: &str,
        amount: Amount,
        created_at: i64,
        release_eligible_at: i64,
    ) -> Self {
        EscrowEntry {
            id: Uuid::new_v4().to_string(),
            transaction_ref: transaction_ref.to_string(),
            amount,
            status: EscrowStatus::Pending,
            created_at,
            release_eligible_at,
            resolved_at: None,
        }
    }
}
