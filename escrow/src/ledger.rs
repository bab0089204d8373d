//! Escrow ledger: creation and state transitions
//!
//! All transitions follow the same discipline: read the entry,
//! validate the requested edge against the current status, then ask
//! the store for a conditional update keyed on that status. If a
//! concurrent transition wins the race, the ledger re-reads and
//! re-validates, so the loser observes `InvalidTransition` from the
//! new status rather than silently overwriting it.

use std::sync::Arc;

use market_core::Amount;
use tracing::info;

use crate::entry::{DisputeOutcome, EscrowEntry, EscrowStatus, ReleaseReason};
use crate::error::{EscrowError, Result};
use crate::store::EscrowStore;

pub struct EscrowLedger {
    store: Arc<dyn EscrowStore>,
}

impl EscrowLedger {
    pub fn new(store: Arc<dyn EscrowStore>) -> Self {
        EscrowLedger { store }
    }

    /// Open an escrow entry for a transaction. Idempotent per
    /// `transaction_ref`: a retried create fails with
    /// `DuplicateEscrow` and the caller re-fetches via `find_by_ref`.
    pub fn open(
        &self,
        transaction_ref: &str,
        amount: Amount,
        created_at: i64,
        release_eligible_at: i64,
    ) -> Result<EscrowEntry> {
        if amount < 0 {
            return Err(EscrowError::InvalidAmount(amount));
        }
        let entry = EscrowEntry::new(transaction_ref, amount, created_at, release_eligible_at);
        self.store.insert(&entry)?;
        info!(
            id = %entry.id,
            transaction_ref = %entry.transaction_ref,
            amount = entry.amount,
            "escrow opened"
        );
        Ok(entry)
    }

    /// Record that the payment gateway confirmed funds capture.
    /// Valid only from `Pending`.
    pub fn mark_held(&self, id: &str) -> Result<EscrowEntry> {
        self.transition(id, "hold", None, |entry| match entry.status {
            EscrowStatus::Pending => Ok(EscrowStatus::Held),
            from => Err(EscrowError::InvalidTransition {
                from,
                action: "hold",
            }),
        })
    }

    /// Release held funds to the counterpart. Valid only from `Held`;
    /// a second release fails rather than paying twice. A `Scheduled`
    /// release additionally requires the hold period to have elapsed.
    pub fn release(&self, id: &str, reason: ReleaseReason, now: i64) -> Result<EscrowEntry> {
        self.transition(id, "release", Some(now), |entry| match entry.status {
            EscrowStatus::Held => {
                if reason == ReleaseReason::Scheduled && now < entry.release_eligible_at {
                    return Err(EscrowError::ReleaseNotDue {
                        eligible_at: entry.release_eligible_at,
                    });
                }
                Ok(EscrowStatus::Released)
            }
            from => Err(EscrowError::InvalidTransition {
                from,
                action: "release",
            }),
        })
    }

    /// File a dispute. Valid only from `Held`.
    pub fn dispute(&self, id: &str) -> Result<EscrowEntry> {
        self.transition(id, "dispute", None, |entry| match entry.status {
            EscrowStatus::Held => Ok(EscrowStatus::Disputed),
            from => Err(EscrowError::InvalidTransition {
                from,
                action: "dispute",
            }),
        })
    }

    /// Resolve an open dispute, either paying out or returning funds.
    /// Valid only from `Disputed`.
    pub fn resolve_dispute(
        &self,
        id: &str,
        outcome: DisputeOutcome,
        now: i64,
    ) -> Result<EscrowEntry> {
        self.transition(id, "resolve", Some(now), |entry| match entry.status {
            EscrowStatus::Disputed => Ok(match outcome {
                DisputeOutcome::Release => EscrowStatus::Released,
                DisputeOutcome::Cancel => EscrowStatus::Cancelled,
            }),
            from => Err(EscrowError::InvalidTransition {
                from,
                action: "resolve",
            }),
        })
    }

    pub fn get(&self, id: &str) -> Result<EscrowEntry> {
        self.store
            .get(id)?
            .ok_or_else(|| EscrowError::NotFound(id.to_string()))
    }

    pub fn find_by_ref(&self, transaction_ref: &str) -> Result<Option<EscrowEntry>> {
        self.store.find_by_ref(transaction_ref)
    }

    pub fn held_entries(&self) -> Result<Vec<EscrowEntry>> {
        self.store.held_entries()
    }

    fn transition(
        &self,
        id: &str,
        action: &'static str,
        now: Option<i64>,
        next_status: impl Fn(&EscrowEntry) -> Result<EscrowStatus>,
    ) -> Result<EscrowEntry> {
        loop {
            let current = self
                .store
                .get(id)?
                .ok_or_else(|| EscrowError::NotFound(id.to_string()))?;
            let next = next_status(&current)?;

            let mut updated = current.clone();
            updated.status = next;
            updated.resolved_at = if next.is_terminal() { now } else { None };

            if self
                .store
                .update_if_status(id, current.status, &updated)?
            {
                info!(id = %id, from = ?current.status, to = ?next, action, "escrow transition");
                return Ok(updated);
            }
            // Lost a race: another transition changed the status
            // between read and update. Re-read and re-validate; the
            // edge that is now illegal fails above.
        }
    }
}
