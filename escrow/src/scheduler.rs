//! Payout scheduling
//!
//! Computes the auto-release time at entry creation and owns the
//! due-ness predicate, so the web layer, the background sweep, and a
//! manual action all agree on the same answer. The scheduler has no
//! timer of its own; an external driver calls `sweep` periodically.

use std::sync::Arc;

use market_core::Amount;
use tracing::warn;

use crate::entry::{EscrowEntry, EscrowStatus, ReleaseReason};
use crate::error::{EscrowError, Result};
use crate::ledger::EscrowLedger;

pub struct PayoutScheduler {
    ledger: Arc<EscrowLedger>,
    hold_period_secs: u64,
}

impl PayoutScheduler {
    pub fn new(ledger: Arc<EscrowLedger>, hold_period_secs: u64) -> Self {
        PayoutScheduler {
            ledger,
            hold_period_secs,
        }
    }

    pub fn hold_period_secs(&self) -> u64 {
        self.hold_period_secs
    }

    /// Auto-release time for an entry created at `created_at`
    pub fn release_eligible_at(&self, created_at: i64) -> i64 {
        created_at.saturating_add(self.hold_period_secs as i64)
    }

    /// The single source of truth for "may this entry auto-release now"
    pub fn is_release_due(&self, entry: &EscrowEntry, now: i64) -> bool {
        entry.status == EscrowStatus::Held && now >= entry.release_eligible_at
    }

    /// Open an entry with its release time computed from `now`
    pub fn open(&self, transaction_ref: &str, amount: Amount, now: i64) -> Result<EscrowEntry> {
        self.ledger
            .open(transaction_ref, amount, now, self.release_eligible_at(now))
    }

    /// Release every held entry whose hold period has elapsed. Entries
    /// that a concurrent dispute or manual action claims mid-sweep are
    /// skipped, not errors.
    pub fn sweep(&self, now: i64) -> Result<Vec<EscrowEntry>> {
        let mut released = Vec::new();
        for entry in self.ledger.held_entries()? {
            if !self.is_release_due(&entry, now) {
                continue;
            }
            match self.ledger.release(&entry.id, ReleaseReason::Scheduled, now) {
                Ok(entry) => released.push(entry),
                Err(EscrowError::InvalidTransition { from, .. }) => {
                    warn!(id = %entry.id, now_in = ?from, "sweep lost release race");
                }
                Err(EscrowError::ReleaseNotDue { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(released)
    }
}
