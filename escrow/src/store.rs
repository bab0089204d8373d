//! Escrow entry persistence
//!
//! The ledger talks to storage through `EscrowStore`. The one
//! non-negotiable requirement is `update_if_status`: an atomic
//! conditional update (replace the entry only if its current status
//! matches the expected one). That single primitive is what makes
//! double release and the dispute/auto-release race impossible.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::entry::{EscrowEntry, EscrowStatus};
use crate::error::{EscrowError, Result};

pub trait EscrowStore: Send + Sync {
    /// Insert a new entry, atomically claiming its transaction ref.
    /// Fails with `DuplicateEscrow` if the ref already has an entry.
    fn insert(&self, entry: &EscrowEntry) -> Result<()>;

    fn get(&self, id: &str) -> Result<Option<EscrowEntry>>;

    fn find_by_ref(&self, transaction_ref: &str) -> Result<Option<EscrowEntry>>;

    /// Replace the stored entry only if its current status equals
    /// `expected`. Returns `false` (without writing) when a concurrent
    /// transition got there first.
    fn update_if_status(
        &self,
        id: &str,
        expected: EscrowStatus,
        updated: &EscrowEntry,
    ) -> Result<bool>;

    /// Entries currently in custody, for the release sweep
    fn held_entries(&self) -> Result<Vec<EscrowEntry>>;
}

/// In-process store backed by a mutex-guarded map. Used by tests and
/// single-process deployments; conditional updates are atomic because
/// every operation runs under the one lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, EscrowEntry>,
    id_by_ref: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| EscrowError::Storage("memory store lock poisoned".to_string()))
    }
}

impl EscrowStore for MemoryStore {
    fn insert(&self, entry: &EscrowEntry) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.id_by_ref.contains_key(&entry.transaction_ref) {
            return Err(EscrowError::DuplicateEscrow(entry.transaction_ref.clone()));
        }
        inner
            .id_by_ref
            .insert(entry.transaction_ref.clone(), entry.id.clone());
        inner.entries.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<EscrowEntry>> {
        Ok(self.lock()?.entries.get(id).cloned())
    }

    fn find_by_ref(&self, transaction_ref: &str) -> Result<Option<EscrowEntry>> {
        let inner = self.lock()?;
        Ok(inner
            .id_by_ref
            .get(transaction_ref)
            .and_then(|id| inner.entries.get(id))
            .cloned())
    }

    fn update_if_status(
        &self,
        id: &str,
        expected: EscrowStatus,
        updated: &EscrowEntry,
    ) -> Result<bool> {
        let mut inner = self.lock()?;
        match inner.entries.get_mut(id) {
            Some(current) if current.status == expected => {
                *current = updated.clone();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(EscrowError::NotFound(id.to_string())),
        }
    }

    fn held_entries(&self) -> Result<Vec<EscrowEntry>> {
        Ok(self
            .lock()?
            .entries
            .values()
            .filter(|e| e.status == EscrowStatus::Held)
            .cloned()
            .collect())
    }
}
