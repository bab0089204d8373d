//! Sled-based durable storage for escrow entries
//!
//! Two trees: entries keyed by id, and a transaction-ref index keyed
//! by ref. Both the ref claim on insert and the status-conditional
//! update go through `sled::Tree::compare_and_swap`, which gives the
//! ledger its atomic check-and-update without a separate lock. Writes
//! flush before returning; an acknowledged transition is on disk.

use std::path::Path;

use market_escrow::{EscrowEntry, EscrowError, EscrowStatus, EscrowStore};

const ENTRIES_TREE: &str = "escrow_entries";
const REFS_TREE: &str = "escrow_refs";

#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
    entries: sled::Tree,
    refs: sled::Tree,
}

impl SledStore {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EscrowError> {
        let db = sled::open(path)
            .map_err(|e| EscrowError::Storage(format!("Failed to open database: {}", e)))?;
        let entries = db
            .open_tree(ENTRIES_TREE)
            .map_err(|e| EscrowError::Storage(format!("Failed to open entries tree: {}", e)))?;
        let refs = db
            .open_tree(REFS_TREE)
            .map_err(|e| EscrowError::Storage(format!("Failed to open refs tree: {}", e)))?;
        Ok(SledStore { db, entries, refs })
    }

    fn flush(&self) -> Result<(), EscrowError> {
        self.db
            .flush()
            .map_err(|e| EscrowError::Storage(format!("Failed to flush to disk: {}", e)))?;
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<EscrowEntry, EscrowError> {
        bincode::deserialize(bytes)
            .map_err(|e| EscrowError::Storage(format!("Failed to deserialize entry: {}", e)))
    }

    fn encode(entry: &EscrowEntry) -> Result<Vec<u8>, EscrowError> {
        bincode::serialize(entry)
            .map_err(|e| EscrowError::Storage(format!("Failed to serialize entry: {}", e)))
    }
}

impl EscrowStore for SledStore {
    fn insert(&self, entry: &EscrowEntry) -> Result<(), EscrowError> {
        // claim the transaction ref first; losing the claim means a
        // concurrent (or earlier) open already owns it
        let claim = self
            .refs
            .compare_and_swap(
                entry.transaction_ref.as_bytes(),
                None::<&[u8]>,
                Some(entry.id.as_bytes()),
            )
            .map_err(|e| EscrowError::Storage(format!("Failed to claim ref: {}", e)))?;
        if claim.is_err() {
            return Err(EscrowError::DuplicateEscrow(entry.transaction_ref.clone()));
        }

        let bytes = Self::encode(entry)?;
        self.entries
            .insert(entry.id.as_bytes(), bytes)
            .map_err(|e| EscrowError::Storage(format!("Failed to insert entry: {}", e)))?;
        self.flush()
    }

    fn get(&self, id: &str) -> Result<Option<EscrowEntry>, EscrowError> {
        match self
            .entries
            .get(id.as_bytes())
            .map_err(|e| EscrowError::Storage(format!("Failed to load entry: {}", e)))?
        {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn find_by_ref(&self, transaction_ref: &str) -> Result<Option<EscrowEntry>, EscrowError> {
        let id = self
            .refs
            .get(transaction_ref.as_bytes())
            .map_err(|e| EscrowError::Storage(format!("Failed to load ref index: {}", e)))?;
        match id {
            Some(id_bytes) => {
                let id = String::from_utf8_lossy(&id_bytes).to_string();
                self.get(&id)
            }
            None => Ok(None),
        }
    }

    fn update_if_status(
        &self,
        id: &str,
        expected: EscrowStatus,
        updated: &EscrowEntry,
    ) -> Result<bool, EscrowError> {
        let current_bytes = self
            .entries
            .get(id.as_bytes())
            .map_err(|e| EscrowError::Storage(format!("Failed to load entry: {}", e)))?
            .ok_or_else(|| EscrowError::NotFound(id.to_string()))?;

        let current = Self::decode(&current_bytes)?;
        if current.status != expected {
            return Ok(false);
        }

        let new_bytes = Self::encode(updated)?;
        let swapped = self
            .entries
            .compare_and_swap(id.as_bytes(), Some(current_bytes), Some(new_bytes))
            .map_err(|e| EscrowError::Storage(format!("Failed to update entry: {}", e)))?;

        match swapped {
            Ok(()) => {
                self.flush()?;
                Ok(true)
            }
            // bytes changed under us: a concurrent transition won
            Err(_) => Ok(false),
        }
    }

    fn held_entries(&self) -> Result<Vec<EscrowEntry>, EscrowError> {
        let mut held = Vec::new();
        for item in self.entries.iter() {
            let (_, bytes) =
                item.map_err(|e| EscrowError::Storage(format!("Failed to scan entries: {}", e)))?;
            let entry = Self::decode(&bytes)?;
            if entry.status == EscrowStatus::Held {
                held.push(entry);
            }
        }
        Ok(held)
    }
}
