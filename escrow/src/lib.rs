//! Escrow custody ledger
//!
//! Owns the lifecycle of escrow entries:
//!
//! ```text
//! Pending --(payment captured)--> Held
//! Held    --(hold period elapsed, no dispute)--> Released   [Scheduled]
//! Held    --(authorized manual action)--> Released          [Manual]
//! Held    --(dispute filed)--> Disputed
//! Disputed --(resolution: release)--> Released
//! Disputed --(resolution: cancel)--> Cancelled
//! ```
//!
//! Every other edge is rejected. `Released` and `Cancelled` are
//! terminal, and stay terminal under concurrent callers: all
//! transitions go through a per-entry compare-and-set in the store, so
//! two racing releases resolve to exactly one success.

pub mod entry;
pub mod error;
pub mod ledger;
pub mod scheduler;
pub mod store;

pub use entry::{DisputeOutcome, EscrowEntry, EscrowStatus, ReleaseReason};
pub use error::{EscrowError, Result};
pub use ledger::EscrowLedger;
pub use scheduler::PayoutScheduler;
pub use store::{EscrowStore, MemoryStore};
