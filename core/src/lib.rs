//! Taskmarket Fee Engine
//!
//! Pure fee and custody-decision logic for the task marketplace:
//! - Per-task-type fee schedule (percentage rate + flat processing fee)
//! - Deterministic fee breakdown calculation (integer minor units)
//! - Escrow threshold policy
//!
//! Everything in this crate is side-effect free. The schedule is an
//! immutable value loaded once at startup and passed in explicitly, so
//! a configuration change can never reinterpret an already-computed
//! breakdown.

pub mod calculator;
pub mod config;
pub mod error;
pub mod policy;
pub mod schedule;
pub mod types;

pub use calculator::FeeCalculator;
pub use config::{ConfigError, EngineConfig};
pub use error::{FeeError, Result};
pub use policy::EscrowPolicy;
pub use schedule::FeeSchedule;
pub use types::{Amount, EscrowDecision, FeeBreakdown, FeeModel, TaskType};

/// Fee engine constants
pub mod constants {
    /// Basis-point denominator (100% == 10,000 bps)
    pub const BPS_DENOMINATOR: u32 = 10_000;

    /// Minor units per major currency unit (cents per dollar)
    pub const MINOR_UNIT: i64 = 100;

    /// Default custody hold period before automatic release (24 hours)
    pub const DEFAULT_HOLD_PERIOD_SECS: u64 = 86_400;
}
