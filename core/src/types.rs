//! Core value types for the fee engine
//!
//! All money values are integer minor units (cents). Decimal rendering
//! belongs to the presentation boundary, never to this crate.

use serde::{Deserialize, Serialize};

/// Money in minor units (cents). Signed so that a negative input can be
/// represented at the boundary and rejected with a typed error instead
/// of wrapping.
pub type Amount = i64;

/// Kind of task posted on the marketplace. Determines which fee model
/// and escrow threshold apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// One participant helping another directly
    Solo,
    /// Neighborhood/community organized task
    Community,
    /// Corporate-sponsored task
    Corporate,
    /// Goods-for-services exchange; never charged, never escrowed
    Barter,
}

impl TaskType {
    /// All task types, for schedule validation and iteration
    pub const ALL: [TaskType; 4] = [
        TaskType::Solo,
        TaskType::Community,
        TaskType::Corporate,
        TaskType::Barter,
    ];
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskType::Solo => "solo",
            TaskType::Community => "community",
            TaskType::Corporate => "corporate",
            TaskType::Barter => "barter",
        };
        write!(f, "{}", s)
    }
}

/// Fee model for one task type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeModel {
    /// Percentage rate in basis points (10_000 == 100%)
    pub rate_bps: u32,
    /// Flat processing fee in minor units, waived when gross is zero
    #[serde(default)]
    pub flat_processing_fee: Amount,
    /// Custody threshold in minor units; `None` means never escrowed
    #[serde(default)]
    pub escrow_threshold: Option<Amount>,
}

/// Result of a fee calculation. Immutable value object; the function
/// producing it is pure, so it is safe to cache by `(gross, task_type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub gross: Amount,
    pub platform_fee: Amount,
    pub processing_fee: Amount,
    pub net: Amount,
}

/// Custody decision for one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowDecision {
    pub requires_escrow: bool,
    /// Threshold that was consulted (`None` for types never escrowed)
    pub threshold: Option<Amount>,
}
