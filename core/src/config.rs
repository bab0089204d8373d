//! Engine configuration loading
//!
//! TOML file with a per-type fee table and the escrow hold period.
//! Omitted types fall back to the standard schedule; an absent file is
//! the standard configuration.
//!
//! ```toml
//! [fees.community]
//! rate_bps = 700
//! escrow_threshold = 20000
//!
//! [escrow]
//! hold_period_secs = 86400
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::DEFAULT_HOLD_PERIOD_SECS;
use crate::schedule::FeeSchedule;
use crate::types::{FeeModel, TaskType};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid fee schedule: {0}")]
    InvalidSchedule(String),
}

/// Resolved engine configuration: the immutable schedule plus the
/// uniform custody hold period.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub schedule: FeeSchedule,
    pub hold_period_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    fees: HashMap<TaskType, FeeModel>,
    #[serde(default)]
    escrow: EscrowSection,
}

#[derive(Debug, Default, Deserialize)]
struct EscrowSection {
    hold_period_secs: Option<u64>,
}

impl EngineConfig {
    /// Standard configuration (no config file)
    pub fn standard() -> Self {
        EngineConfig {
            schedule: FeeSchedule::standard(),
            hold_period_secs: DEFAULT_HOLD_PERIOD_SECS,
        }
    }

    /// Parse from TOML text, overlaying file entries on the standard
    /// schedule and validating the result.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        let schedule = FeeSchedule::standard().with_overrides(file.fees);
        schedule.validate().map_err(ConfigError::InvalidSchedule)?;
        Ok(EngineConfig {
            schedule,
            hold_period_secs: file
                .escrow
                .hold_period_secs
                .unwrap_or(DEFAULT_HOLD_PERIOD_SECS),
        })
    }

    /// Load from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
