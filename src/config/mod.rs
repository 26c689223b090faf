//! Configuration APIs for memband
//!
//! Every operation family carries a small, immutable configuration value that
//! is passed explicitly to the operation (or held by the operation struct).
//! The process-wide defaults are plain `Default` values, never mutable
//! globals.
//!
//! # Configuration Types
//!
//! - [`ParallelConfig`]: the work-quantum policy shared by all operations
//! - [`CopyConfig`]: policy plus splitting discipline for array copies
//! - [`ZeroDetectConfig`]: policy, discipline, detection strategy and SIMD tier
//! - [`FillConfig`]: policy plus splitting discipline for constant fills
//!
//! # Environment Initialization
//!
//! ```rust
//! use memband::config::{Config, ZeroDetectConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads MEMBAND_DETECT_MIN_WORK_QUANTUM, MEMBAND_DETECT_STRATEGY, ...
//! let config = ZeroDetectConfig::from_env()?;
//! assert!(config.validate().is_ok());
//! # Ok(())
//! # }
//! ```

use crate::error::{MembandError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub mod copy;
pub mod detect;
pub mod fill;
pub mod parallel;


/// Held by unit tests that set or read process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

pub use copy::CopyConfig;
pub use detect::ZeroDetectConfig;
pub use fill::FillConfig;
pub use parallel::{
    Dispatch, ParallelConfig, DEFAULT_MIN_WORK_QUANTUM, DETECT_MIN_WORK_QUANTUM,
};

/// Default prefix for environment variables.
pub const ENV_PREFIX: &str = "MEMBAND_";

/// Common configuration trait providing validation, environment initialization,
/// presets and file persistence.
pub trait Config: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables with the
    /// `MEMBAND_` prefix.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Initialize configuration from environment variables with a custom prefix.
    ///
    /// Unset or unparsable variables keep their default values.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset that uses every available core as early as is worthwhile.
    fn performance_preset() -> Self;

    /// Preset that never forks.
    fn sequential_preset() -> Self;

    /// Balanced preset; the defaults.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            MembandError::configuration(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(path, serialized).map_err(|e| {
            MembandError::configuration(format!("Failed to write config file: {}", e))
        })?;
        Ok(())
    }

    /// Load configuration from a JSON file and validate it.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MembandError::configuration(format!("Failed to read config file: {}", e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            MembandError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// How a parallel call splits its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitDiscipline {
    /// A handful of contiguous chunks scheduled at once, no recursion
    #[default]
    FlatPartition,
    /// Split at the midpoint until sub-ranges fall below the work quantum
    RecursiveHalving,
}

impl SplitDiscipline {
    /// Stable name used in environment variables and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlatPartition => "flat",
            Self::RecursiveHalving => "halving",
        }
    }
}

impl fmt::Display for SplitDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitDiscipline {
    type Err = MembandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "flat_partition" | "partition" => Ok(Self::FlatPartition),
            "halving" | "recursive_halving" | "recursive" => Ok(Self::RecursiveHalving),
            other => Err(MembandError::configuration(format!(
                "unknown split discipline '{}'",
                other
            ))),
        }
    }
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: FromStr,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
