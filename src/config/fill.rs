//! Constant fill configuration.

use super::{parse_env_var, Config, ParallelConfig, SplitDiscipline};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Configuration for [`ParallelFill`](crate::algorithms::ParallelFill).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillConfig {
    /// Work-quantum policy, `(16384, automatic)` by default
    pub parallel: ParallelConfig,
    /// Splitting discipline used once the policy decides to fork
    pub discipline: SplitDiscipline,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            parallel: ParallelConfig::default(),
            discipline: SplitDiscipline::RecursiveHalving,
        }
    }
}

impl Config for FillConfig {
    fn validate(&self) -> Result<()> {
        self.parallel.validate()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            parallel: ParallelConfig::from_env_scoped(prefix, "FILL", defaults.parallel),
            discipline: parse_env_var(&format!("{}FILL_DISCIPLINE", prefix), defaults.discipline),
        };
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            parallel: ParallelConfig::performance_preset(),
            ..Self::default()
        }
    }

    fn sequential_preset() -> Self {
        Self {
            parallel: ParallelConfig::sequential(),
            ..Self::default()
        }
    }
}
