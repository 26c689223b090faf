//! Array copy configuration.

use super::{parse_env_var, Config, ParallelConfig, SplitDiscipline};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Configuration for [`ParallelCopy`](crate::algorithms::ParallelCopy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Work-quantum policy, `(16384, automatic)` by default
    pub parallel: ParallelConfig,
    /// Splitting discipline used once the policy decides to fork
    pub discipline: SplitDiscipline,
}

impl CopyConfig {
    /// Create a copy configuration.
    pub const fn new(parallel: ParallelConfig, discipline: SplitDiscipline) -> Self {
        Self {
            parallel,
            discipline,
        }
    }

    /// Flat-partition copy with the given policy.
    pub const fn flat(parallel: ParallelConfig) -> Self {
        Self::new(parallel, SplitDiscipline::FlatPartition)
    }

    /// Recursive-halving copy with the given policy.
    pub const fn halving(parallel: ParallelConfig) -> Self {
        Self::new(parallel, SplitDiscipline::RecursiveHalving)
    }
}

impl Config for CopyConfig {
    fn validate(&self) -> Result<()> {
        self.parallel.validate()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            parallel: ParallelConfig::from_env_scoped(prefix, "COPY", defaults.parallel),
            discipline: parse_env_var(&format!("{}COPY_DISCIPLINE", prefix), defaults.discipline),
        };
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self::flat(ParallelConfig::performance_preset())
    }

    fn sequential_preset() -> Self {
        Self::flat(ParallelConfig::sequential())
    }
}
