//! Constant-detection configuration.

use super::{parse_env_var, Config, ParallelConfig, SplitDiscipline};
use crate::error::Result;
use crate::memory::{DetectStrategy, SimdTier};
use serde::{Deserialize, Serialize};

/// Configuration for [`ZeroDetector`](crate::algorithms::ZeroDetector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroDetectConfig {
    /// Work-quantum policy, `(4096, automatic)` by default
    pub parallel: ParallelConfig,
    /// Splitting discipline used once the policy decides to fork
    pub discipline: SplitDiscipline,
    /// Base-case kernel variant
    pub strategy: DetectStrategy,
    /// Vector tier override; `None` uses the best tier the CPU supports.
    /// Unsupported tiers are clamped down at dispatch.
    pub simd_tier: Option<SimdTier>,
}

impl Default for ZeroDetectConfig {
    fn default() -> Self {
        Self {
            parallel: ParallelConfig::for_detection(),
            discipline: SplitDiscipline::RecursiveHalving,
            strategy: DetectStrategy::default(),
            simd_tier: None,
        }
    }
}

impl ZeroDetectConfig {
    /// Return a copy using `strategy`.
    pub fn with_strategy(mut self, strategy: DetectStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Return a copy using `parallel` as its policy.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Return a copy using `discipline`.
    pub fn with_discipline(mut self, discipline: SplitDiscipline) -> Self {
        self.discipline = discipline;
        self
    }

    /// Return a copy pinned to `tier`.
    pub fn with_simd_tier(mut self, tier: SimdTier) -> Self {
        self.simd_tier = Some(tier);
        self
    }
}

impl Config for ZeroDetectConfig {
    fn validate(&self) -> Result<()> {
        self.parallel.validate()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let defaults = Self::default();
        let simd_tier = std::env::var(format!("{}DETECT_SIMD_TIER", prefix))
            .ok()
            .and_then(|s| s.parse().ok())
            .or(defaults.simd_tier);
        let config = Self {
            parallel: ParallelConfig::from_env_scoped(prefix, "DETECT", defaults.parallel),
            discipline: parse_env_var(
                &format!("{}DETECT_DISCIPLINE", prefix),
                defaults.discipline,
            ),
            strategy: parse_env_var(&format!("{}DETECT_STRATEGY", prefix), defaults.strategy),
            simd_tier,
        };
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            strategy: DetectStrategy::Accumulate4,
            ..Self::default()
        }
    }

    fn sequential_preset() -> Self {
        Self {
            parallel: ParallelConfig::for_detection().with_degree_of_parallelism(1),
            strategy: DetectStrategy::EarlyExit,
            ..Self::default()
        }
    }
}
