//! Work-quantum policy: when to fork and how many workers to use.

use super::{parse_env_var, Config};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default minimum work quantum for copy and fill, in elements.
pub const DEFAULT_MIN_WORK_QUANTUM: usize = 16 * 1024;

/// Default minimum work quantum for constant detection, in bytes.
pub const DETECT_MIN_WORK_QUANTUM: usize = 4 * 1024;

/// Outcome of the policy decision for one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Run the base-case kernel on the caller's thread
    Sequential,
    /// Fork across at most `workers` threads
    Parallel {
        /// Effective degree of parallelism
        workers: usize,
    },
}

impl Dispatch {
    /// True for [`Dispatch::Parallel`].
    pub fn is_parallel(&self) -> bool {
        matches!(self, Self::Parallel { .. })
    }
}

/// The two tunable knobs of every parallel operation.
///
/// `degree_of_parallelism == 0` means "all available hardware threads";
/// `== 1` forces sequential execution regardless of size. The degree is only
/// a cap: a dispatch never uses more workers than there are hardware threads
/// or elements in the range.
///
/// Values are clamped at dispatch time and never rejected, including when a
/// policy is loaded from a file or the environment: a zero quantum behaves
/// as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Minimum range length for which forking is considered worthwhile
    pub min_work_quantum: usize,
    /// Maximum number of concurrent workers (0 = automatic)
    pub degree_of_parallelism: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WORK_QUANTUM, 0)
    }
}

impl ParallelConfig {
    /// Create a policy from its two knobs.
    pub const fn new(min_work_quantum: usize, degree_of_parallelism: usize) -> Self {
        Self {
            min_work_quantum,
            degree_of_parallelism,
        }
    }

    /// Default policy for constant detection, `(4096, automatic)`.
    pub const fn for_detection() -> Self {
        Self::new(DETECT_MIN_WORK_QUANTUM, 0)
    }

    /// Policy that never forks.
    pub const fn sequential() -> Self {
        Self::new(DEFAULT_MIN_WORK_QUANTUM, 1)
    }

    /// Return a copy with a different work quantum.
    pub const fn with_min_work_quantum(mut self, min_work_quantum: usize) -> Self {
        self.min_work_quantum = min_work_quantum;
        self
    }

    /// Return a copy with a different degree of parallelism.
    pub const fn with_degree_of_parallelism(mut self, degree_of_parallelism: usize) -> Self {
        self.degree_of_parallelism = degree_of_parallelism;
        self
    }

    /// Work quantum clamped to at least one element.
    #[inline]
    pub fn work_quantum(&self) -> usize {
        self.min_work_quantum.max(1)
    }

    /// Upper bound on the workers a parallel dispatch will use.
    #[inline]
    pub fn worker_count(&self) -> usize {
        let hardware = num_cpus::get().max(1);
        match self.degree_of_parallelism {
            0 => hardware,
            n => n.min(hardware),
        }
    }

    /// `len >= quantum && degree != 1`.
    #[inline]
    pub fn should_fork(&self, len: usize) -> bool {
        len >= self.work_quantum() && self.degree_of_parallelism != 1
    }

    /// Decide how a range of `len` elements is executed.
    pub fn decide(&self, len: usize) -> Dispatch {
        if self.should_fork(len) {
            Dispatch::Parallel {
                workers: self.worker_count().min(len),
            }
        } else {
            Dispatch::Sequential
        }
    }

    /// Read `{prefix}{scope}_MIN_WORK_QUANTUM` and `{prefix}{scope}_DEGREE`
    /// on top of `defaults`.
    ///
    /// A negative degree is clamped to automatic.
    pub fn from_env_scoped(prefix: &str, scope: &str, defaults: Self) -> Self {
        let min_work_quantum = parse_env_var(
            &format!("{}{}_MIN_WORK_QUANTUM", prefix, scope),
            defaults.min_work_quantum,
        );
        let degree: i64 = parse_env_var(
            &format!("{}{}_DEGREE", prefix, scope),
            defaults.degree_of_parallelism as i64,
        );
        Self {
            min_work_quantum,
            degree_of_parallelism: usize::try_from(degree).unwrap_or(0),
        }
    }
}

impl Config for ParallelConfig {
    /// Both knobs are clamped at dispatch, so every value is accepted.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let config = Self::from_env_scoped(prefix, "PARALLEL", Self::default());
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self::new(DETECT_MIN_WORK_QUANTUM, 0)
    }

    fn sequential_preset() -> Self {
        Self::sequential()
    }
}
