//! # Memband: Bandwidth-Bound Parallel Array Primitives
//!
//! Copy, fill and zero/constant detection over large arrays, dispatched
//! between a sequential SIMD kernel and a fork-join split across worker
//! threads depending on how much work the call carries.
//!
//! ## Key Features
//!
//! - **Work-quantum policy**: a range forks only when it is at least
//!   `min_work_quantum` elements long and the degree of parallelism is not 1
//! - **Two splitting disciplines**: flat partition into a few chunks per
//!   worker, or recursive halving down to the work quantum
//! - **SIMD base cases**: AVX-512, AVX2, SSE2, NEON and portable word lanes,
//!   selected at runtime
//! - **Interchangeable detection strategies**: early-exit, unrolled,
//!   accumulator-only and blocked kernels that always agree on the answer
//! - **All-or-nothing errors**: ranges are validated before any work is
//!   scheduled, so a failed call never writes to its destination
//!
//! ## Quick Start
//!
//! ```rust
//! use memband::{is_all_zero, par_copy, par_copy_to_new};
//!
//! # fn main() -> memband::Result<()> {
//! let src = [1, 2, 3, 4, 5];
//! let mut dst = [0; 5];
//! par_copy(&src, 0, &mut dst, 0, 5)?;
//! assert_eq!(dst, [1, 2, 3, 4, 5]);
//!
//! let tail = par_copy_to_new(&src, 2, 3)?;
//! assert_eq!(tail, vec![3, 4, 5]);
//!
//! let mut buf = vec![0u8; 100_000];
//! assert!(is_all_zero(&buf, 0, buf.len())?);
//! buf[99_999] = 1;
//! assert!(!is_all_zero(&buf, 0, buf.len())?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Tuning
//!
//! ```rust
//! use memband::{DetectStrategy, ParallelConfig, ZeroDetectConfig, ZeroDetector};
//!
//! # fn main() -> memband::Result<()> {
//! let detector = ZeroDetector::new(
//!     ZeroDetectConfig::default()
//!         .with_parallel(ParallelConfig::new(1, 8))
//!         .with_strategy(DetectStrategy::Accumulate4),
//! );
//! assert!(detector.is_slice_zero(&[0u8; 4096])?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod algorithms;
pub mod config;
pub mod error;
pub mod memory;
pub mod parallel;
pub(crate) mod simd;
pub mod system;

// Re-export core types
pub use error::{MembandError, Result};

pub use algorithms::{
    is_all_zero, par_copy, par_copy_to_new, ParallelCopy, ParallelFill, ZeroDetector,
};
pub use config::{
    Config, CopyConfig, FillConfig, ParallelConfig, SplitDiscipline, ZeroDetectConfig,
};
pub use memory::{DetectStrategy, SimdMemOps, SimdTier};
pub use parallel::{FlatPartition, RangeProcessor, RecursiveHalving, Sequential, Splittable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version and the hardware it will run on.
///
/// Calling this is optional; every operation detects what it needs lazily.
pub fn init() {
    let features = system::get_cpu_features();
    log::debug!(
        "Initializing memband v{}: {} tier, {} logical cores, {}-byte cache lines ({} {})",
        VERSION,
        SimdTier::detect(),
        features.logical_cores,
        features.cache_line_size,
        features.vendor,
        features.model
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        init();
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_info() {
        // Version should be semver format like "0.1.0"
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2);
    }

    #[test]
    fn test_root_reexports() {
        let src = vec![3u8; 20_000];
        let mut dst = vec![0u8; 20_000];
        par_copy(&src, 0, &mut dst, 0, 20_000).unwrap();
        assert!(!is_all_zero(&dst, 0, dst.len()).unwrap());
        ParallelFill::default().fill_bytes(&mut dst, 0, 0, 20_000).unwrap();
        assert!(ZeroDetector::default().is_slice_zero(&dst).unwrap());
    }
}
