//! Sequential byte kernels
//!
//! The leaf-level work each parallel operation performs on one sub-range:
//! vectorized copy, fill and constant detection, dispatched over the SIMD
//! tiers the running CPU supports.

pub mod simd_ops;
pub mod zero_detect;

pub use simd_ops::{get_global_simd_ops, SimdMemOps, SimdTier};
pub use zero_detect::{detect_scalar, DetectStrategy, BLOCK_STEPS};
