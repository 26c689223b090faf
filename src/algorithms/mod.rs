//! Parallel array primitives
//!
//! The public operations: copy a range, copy a range into a new vector,
//! detect an all-zero or all-constant range, and fill a range. Each one
//! validates its arguments, asks its [`ParallelConfig`](crate::config::ParallelConfig)
//! whether the range is long enough to fork, and runs its sequential kernel
//! either once or on every piece of the split range.

pub mod copy;
pub mod fill;
pub mod zero_detect;

pub use copy::{par_copy, par_copy_to_new, ParallelCopy};
pub use fill::ParallelFill;
pub use zero_detect::{is_all_zero, ZeroDetector};
