//! # Fork-Join Range Splitting
//!
//! Every parallel operation is a [`Splittable`] work item, a sequential
//! kernel for one piece of it, and a [`Combiner`] for the kernel results.
//! A [`RangeProcessor`] decides how the item is cut up:
//!
//! - [`Sequential`]: one kernel call on the caller's thread
//! - [`FlatPartition`]: a fixed number of contiguous chunks, all scheduled at
//!   once, no recursion
//! - [`RecursiveHalving`]: cut at the midpoint until pieces fall below the
//!   work quantum, halves run through `rayon::join`
//!
//! [`execute`] ties these to a [`ParallelConfig`]: it asks the policy whether
//! to fork and picks the processor for the requested [`SplitDiscipline`].
//! Forked pieces run on the global rayon pool, and the processor never lets
//! more than the policy's worker count run at once. The call returns only
//! after every forked piece has finished.

use crate::config::{Dispatch, ParallelConfig, SplitDiscipline};
use crate::error::{MembandError, Result};
use std::mem::MaybeUninit;
use std::ptr;

pub mod combine;
pub mod processor;
pub mod range;

pub use combine::{Combiner, DisjointWrites, LogicalAnd};
pub use processor::{FlatPartition, RangeProcessor, RecursiveHalving, Sequential};
pub use range::IndexRange;

/// A unit of work that can be cut in two at an element offset.
pub trait Splittable: Sized + Send {
    /// Number of elements covered.
    fn len(&self) -> usize;

    /// True when no elements are covered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into `[0, mid)` and `[mid, len)`.
    fn split_at(self, mid: usize) -> (Self, Self);
}

impl<T: Sync> Splittable for &[T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn split_at(self, mid: usize) -> (Self, Self) {
        <[T]>::split_at(self, mid)
    }
}

impl<T: Send> Splittable for &mut [T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn split_at(self, mid: usize) -> (Self, Self) {
        self.split_at_mut(mid)
    }
}

/// Source and destination of a copy, split together so that every piece
/// writes a destination range no other piece touches.
pub struct CopyJob<'a, T> {
    src: &'a [T],
    dst: &'a mut [MaybeUninit<T>],
}

impl<'a, T: Copy> CopyJob<'a, T> {
    /// Pair an initialized destination with a source of the same length.
    pub fn new(src: &'a [T], dst: &'a mut [T]) -> Result<Self> {
        // SAFETY: `MaybeUninit<T>` has the layout of `T`, and a `CopyJob` only
        // ever writes initialized `T` values through `dst`.
        let dst = unsafe { &mut *(dst as *mut [T] as *mut [MaybeUninit<T>]) };
        Self::uninit(src, dst)
    }

    /// Pair a possibly uninitialized destination with a source of the same
    /// length. After [`CopyJob::copy_bulk`] every element of `dst` is
    /// initialized.
    pub fn uninit(src: &'a [T], dst: &'a mut [MaybeUninit<T>]) -> Result<Self> {
        if src.len() != dst.len() {
            return Err(MembandError::invalid_data(format!(
                "copy source has {} elements but destination has {}",
                src.len(),
                dst.len()
            )));
        }
        Ok(Self { src, dst })
    }

    /// Copy this piece with the bulk memcpy kernel.
    #[inline]
    pub fn copy_bulk(self) {
        // SAFETY: lengths are equal by construction, `&` and `&mut` cannot
        // alias, and `T: Copy` means a bitwise copy is a valid value.
        unsafe {
            ptr::copy_nonoverlapping(
                self.src.as_ptr(),
                self.dst.as_mut_ptr().cast::<T>(),
                self.src.len(),
            )
        }
    }
}

impl<'a, T: bytemuck::Pod> CopyJob<'a, T> {
    /// Copy this piece with the vectorized byte kernel.
    #[inline]
    pub fn copy_vectorized(self, ops: &crate::memory::SimdMemOps) {
        let bytes = std::mem::size_of_val(self.src);
        // SAFETY: `T: Pod` has no padding, so every source byte is initialized;
        // both regions cover `bytes` bytes and cannot overlap.
        unsafe {
            ops.copy_raw(
                self.dst.as_mut_ptr().cast::<u8>(),
                self.src.as_ptr().cast::<u8>(),
                bytes,
            )
        }
    }
}

impl<'a, T: Copy + Send + Sync> Splittable for CopyJob<'a, T> {
    #[inline]
    fn len(&self) -> usize {
        self.src.len()
    }

    #[inline]
    fn split_at(self, mid: usize) -> (Self, Self) {
        let (src_left, src_right) = self.src.split_at(mid);
        let (dst_left, dst_right) = self.dst.split_at_mut(mid);
        (
            Self {
                src: src_left,
                dst: dst_left,
            },
            Self {
                src: src_right,
                dst: dst_right,
            },
        )
    }
}

/// Run `kernel` over `work` as `policy` and `discipline` dictate.
pub fn execute<W, R, K, C>(
    policy: &ParallelConfig,
    discipline: SplitDiscipline,
    work: W,
    kernel: K,
    combiner: C,
) -> R
where
    W: Splittable,
    R: Send,
    K: Fn(W) -> R + Sync,
    C: Combiner<R>,
{
    let len = work.len();
    match policy.decide(len) {
        Dispatch::Sequential => {
            log::trace!("sequential dispatch: {} elements", len);
            Sequential.process(work, &kernel, &combiner)
        }
        Dispatch::Parallel { workers } => {
            log::trace!(
                "parallel dispatch: {} elements, {} workers, {} split",
                len,
                workers,
                discipline
            );
            match discipline {
                SplitDiscipline::FlatPartition => {
                    FlatPartition::for_workers(workers).process(work, &kernel, &combiner)
                }
                SplitDiscipline::RecursiveHalving => RecursiveHalving::new(policy.work_quantum())
                    .with_workers(workers)
                    .process(work, &kernel, &combiner),
            }
        }
    }
}
