//! Parallel array copy
//!
//! Copies a range of one slice into another, or into a freshly allocated
//! vector, splitting the range across workers once it is long enough to pay
//! for the fork. Every worker writes a destination sub-range no other worker
//! touches, so no synchronization is needed beyond the final join.
//!
//! ```rust
//! use memband::algorithms::ParallelCopy;
//! use memband::config::{CopyConfig, ParallelConfig};
//!
//! # fn main() -> memband::Result<()> {
//! let src: Vec<u64> = (0..100_000).collect();
//! let mut dst = vec![0u64; 100_000];
//!
//! let copier = ParallelCopy::new(CopyConfig::halving(ParallelConfig::new(4096, 4)));
//! copier.copy(&src, 10, &mut dst, 0, 50_000)?;
//! assert_eq!(&dst[..50_000], &src[10..50_010]);
//! # Ok(())
//! # }
//! ```

use crate::config::{CopyConfig, ParallelConfig};
use crate::error::{MembandError, Result};
use crate::memory::{get_global_simd_ops, SimdMemOps};
use crate::parallel::{self, CopyJob, DisjointWrites, IndexRange};

/// Threshold-adaptive parallel copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParallelCopy {
    config: CopyConfig,
}

impl ParallelCopy {
    /// Create a copier with the given configuration.
    pub fn new(config: CopyConfig) -> Self {
        Self { config }
    }

    /// Flat-partition copier using `policy`.
    pub fn with_policy(policy: ParallelConfig) -> Self {
        Self::new(CopyConfig::flat(policy))
    }

    /// Active configuration.
    pub fn config(&self) -> &CopyConfig {
        &self.config
    }

    /// Copy `src[src_start..src_start + length]` into
    /// `dst[dst_start..dst_start + length]`.
    ///
    /// A zero `length` is a no-op and succeeds without looking at the starts.
    /// Otherwise both ranges are checked before any element is written, and a
    /// range that does not fit fails with [`MembandError::OutOfRange`],
    /// leaving `dst` untouched.
    pub fn copy<T>(
        &self,
        src: &[T],
        src_start: usize,
        dst: &mut [T],
        dst_start: usize,
        length: usize,
    ) -> Result<()>
    where
        T: Copy + Send + Sync,
    {
        let Some(job) = Self::job(src, src_start, dst, dst_start, length)? else {
            return Ok(());
        };
        parallel::execute(
            &self.config.parallel,
            self.config.discipline,
            job,
            CopyJob::copy_bulk,
            DisjointWrites,
        );
        Ok(())
    }

    /// Like [`ParallelCopy::copy`], but each piece goes through the
    /// vectorized byte kernel instead of `memcpy`.
    pub fn copy_simd<T>(
        &self,
        src: &[T],
        src_start: usize,
        dst: &mut [T],
        dst_start: usize,
        length: usize,
    ) -> Result<()>
    where
        T: bytemuck::Pod + Send + Sync,
    {
        let Some(job) = Self::job(src, src_start, dst, dst_start, length)? else {
            return Ok(());
        };
        let ops: &SimdMemOps = get_global_simd_ops();
        parallel::execute(
            &self.config.parallel,
            self.config.discipline,
            job,
            |piece: CopyJob<'_, T>| piece.copy_vectorized(ops),
            DisjointWrites,
        );
        Ok(())
    }

    /// Copy all of `src` into the front of `dst`.
    pub fn copy_all<T>(&self, src: &[T], dst: &mut [T]) -> Result<()>
    where
        T: Copy + Send + Sync,
    {
        self.copy(src, 0, dst, 0, src.len())
    }

    /// Copy all of `src` into `dst` starting at `dst_start`.
    pub fn copy_to<T>(&self, src: &[T], dst: &mut [T], dst_start: usize) -> Result<()>
    where
        T: Copy + Send + Sync,
    {
        self.copy(src, 0, dst, dst_start, src.len())
    }

    /// Copy `src[src_start..src_start + length]` into a new vector of exactly
    /// `length` elements.
    ///
    /// Allocation failure is reported as [`MembandError::OutOfMemory`].
    pub fn copy_to_new<T>(&self, src: &[T], src_start: usize, length: usize) -> Result<Vec<T>>
    where
        T: Copy + Send + Sync,
    {
        if length == 0 {
            return Ok(Vec::new());
        }
        let range = IndexRange::checked(src_start, length, src.len())?;

        let mut out: Vec<T> = Vec::new();
        out.try_reserve_exact(length).map_err(|_| {
            MembandError::out_of_memory(length.saturating_mul(std::mem::size_of::<T>()))
        })?;

        let job = CopyJob::uninit(&src[range.as_range()], &mut out.spare_capacity_mut()[..length])?;
        parallel::execute(
            &self.config.parallel,
            self.config.discipline,
            job,
            CopyJob::copy_bulk,
            DisjointWrites,
        );

        // SAFETY: the copy above initialized all `length` reserved elements.
        unsafe { out.set_len(length) };
        Ok(out)
    }

    fn job<'a, T: Copy>(
        src: &'a [T],
        src_start: usize,
        dst: &'a mut [T],
        dst_start: usize,
        length: usize,
    ) -> Result<Option<CopyJob<'a, T>>> {
        if length == 0 {
            return Ok(None);
        }
        let src_range = IndexRange::checked(src_start, length, src.len())?;
        let dst_range = IndexRange::checked(dst_start, length, dst.len())?;
        CopyJob::new(&src[src_range.as_range()], &mut dst[dst_range.as_range()]).map(Some)
    }
}

/// [`ParallelCopy::copy`] with the default configuration.
pub fn par_copy<T>(
    src: &[T],
    src_start: usize,
    dst: &mut [T],
    dst_start: usize,
    length: usize,
) -> Result<()>
where
    T: Copy + Send + Sync,
{
    ParallelCopy::default().copy(src, src_start, dst, dst_start, length)
}

/// [`ParallelCopy::copy_to_new`] with the default configuration.
pub fn par_copy_to_new<T>(src: &[T], src_start: usize, length: usize) -> Result<Vec<T>>
where
    T: Copy + Send + Sync,
{
    ParallelCopy::default().copy_to_new(src, src_start, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitDiscipline;

    fn copiers(quantum: usize) -> Vec<ParallelCopy> {
        let mut out = vec![ParallelCopy::new(CopyConfig::flat(ParallelConfig::sequential()))];
        for discipline in [SplitDiscipline::FlatPartition, SplitDiscipline::RecursiveHalving] {
            for degree in [0, 2, 8] {
                out.push(ParallelCopy::new(CopyConfig::new(
                    ParallelConfig::new(quantum, degree),
                    discipline,
                )));
            }
        }
        out
    }

    #[test]
    fn test_copy_small() {
        let src = [1, 2, 3, 4, 5];
        let mut dst = [0; 5];
        par_copy(&src, 0, &mut dst, 0, 5).unwrap();
        assert_eq!(dst, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_copy_offsets_every_policy() {
        let src: Vec<u32> = (0..10_000).collect();
        for copier in copiers(64) {
            let mut dst = vec![u32::MAX; 12_000];
            copier.copy(&src, 123, &mut dst, 1000, 9_000).unwrap();
            assert_eq!(&dst[1000..10_000], &src[123..9_123]);
            assert!(dst[..1000].iter().all(|&v| v == u32::MAX));
            assert!(dst[10_000..].iter().all(|&v| v == u32::MAX));
        }
    }

    #[test]
    fn test_zero_length_is_noop() {
        let src = [1u8; 4];
        let mut dst = [0u8; 4];
        // Starts past the end are not examined for an empty copy.
        ParallelCopy::default().copy(&src, 100, &mut dst, 100, 0).unwrap();
        assert_eq!(dst, [0u8; 4]);
        assert!(par_copy_to_new(&src, 100, 0).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_leaves_destination() {
        let src = [1u8, 2, 3];
        let mut dst = [9u8; 3];
        let err = par_copy(&src, 1, &mut dst, 0, 3).unwrap_err();
        assert!(matches!(err, MembandError::OutOfRange { start: 1, length: 3, capacity: 3 }));
        assert_eq!(dst, [9u8; 3]);

        let err = par_copy(&src, 0, &mut dst, 1, 3).unwrap_err();
        assert_eq!(err.category(), "range");
        assert_eq!(dst, [9u8; 3]);

        assert!(par_copy(&src, usize::MAX, &mut dst, 0, 2).is_err());
    }

    #[test]
    fn test_copy_to_new_every_policy() {
        let src: Vec<i64> = (0..50_000).map(|i| i * 3 - 7).collect();
        for copier in copiers(1000) {
            let out = copier.copy_to_new(&src, 5, 40_000).unwrap();
            assert_eq!(out.len(), 40_000);
            assert_eq!(out.capacity(), 40_000);
            assert_eq!(&out[..], &src[5..40_005]);
        }
        assert!(par_copy_to_new(&src, 49_999, 2).is_err());
    }

    #[test]
    fn test_copy_simd() {
        let src: Vec<u16> = (0..30_001).map(|i| i as u16).collect();
        for copier in copiers(128) {
            let mut dst = vec![0u16; 30_001];
            copier.copy_simd(&src, 1, &mut dst, 0, 30_000).unwrap();
            assert_eq!(&dst[..30_000], &src[1..]);
            assert_eq!(dst[30_000], 0);
        }
    }

    #[test]
    fn test_copy_all_and_copy_to() {
        let src = vec![7u8; 300];
        let mut dst = vec![0u8; 400];
        let copier = ParallelCopy::with_policy(ParallelConfig::new(16, 4));
        copier.copy_to(&src, &mut dst, 100).unwrap();
        assert!(dst[..100].iter().all(|&b| b == 0));
        assert!(dst[100..].iter().all(|&b| b == 7));

        let mut short = vec![0u8; 299];
        assert!(copier.copy_all(&src, &mut short).is_err());
    }
}
