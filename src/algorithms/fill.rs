//! Parallel constant fill.

use crate::config::FillConfig;
use crate::error::Result;
use crate::memory::{get_global_simd_ops, SimdMemOps};
use crate::parallel::{self, DisjointWrites, IndexRange};

/// Threshold-adaptive fill of a slice range with one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParallelFill {
    config: FillConfig,
}

impl ParallelFill {
    /// Create a filler with the given configuration.
    pub fn new(config: FillConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Set `array[start..start + length]` to `value`.
    ///
    /// A zero `length` is a no-op; otherwise an out-of-range request fails
    /// before anything is written.
    pub fn fill<T>(&self, array: &mut [T], value: T, start: usize, length: usize) -> Result<()>
    where
        T: Copy + Send + Sync,
    {
        if length == 0 {
            return Ok(());
        }
        let range = IndexRange::checked(start, length, array.len())?;
        parallel::execute(
            &self.config.parallel,
            self.config.discipline,
            &mut array[range.as_range()],
            |piece: &mut [T]| piece.fill(value),
            DisjointWrites,
        );
        Ok(())
    }

    /// Byte fill through the vectorized memset kernel.
    pub fn fill_bytes(&self, array: &mut [u8], value: u8, start: usize, length: usize) -> Result<()> {
        if length == 0 {
            return Ok(());
        }
        let range = IndexRange::checked(start, length, array.len())?;
        let ops: &SimdMemOps = get_global_simd_ops();
        parallel::execute(
            &self.config.parallel,
            self.config.discipline,
            &mut array[range.as_range()],
            |piece: &mut [u8]| ops.fill(piece, value),
            DisjointWrites,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParallelConfig;

    #[test]
    fn test_fill_range() {
        let filler = ParallelFill::new(FillConfig {
            parallel: ParallelConfig::new(64, 4),
            ..FillConfig::default()
        });
        let mut data = vec![0i32; 10_000];
        filler.fill(&mut data, -5, 100, 9_000).unwrap();
        assert!(data[..100].iter().all(|&v| v == 0));
        assert!(data[100..9_100].iter().all(|&v| v == -5));
        assert!(data[9_100..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_fill_bytes() {
        let filler = ParallelFill::default();
        let mut data = vec![0u8; 40_000];
        filler.fill_bytes(&mut data, 0x3C, 1, 39_998).unwrap();
        assert_eq!(data[0], 0);
        assert_eq!(data[39_999], 0);
        assert!(data[1..39_999].iter().all(|&b| b == 0x3C));
    }

    #[test]
    fn test_fill_out_of_range() {
        let mut data = vec![1u8; 10];
        let filler = ParallelFill::default();
        assert!(filler.fill(&mut data, 0, 5, 6).is_err());
        assert!(filler.fill_bytes(&mut data, 0, 11, 1).is_err());
        assert!(filler.fill(&mut data, 0, 11, 0).is_ok());
        assert_eq!(data, vec![1u8; 10]);
    }
}
