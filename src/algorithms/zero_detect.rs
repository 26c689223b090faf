//! Parallel zero and constant detection
//!
//! Decides whether every byte of a range equals zero (or a given constant).
//! Long ranges are split across workers; each worker runs the configured
//! [`DetectStrategy`] kernel on its piece and the per-piece answers are
//! combined with logical AND.

use crate::config::ZeroDetectConfig;
use crate::error::Result;
use crate::memory::{get_global_simd_ops, DetectStrategy, SimdMemOps, SimdTier};
use crate::parallel::{self, IndexRange, LogicalAnd};

/// Threshold-adaptive constant detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroDetector {
    config: ZeroDetectConfig,
    ops: SimdMemOps,
}

impl Default for ZeroDetector {
    fn default() -> Self {
        Self::new(ZeroDetectConfig::default())
    }
}

impl ZeroDetector {
    /// Create a detector. A pinned SIMD tier the CPU cannot run is clamped to
    /// the widest one it can.
    pub fn new(config: ZeroDetectConfig) -> Self {
        let ops = match config.simd_tier {
            Some(tier) => SimdMemOps::with_tier(tier),
            None => *get_global_simd_ops(),
        };
        Self { config, ops }
    }

    /// Active configuration.
    pub fn config(&self) -> &ZeroDetectConfig {
        &self.config
    }

    /// Tier the kernels run on.
    pub fn tier(&self) -> SimdTier {
        self.ops.tier()
    }

    /// Base-case strategy.
    pub fn strategy(&self) -> DetectStrategy {
        self.config.strategy
    }

    /// Whether `buffer[start..start + length]` is all zero bytes.
    ///
    /// The range is always validated, even when `length` is zero; an empty
    /// range that fits is vacuously zero.
    pub fn is_all_zero(&self, buffer: &[u8], start: usize, length: usize) -> Result<bool> {
        self.is_all_equal(buffer, start, length, 0)
    }

    /// Whether every byte of `buffer[start..start + length]` equals `value`.
    pub fn is_all_equal(
        &self,
        buffer: &[u8],
        start: usize,
        length: usize,
        value: u8,
    ) -> Result<bool> {
        let range = IndexRange::checked(start, length, buffer.len())?;
        self.detect(&buffer[range.as_range()], value)
    }

    /// Whether the whole slice is zero bytes.
    pub fn is_slice_zero(&self, buffer: &[u8]) -> Result<bool> {
        self.detect(buffer, 0)
    }

    /// Whether `values[start..start + length]` is all-zero bit patterns.
    ///
    /// `start` and `length` count elements, not bytes.
    pub fn is_zeroed<T: bytemuck::Pod + Sync>(
        &self,
        values: &[T],
        start: usize,
        length: usize,
    ) -> Result<bool> {
        let range = IndexRange::checked(start, length, values.len())?;
        self.detect(bytemuck::cast_slice(&values[range.as_range()]), 0)
    }

    fn detect(&self, bytes: &[u8], value: u8) -> Result<bool> {
        if bytes.is_empty() {
            return Ok(true);
        }
        let ops = self.ops;
        let strategy = self.config.strategy;
        Ok(parallel::execute(
            &self.config.parallel,
            self.config.discipline,
            bytes,
            |piece: &[u8]| ops.is_all_equal(piece, value, strategy),
            LogicalAnd,
        ))
    }
}

/// [`ZeroDetector::is_all_zero`] with the default configuration.
pub fn is_all_zero(buffer: &[u8], start: usize, length: usize) -> Result<bool> {
    ZeroDetector::default().is_all_zero(buffer, start, length)
}
