//! Validated half-open index ranges.

use super::Splittable;
use crate::error::{check_range, Result};
use std::ops::Range;

/// A half-open range `[start, start + len)` known to fit its backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexRange {
    start: usize,
    len: usize,
}

impl IndexRange {
    /// Validate `[start, start + length)` against `capacity`.
    ///
    /// Fails with [`MembandError::OutOfRange`](crate::error::MembandError::OutOfRange)
    /// when the range does not fit or `start + length` overflows.
    pub fn checked(start: usize, length: usize, capacity: usize) -> Result<Self> {
        check_range(start, length, capacity)?;
        Ok(Self { start, len: length })
    }

    /// First index.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last index.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Number of indices.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for an empty range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// As a `std` range.
    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Midpoint split; the left half takes the extra element of an odd range.
    pub fn halves(&self) -> (Self, Self) {
        let left = self.len - self.len / 2;
        (
            Self {
                start: self.start,
                len: left,
            },
            Self {
                start: self.start + left,
                len: self.len - left,
            },
        )
    }

    /// Cut into `pieces` contiguous ranges whose lengths differ by at most
    /// one, longer pieces first. `pieces` is clamped to `[1, len]` (an empty
    /// range yields itself).
    pub fn partition(&self, pieces: usize) -> Vec<Self> {
        let pieces = pieces.clamp(1, self.len.max(1));
        let base = self.len / pieces;
        let extra = self.len % pieces;
        let mut start = self.start;
        (0..pieces)
            .map(|i| {
                let len = base + usize::from(i < extra);
                let piece = Self { start, len };
                start += len;
                piece
            })
            .collect()
    }
}

impl Splittable for IndexRange {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn split_at(self, mid: usize) -> (Self, Self) {
        debug_assert!(mid <= self.len);
        (
            Self {
                start: self.start,
                len: mid,
            },
            Self {
                start: self.start + mid,
                len: self.len - mid,
            },
        )
    }
}
