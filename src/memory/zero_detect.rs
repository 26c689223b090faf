//! # Constant-Detection Kernels
//!
//! Sequential base cases that decide whether every byte of a slice equals a
//! target value. All strategies share the same shape:
//!
//! 1. a vectorized body over as many full vectors as the strategy consumes
//!    per step,
//! 2. a single-vector loop over full vectors the body left behind,
//! 3. a byte loop over the final `len % WIDTH` bytes,
//!
//! and every partial result is folded with OR before the final test, so a
//! non-matching byte anywhere (including the very last one) is observed.
//!
//! A zero target uses the loaded bytes directly; any other target XORs each
//! load with a broadcast pattern first, which turns "equal to `value`" into
//! "zero".

use crate::error::{MembandError, Result};
use crate::memory::simd_ops::SimdTier;
use crate::simd::{ByteVector, WordVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Steps of four vectors folded before [`DetectStrategy::Blocked`] tests.
pub const BLOCK_STEPS: usize = 128;

/// Base-case kernel variant for constant detection.
///
/// Every strategy returns the same answer for the same input; they differ only
/// in how often they branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectStrategy {
    /// One vector per step, testing after every load
    EarlyExit,
    /// Two vectors OR-ed per step, one test per step
    Unrolled2,
    /// Four vectors OR-ed per step, one test per step
    #[default]
    Unrolled4,
    /// Four independent accumulators, no branch until the end
    Accumulate4,
    /// Unrolled-by-four body over blocks of [`BLOCK_STEPS`] steps, one test
    /// per block
    Blocked,
}

impl DetectStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [DetectStrategy; 5] = [
        Self::EarlyExit,
        Self::Unrolled2,
        Self::Unrolled4,
        Self::Accumulate4,
        Self::Blocked,
    ];

    /// Stable name used in environment variables and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EarlyExit => "early_exit",
            Self::Unrolled2 => "unrolled2",
            Self::Unrolled4 => "unrolled4",
            Self::Accumulate4 => "accumulate4",
            Self::Blocked => "blocked",
        }
    }

    /// Vectors consumed per step of the main body.
    pub fn vectors_per_step(&self) -> usize {
        match self {
            Self::EarlyExit => 1,
            Self::Unrolled2 => 2,
            Self::Unrolled4 | Self::Accumulate4 | Self::Blocked => 4,
        }
    }
}

impl fmt::Display for DetectStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectStrategy {
    type Err = MembandError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "early_exit" | "earlyexit" | "simple" => Ok(Self::EarlyExit),
            "unrolled2" | "unrolled_2" => Ok(Self::Unrolled2),
            "unrolled4" | "unrolled_4" | "unrolled" => Ok(Self::Unrolled4),
            "accumulate4" | "accumulate_4" | "accumulate" => Ok(Self::Accumulate4),
            "blocked" | "block" => Ok(Self::Blocked),
            _ => Err(MembandError::configuration(format!(
                "unknown detection strategy '{}'",
                s
            ))),
        }
    }
}

//==============================================================================
// PROBES
//==============================================================================

/// Maps loaded data to "zero means match".
trait Probe<V: ByteVector> {
    fn vector(&self, v: V) -> V;
    fn byte(&self, b: u8) -> u8;
}

struct ZeroProbe;

impl<V: ByteVector> Probe<V> for ZeroProbe {
    #[inline(always)]
    fn vector(&self, v: V) -> V {
        v
    }

    #[inline(always)]
    fn byte(&self, b: u8) -> u8 {
        b
    }
}

struct ConstProbe<V> {
    pattern: V,
    value: u8,
}

impl<V: ByteVector> ConstProbe<V> {
    #[inline(always)]
    fn new(value: u8) -> Self {
        Self {
            pattern: V::splat(value),
            value,
        }
    }
}

impl<V: ByteVector> Probe<V> for ConstProbe<V> {
    #[inline(always)]
    fn vector(&self, v: V) -> V {
        v.xor(self.pattern)
    }

    #[inline(always)]
    fn byte(&self, b: u8) -> u8 {
        b ^ self.value
    }
}

//==============================================================================
// GENERIC KERNELS
//==============================================================================

#[inline(always)]
fn load<V: ByteVector, P: Probe<V>>(probe: &P, chunk: &[u8], index: usize) -> V {
    debug_assert!(chunk.len() >= (index + 1) * V::WIDTH);
    // SAFETY: callers hand in chunks produced by `chunks_exact` whose length
    // covers `index + 1` vectors.
    probe.vector(unsafe { V::load(chunk.as_ptr().add(index * V::WIDTH)) })
}

#[inline(always)]
fn fold_tail<V: ByteVector, P: Probe<V>>(acc: V, tail: &[u8], probe: &P) -> bool {
    let overall = tail
        .iter()
        .fold(acc.fold_or(), |bits, &b| bits | probe.byte(b));
    overall == 0
}

#[inline(always)]
fn early_exit<V: ByteVector, P: Probe<V>>(bytes: &[u8], probe: &P) -> bool {
    let mut acc = V::zero();
    let mut vectors = bytes.chunks_exact(V::WIDTH);
    for chunk in &mut vectors {
        let v = load::<V, P>(probe, chunk, 0);
        if !v.is_zero() {
            return false;
        }
        acc = acc.or(v);
    }
    fold_tail(acc, vectors.remainder(), probe)
}

#[inline(always)]
fn unrolled<V: ByteVector, P: Probe<V>, const K: usize>(bytes: &[u8], probe: &P) -> bool {
    let mut steps = bytes.chunks_exact(V::WIDTH * K);
    for chunk in &mut steps {
        let mut merged = load::<V, P>(probe, chunk, 0);
        for k in 1..K {
            merged = merged.or(load::<V, P>(probe, chunk, k));
        }
        if !merged.is_zero() {
            return false;
        }
    }
    early_exit::<V, P>(steps.remainder(), probe)
}

#[inline(always)]
fn accumulate4<V: ByteVector, P: Probe<V>>(bytes: &[u8], probe: &P) -> bool {
    let (mut a0, mut a1, mut a2, mut a3) = (V::zero(), V::zero(), V::zero(), V::zero());
    let mut steps = bytes.chunks_exact(V::WIDTH * 4);
    for chunk in &mut steps {
        a0 = a0.or(load::<V, P>(probe, chunk, 0));
        a1 = a1.or(load::<V, P>(probe, chunk, 1));
        a2 = a2.or(load::<V, P>(probe, chunk, 2));
        a3 = a3.or(load::<V, P>(probe, chunk, 3));
    }
    let mut acc = a0.or(a1).or(a2.or(a3));

    let mut vectors = steps.remainder().chunks_exact(V::WIDTH);
    for chunk in &mut vectors {
        acc = acc.or(load::<V, P>(probe, chunk, 0));
    }
    fold_tail(acc, vectors.remainder(), probe)
}

#[inline(always)]
fn blocked<V: ByteVector, P: Probe<V>>(bytes: &[u8], probe: &P) -> bool {
    let mut blocks = bytes.chunks_exact(V::WIDTH * 4 * BLOCK_STEPS);
    for block in &mut blocks {
        let mut acc = V::zero();
        for chunk in block.chunks_exact(V::WIDTH * 4) {
            acc = acc
                .or(load::<V, P>(probe, chunk, 0))
                .or(load::<V, P>(probe, chunk, 1))
                .or(load::<V, P>(probe, chunk, 2))
                .or(load::<V, P>(probe, chunk, 3));
        }
        if !acc.is_zero() {
            return false;
        }
    }
    unrolled::<V, P, 4>(blocks.remainder(), probe)
}

#[inline(always)]
fn run_probe<V: ByteVector, P: Probe<V>>(bytes: &[u8], probe: &P, strategy: DetectStrategy) -> bool {
    match strategy {
        DetectStrategy::EarlyExit => early_exit::<V, P>(bytes, probe),
        DetectStrategy::Unrolled2 => unrolled::<V, P, 2>(bytes, probe),
        DetectStrategy::Unrolled4 => unrolled::<V, P, 4>(bytes, probe),
        DetectStrategy::Accumulate4 => accumulate4::<V, P>(bytes, probe),
        DetectStrategy::Blocked => blocked::<V, P>(bytes, probe),
    }
}

#[inline(always)]
fn run<V: ByteVector>(bytes: &[u8], value: u8, strategy: DetectStrategy) -> bool {
    if value == 0 {
        run_probe::<V, _>(bytes, &ZeroProbe, strategy)
    } else {
        run_probe::<V, _>(bytes, &ConstProbe::<V>::new(value), strategy)
    }
}

//==============================================================================
// PER-TIER ENTRY POINTS
//==============================================================================

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod x86 {
    use super::{run, DetectStrategy};
    use crate::simd::{Avx2Vector, Sse2Vector};

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn detect_sse2(bytes: &[u8], value: u8, strategy: DetectStrategy) -> bool {
        run::<Sse2Vector>(bytes, value, strategy)
    }

    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn detect_avx2(bytes: &[u8], value: u8, strategy: DetectStrategy) -> bool {
        run::<Avx2Vector>(bytes, value, strategy)
    }

    #[cfg(feature = "avx512")]
    #[target_feature(enable = "avx512f,avx512bw")]
    pub(super) unsafe fn detect_avx512(
        bytes: &[u8],
        value: u8,
        strategy: DetectStrategy,
    ) -> bool {
        run::<crate::simd::Avx512Vector>(bytes, value, strategy)
    }
}

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
mod arm {
    use super::{run, DetectStrategy};
    use crate::simd::NeonVector;

    #[target_feature(enable = "neon")]
    pub(super) unsafe fn detect_neon(bytes: &[u8], value: u8, strategy: DetectStrategy) -> bool {
        run::<NeonVector>(bytes, value, strategy)
    }
}

/// Portable word-at-a-time detection.
pub fn detect_scalar(bytes: &[u8], value: u8, strategy: DetectStrategy) -> bool {
    run::<WordVector>(bytes, value, strategy)
}

/// Run `strategy` on `tier` lanes.
///
/// # Safety
///
/// `tier` must be supported by the running CPU ([`SimdTier::is_supported`]).
pub(crate) unsafe fn detect_with_tier(
    tier: SimdTier,
    bytes: &[u8],
    value: u8,
    strategy: DetectStrategy,
) -> bool {
    match tier {
        #[cfg(all(feature = "avx512", target_arch = "x86_64"))]
        SimdTier::Avx512 => unsafe { x86::detect_avx512(bytes, value, strategy) },
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        SimdTier::Avx2 => unsafe { x86::detect_avx2(bytes, value, strategy) },
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        SimdTier::Sse2 => unsafe { x86::detect_sse2(bytes, value, strategy) },
        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        SimdTier::Neon => unsafe { arm::detect_neon(bytes, value, strategy) },
        _ => detect_scalar(bytes, value, strategy),
    }
}
