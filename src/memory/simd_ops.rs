//! # SIMD Memory Operations
//!
//! Tier-dispatched byte kernels used as the sequential base cases of the
//! parallel operations: copy, fill and constant detection.
//!
//! ## Architecture
//! - **Runtime CPU detection**: the best tier is picked once per process
//! - **Multi-tier lanes**: AVX-512 → AVX2 → SSE2 → Scalar on x86_64,
//!   NEON → Scalar on aarch64
//! - **Clamped overrides**: a requested tier the CPU cannot run falls back to
//!   the next narrower one, so every [`SimdMemOps`] is safe to use
//! - **Safe public APIs** wrapping the unsafe per-tier implementations

use crate::error::{MembandError, Result};
use crate::memory::zero_detect::{self, DetectStrategy};
use crate::simd::{ByteVector, WordVector};
use crate::system::cpu_features::{get_cpu_features, CpuFeature};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ptr;
use std::str::FromStr;
use std::sync::OnceLock;

/// SIMD implementation tiers, ordered from narrowest to widest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimdTier {
    /// Portable word-at-a-time lanes (8-byte operations)
    Scalar,
    /// ARM NEON implementation (16-byte operations)
    Neon,
    /// SSE2 implementation (16-byte operations)
    Sse2,
    /// AVX2 implementation (32-byte operations)
    Avx2,
    /// AVX-512 implementation (64-byte operations)
    Avx512,
}

impl SimdTier {
    /// Preference order used by [`SimdTier::detect`].
    const PREFERENCE: [SimdTier; 5] = [
        SimdTier::Avx512,
        SimdTier::Avx2,
        SimdTier::Sse2,
        SimdTier::Neon,
        SimdTier::Scalar,
    ];

    /// Bytes processed per vector operation.
    pub const fn lane_width(self) -> usize {
        match self {
            SimdTier::Avx512 => 64,
            SimdTier::Avx2 => 32,
            SimdTier::Sse2 | SimdTier::Neon => 16,
            SimdTier::Scalar => 8,
        }
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SimdTier::Avx512 => "avx512",
            SimdTier::Avx2 => "avx2",
            SimdTier::Sse2 => "sse2",
            SimdTier::Neon => "neon",
            SimdTier::Scalar => "scalar",
        }
    }

    /// Whether this build and this CPU can execute the tier.
    pub fn is_supported(self) -> bool {
        match self {
            SimdTier::Scalar => true,
            SimdTier::Sse2 => {
                cfg!(all(feature = "simd", target_arch = "x86_64"))
                    && get_cpu_features().has_feature(CpuFeature::SSE2)
            }
            SimdTier::Avx2 => {
                cfg!(all(feature = "simd", target_arch = "x86_64"))
                    && get_cpu_features().has_feature(CpuFeature::AVX2)
            }
            SimdTier::Avx512 => {
                let features = get_cpu_features();
                cfg!(all(feature = "avx512", target_arch = "x86_64"))
                    && features.has_feature(CpuFeature::AVX512F)
                    && features.has_feature(CpuFeature::AVX512BW)
            }
            SimdTier::Neon => {
                cfg!(all(feature = "simd", target_arch = "aarch64"))
                    && get_cpu_features().has_feature(CpuFeature::NEON)
            }
        }
    }

    /// The widest supported tier.
    pub fn detect() -> SimdTier {
        Self::PREFERENCE
            .into_iter()
            .find(|tier| tier.is_supported())
            .unwrap_or(SimdTier::Scalar)
    }

    /// Every tier executable here, narrowest first.
    pub fn available() -> Vec<SimdTier> {
        let mut tiers: Vec<SimdTier> = Self::PREFERENCE
            .into_iter()
            .filter(|tier| tier.is_supported())
            .collect();
        tiers.sort();
        tiers
    }

    /// Next narrower tier on the same architecture.
    fn narrower(self) -> SimdTier {
        match self {
            SimdTier::Avx512 => SimdTier::Avx2,
            SimdTier::Avx2 => SimdTier::Sse2,
            SimdTier::Sse2 | SimdTier::Neon | SimdTier::Scalar => SimdTier::Scalar,
        }
    }

    /// Clamp a requested tier down to one this CPU supports.
    pub fn clamp(self) -> SimdTier {
        let mut tier = self;
        while !tier.is_supported() {
            tier = tier.narrower();
        }
        tier
    }
}

impl fmt::Display for SimdTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimdTier {
    type Err = MembandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "avx512" => Ok(SimdTier::Avx512),
            "avx2" => Ok(SimdTier::Avx2),
            "sse2" => Ok(SimdTier::Sse2),
            "neon" => Ok(SimdTier::Neon),
            "scalar" | "none" => Ok(SimdTier::Scalar),
            _ => Err(MembandError::configuration(format!("unknown SIMD tier '{}'", s))),
        }
    }
}

/// SIMD memory operations dispatcher.
///
/// The tier held by a `SimdMemOps` is always supported by the running CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdMemOps {
    tier: SimdTier,
}

impl SimdMemOps {
    /// Create an instance using the widest supported tier.
    pub fn new() -> Self {
        Self {
            tier: SimdTier::detect(),
        }
    }

    /// Create an instance pinned to `tier`, clamped to what the CPU supports.
    pub fn with_tier(tier: SimdTier) -> Self {
        let clamped = tier.clamp();
        if clamped != tier {
            log::debug!("SIMD tier {} unsupported here, using {}", tier, clamped);
        }
        Self { tier: clamped }
    }

    /// Get the currently selected SIMD tier
    pub fn tier(&self) -> SimdTier {
        self.tier
    }
}

impl Default for SimdMemOps {
    fn default() -> Self {
        Self::new()
    }
}

//==============================================================================
// PUBLIC SAFE APIS
//==============================================================================

impl SimdMemOps {
    /// Copy `src` into `dst` using vector loads and stores.
    ///
    /// Returns [`MembandError::InvalidData`] when the lengths differ.
    pub fn copy_nonoverlapping(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        if src.len() != dst.len() {
            return Err(MembandError::invalid_data(format!(
                "Source and destination lengths don't match: {} vs {}",
                src.len(),
                dst.len()
            )));
        }
        // SAFETY: `&[u8]` and `&mut [u8]` cannot alias and both cover `len` bytes.
        unsafe { self.copy_raw(dst.as_mut_ptr(), src.as_ptr(), src.len()) };
        Ok(())
    }

    /// Set every byte of `slice` to `value`.
    pub fn fill(&self, slice: &mut [u8], value: u8) {
        // SAFETY: the slice covers `len` writable bytes.
        unsafe { self.memset_raw(slice.as_mut_ptr(), value, slice.len()) }
    }

    /// Whether every byte of `bytes` equals `value`.
    pub fn is_all_equal(&self, bytes: &[u8], value: u8, strategy: DetectStrategy) -> bool {
        // SAFETY: `self.tier` is always supported (see `with_tier`).
        unsafe { zero_detect::detect_with_tier(self.tier, bytes, value, strategy) }
    }

    /// Whether every byte of `bytes` is zero.
    #[inline]
    pub fn is_all_zero(&self, bytes: &[u8], strategy: DetectStrategy) -> bool {
        self.is_all_equal(bytes, 0, strategy)
    }
}

//==============================================================================
// INTERNAL DISPATCH
//==============================================================================

impl SimdMemOps {
    /// Tier-dispatched memcpy.
    ///
    /// # Safety
    ///
    /// `src` must be readable and `dst` writable for `len` bytes, and the two
    /// ranges must not overlap.
    pub(crate) unsafe fn copy_raw(&self, dst: *mut u8, src: *const u8, len: usize) {
        if len < self.tier.lane_width() {
            unsafe { ptr::copy_nonoverlapping(src, dst, len) };
            return;
        }
        match self.tier {
            #[cfg(all(feature = "avx512", target_arch = "x86_64"))]
            SimdTier::Avx512 => unsafe { x86::avx512_memcpy(dst, src, len) },
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            SimdTier::Avx2 => unsafe { x86::avx2_memcpy(dst, src, len) },
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            SimdTier::Sse2 => unsafe { x86::sse2_memcpy(dst, src, len) },
            #[cfg(all(feature = "simd", target_arch = "aarch64"))]
            SimdTier::Neon => unsafe { arm::neon_memcpy(dst, src, len) },
            _ => unsafe { copy_lanes::<WordVector>(dst, src, len) },
        }
    }

    /// Tier-dispatched memset.
    ///
    /// # Safety
    ///
    /// `dst` must be writable for `len` bytes.
    unsafe fn memset_raw(&self, dst: *mut u8, value: u8, len: usize) {
        if len < self.tier.lane_width() {
            unsafe { ptr::write_bytes(dst, value, len) };
            return;
        }
        match self.tier {
            #[cfg(all(feature = "avx512", target_arch = "x86_64"))]
            SimdTier::Avx512 => unsafe { x86::avx512_memset(dst, value, len) },
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            SimdTier::Avx2 => unsafe { x86::avx2_memset(dst, value, len) },
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            SimdTier::Sse2 => unsafe { x86::sse2_memset(dst, value, len) },
            #[cfg(all(feature = "simd", target_arch = "aarch64"))]
            SimdTier::Neon => unsafe { arm::neon_memset(dst, value, len) },
            _ => unsafe { set_lanes::<WordVector>(dst, value, len) },
        }
    }
}

/// Copy full vectors, then the tail byte by byte.
#[inline(always)]
unsafe fn copy_lanes<V: ByteVector>(mut dst: *mut u8, mut src: *const u8, mut len: usize) {
    while len >= V::WIDTH {
        unsafe {
            V::load(src).store(dst);
            src = src.add(V::WIDTH);
            dst = dst.add(V::WIDTH);
        }
        len -= V::WIDTH;
    }
    if len > 0 {
        unsafe { ptr::copy_nonoverlapping(src, dst, len) };
    }
}

#[inline(always)]
unsafe fn set_lanes<V: ByteVector>(mut dst: *mut u8, value: u8, mut len: usize) {
    let pattern = V::splat(value);
    while len >= V::WIDTH {
        unsafe {
            pattern.store(dst);
            dst = dst.add(V::WIDTH);
        }
        len -= V::WIDTH;
    }
    if len > 0 {
        unsafe { ptr::write_bytes(dst, value, len) };
    }
}

//==============================================================================
// x86_64 IMPLEMENTATIONS
//==============================================================================

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod x86 {
    use super::{copy_lanes, set_lanes};
    use crate::simd::{Avx2Vector, Sse2Vector};

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn sse2_memcpy(dst: *mut u8, src: *const u8, len: usize) {
        unsafe { copy_lanes::<Sse2Vector>(dst, src, len) }
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn sse2_memset(dst: *mut u8, value: u8, len: usize) {
        unsafe { set_lanes::<Sse2Vector>(dst, value, len) }
    }

    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn avx2_memcpy(dst: *mut u8, src: *const u8, len: usize) {
        unsafe { copy_lanes::<Avx2Vector>(dst, src, len) }
    }

    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn avx2_memset(dst: *mut u8, value: u8, len: usize) {
        unsafe { set_lanes::<Avx2Vector>(dst, value, len) }
    }

    #[cfg(feature = "avx512")]
    #[target_feature(enable = "avx512f,avx512bw")]
    pub(super) unsafe fn avx512_memcpy(dst: *mut u8, src: *const u8, len: usize) {
        unsafe { copy_lanes::<crate::simd::Avx512Vector>(dst, src, len) }
    }

    #[cfg(feature = "avx512")]
    #[target_feature(enable = "avx512f,avx512bw")]
    pub(super) unsafe fn avx512_memset(dst: *mut u8, value: u8, len: usize) {
        unsafe { set_lanes::<crate::simd::Avx512Vector>(dst, value, len) }
    }
}

//==============================================================================
// aarch64 IMPLEMENTATIONS
//==============================================================================

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
mod arm {
    use super::{copy_lanes, set_lanes};
    use crate::simd::NeonVector;

    #[target_feature(enable = "neon")]
    pub(super) unsafe fn neon_memcpy(dst: *mut u8, src: *const u8, len: usize) {
        unsafe { copy_lanes::<NeonVector>(dst, src, len) }
    }

    #[target_feature(enable = "neon")]
    pub(super) unsafe fn neon_memset(dst: *mut u8, value: u8, len: usize) {
        unsafe { set_lanes::<NeonVector>(dst, value, len) }
    }
}

//==============================================================================
// DEFAULT INSTANCE
//==============================================================================

static GLOBAL_SIMD_OPS: OnceLock<SimdMemOps> = OnceLock::new();

/// Get the process-wide instance using the detected tier
pub fn get_global_simd_ops() -> &'static SimdMemOps {
    GLOBAL_SIMD_OPS.get_or_init(SimdMemOps::new)
}
