//! Lane implementations.
//!
//! The x86 and NEON lane types wrap raw intrinsics. Their methods are only
//! sound when executed on a CPU with the matching feature, which is why the
//! types are crate-private and only constructed inside `#[target_feature]`
//! functions reached after runtime detection.

/// A fixed-width vector of bytes.
pub(crate) trait ByteVector: Copy {
    /// Number of bytes in one vector.
    const WIDTH: usize;

    /// All lanes zero.
    fn zero() -> Self;

    /// Every lane set to `byte`.
    fn splat(byte: u8) -> Self;

    /// Unaligned load of `WIDTH` bytes.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `WIDTH` bytes.
    unsafe fn load(ptr: *const u8) -> Self;

    /// Unaligned store of `WIDTH` bytes.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `WIDTH` bytes.
    unsafe fn store(self, ptr: *mut u8);

    /// Lane-wise OR.
    fn or(self, other: Self) -> Self;

    /// Lane-wise XOR.
    fn xor(self, other: Self) -> Self;

    /// True when every lane is zero.
    fn is_zero(self) -> bool;

    /// OR of all lanes.
    fn fold_or(self) -> u8;
}

/// Eight byte lanes packed into a general-purpose register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WordVector(u64);

impl ByteVector for WordVector {
    const WIDTH: usize = 8;

    #[inline(always)]
    fn zero() -> Self {
        Self(0)
    }

    #[inline(always)]
    fn splat(byte: u8) -> Self {
        Self(u64::from_ne_bytes([byte; 8]))
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> Self {
        // SAFETY: caller guarantees 8 readable bytes; no alignment required.
        Self(unsafe { ptr.cast::<u64>().read_unaligned() })
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut u8) {
        // SAFETY: caller guarantees 8 writable bytes.
        unsafe { ptr.cast::<u64>().write_unaligned(self.0) }
    }

    #[inline(always)]
    fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline(always)]
    fn xor(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    fn fold_or(self) -> u8 {
        self.0.to_ne_bytes().iter().fold(0, |acc, &b| acc | b)
    }
}

//==============================================================================
// x86_64
//==============================================================================

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod x86 {
    use super::ByteVector;
    use std::arch::x86_64::*;

    #[derive(Clone, Copy)]
    pub(crate) struct Sse2Vector(__m128i);

    impl ByteVector for Sse2Vector {
        const WIDTH: usize = 16;

        #[inline(always)]
        fn zero() -> Self {
            // SAFETY: SSE2 is part of the x86_64 baseline.
            Self(unsafe { _mm_setzero_si128() })
        }

        #[inline(always)]
        fn splat(byte: u8) -> Self {
            Self(unsafe { _mm_set1_epi8(byte as i8) })
        }

        #[inline(always)]
        unsafe fn load(ptr: *const u8) -> Self {
            Self(unsafe { _mm_loadu_si128(ptr.cast()) })
        }

        #[inline(always)]
        unsafe fn store(self, ptr: *mut u8) {
            unsafe { _mm_storeu_si128(ptr.cast(), self.0) }
        }

        #[inline(always)]
        fn or(self, other: Self) -> Self {
            Self(unsafe { _mm_or_si128(self.0, other.0) })
        }

        #[inline(always)]
        fn xor(self, other: Self) -> Self {
            Self(unsafe { _mm_xor_si128(self.0, other.0) })
        }

        #[inline(always)]
        fn is_zero(self) -> bool {
            unsafe {
                let eq = _mm_cmpeq_epi8(self.0, _mm_setzero_si128());
                _mm_movemask_epi8(eq) == 0xFFFF
            }
        }

        #[inline(always)]
        fn fold_or(self) -> u8 {
            let mut lanes = [0u8; 16];
            unsafe { self.store(lanes.as_mut_ptr()) };
            lanes.iter().fold(0, |acc, &b| acc | b)
        }
    }

    /// Only valid inside functions compiled with `avx2`.
    #[derive(Clone, Copy)]
    pub(crate) struct Avx2Vector(__m256i);

    impl ByteVector for Avx2Vector {
        const WIDTH: usize = 32;

        #[inline(always)]
        fn zero() -> Self {
            Self(unsafe { _mm256_setzero_si256() })
        }

        #[inline(always)]
        fn splat(byte: u8) -> Self {
            Self(unsafe { _mm256_set1_epi8(byte as i8) })
        }

        #[inline(always)]
        unsafe fn load(ptr: *const u8) -> Self {
            Self(unsafe { _mm256_loadu_si256(ptr.cast()) })
        }

        #[inline(always)]
        unsafe fn store(self, ptr: *mut u8) {
            unsafe { _mm256_storeu_si256(ptr.cast(), self.0) }
        }

        #[inline(always)]
        fn or(self, other: Self) -> Self {
            Self(unsafe { _mm256_or_si256(self.0, other.0) })
        }

        #[inline(always)]
        fn xor(self, other: Self) -> Self {
            Self(unsafe { _mm256_xor_si256(self.0, other.0) })
        }

        #[inline(always)]
        fn is_zero(self) -> bool {
            unsafe { _mm256_testz_si256(self.0, self.0) == 1 }
        }

        #[inline(always)]
        fn fold_or(self) -> u8 {
            let mut lanes = [0u8; 32];
            unsafe { self.store(lanes.as_mut_ptr()) };
            lanes.iter().fold(0, |acc, &b| acc | b)
        }
    }

    /// Only valid inside functions compiled with `avx512f,avx512bw`.
    #[cfg(feature = "avx512")]
    #[derive(Clone, Copy)]
    pub(crate) struct Avx512Vector(__m512i);

    #[cfg(feature = "avx512")]
    impl ByteVector for Avx512Vector {
        const WIDTH: usize = 64;

        #[inline(always)]
        fn zero() -> Self {
            Self(unsafe { _mm512_setzero_si512() })
        }

        #[inline(always)]
        fn splat(byte: u8) -> Self {
            Self(unsafe { _mm512_set1_epi8(byte as i8) })
        }

        #[inline(always)]
        unsafe fn load(ptr: *const u8) -> Self {
            Self(unsafe { _mm512_loadu_si512(ptr.cast()) })
        }

        #[inline(always)]
        unsafe fn store(self, ptr: *mut u8) {
            unsafe { _mm512_storeu_si512(ptr.cast(), self.0) }
        }

        #[inline(always)]
        fn or(self, other: Self) -> Self {
            Self(unsafe { _mm512_or_si512(self.0, other.0) })
        }

        #[inline(always)]
        fn xor(self, other: Self) -> Self {
            Self(unsafe { _mm512_xor_si512(self.0, other.0) })
        }

        #[inline(always)]
        fn is_zero(self) -> bool {
            unsafe { _mm512_test_epi64_mask(self.0, self.0) == 0 }
        }

        #[inline(always)]
        fn fold_or(self) -> u8 {
            let mut lanes = [0u8; 64];
            unsafe { self.store(lanes.as_mut_ptr()) };
            lanes.iter().fold(0, |acc, &b| acc | b)
        }
    }
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) use x86::{Avx2Vector, Sse2Vector};

#[cfg(all(feature = "avx512", target_arch = "x86_64"))]
pub(crate) use x86::Avx512Vector;

//==============================================================================
// aarch64
//==============================================================================

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
mod arm {
    use super::ByteVector;
    use std::arch::aarch64::*;

    #[derive(Clone, Copy)]
    pub(crate) struct NeonVector(uint8x16_t);

    impl ByteVector for NeonVector {
        const WIDTH: usize = 16;

        #[inline(always)]
        fn zero() -> Self {
            Self(unsafe { vdupq_n_u8(0) })
        }

        #[inline(always)]
        fn splat(byte: u8) -> Self {
            Self(unsafe { vdupq_n_u8(byte) })
        }

        #[inline(always)]
        unsafe fn load(ptr: *const u8) -> Self {
            Self(unsafe { vld1q_u8(ptr) })
        }

        #[inline(always)]
        unsafe fn store(self, ptr: *mut u8) {
            unsafe { vst1q_u8(ptr, self.0) }
        }

        #[inline(always)]
        fn or(self, other: Self) -> Self {
            Self(unsafe { vorrq_u8(self.0, other.0) })
        }

        #[inline(always)]
        fn xor(self, other: Self) -> Self {
            Self(unsafe { veorq_u8(self.0, other.0) })
        }

        #[inline(always)]
        fn is_zero(self) -> bool {
            unsafe { vmaxvq_u8(self.0) == 0 }
        }

        #[inline(always)]
        fn fold_or(self) -> u8 {
            let mut lanes = [0u8; 16];
            unsafe { self.store(lanes.as_mut_ptr()) };
            lanes.iter().fold(0, |acc, &b| acc | b)
        }
    }
}

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
pub(crate) use arm::NeonVector;
