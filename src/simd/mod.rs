//! # Byte-Vector Lanes
//!
//! A single abstraction over the vector registers the kernels run on. Each
//! strategy kernel in [`crate::memory::zero_detect`] is written once against
//! [`ByteVector`] and instantiated per tier inside a
//! `#[target_feature]` entry point, so the intrinsics inline into code that is
//! compiled for the matching instruction set.
//!
//! | Lane type | Register | Width |
//! |---|---|---|
//! | `Avx512Vector` | `__m512i` (feature `avx512`) | 64 |
//! | `Avx2Vector` | `__m256i` | 32 |
//! | `Sse2Vector` | `__m128i` | 16 |
//! | `NeonVector` | `uint8x16_t` | 16 |
//! | `WordVector` | `u64` | 8 |

mod vector;

pub(crate) use vector::{ByteVector, WordVector};

#[cfg(all(feature = "avx512", target_arch = "x86_64"))]
pub(crate) use vector::Avx512Vector;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) use vector::{Avx2Vector, Sse2Vector};
#[cfg(all(feature = "simd", target_arch = "aarch64"))]
pub(crate) use vector::NeonVector;
