//! Integration tests for parallel copy and copy-to-new.

use memband::algorithms::{par_copy, par_copy_to_new, ParallelCopy};
use memband::config::{CopyConfig, ParallelConfig, SplitDiscipline};
use memband::MembandError;

// =============================================================================
// HELPERS
// =============================================================================

fn pattern(len: usize) -> Vec<u32> {
    (0..len as u32).map(|i| i.wrapping_mul(2_654_435_761)).collect()
}

/// Sequential, flat and halving copiers sharing one work quantum.
fn every_dispatch(quantum: usize) -> Vec<(String, ParallelCopy)> {
    let mut out = vec![(
        "sequential".to_string(),
        ParallelCopy::new(CopyConfig::flat(ParallelConfig::new(quantum, 1))),
    )];
    for discipline in [SplitDiscipline::FlatPartition, SplitDiscipline::RecursiveHalving] {
        for degree in [0usize, 2, 5] {
            out.push((
                format!("{}/{}", discipline, degree),
                ParallelCopy::new(CopyConfig::new(ParallelConfig::new(quantum, degree), discipline)),
            ));
        }
    }
    out
}

// =============================================================================
// CONCRETE SCENARIOS
// =============================================================================

#[test]
fn test_five_element_copy() {
    let src = [1, 2, 3, 4, 5];
    let mut dst = [0; 5];
    par_copy(&src, 0, &mut dst, 0, 5).unwrap();
    assert_eq!(dst, [1, 2, 3, 4, 5]);
}

#[test]
fn test_overlong_copy_is_rejected_without_writes() {
    let src = [1u8, 2, 3, 4, 5];
    let mut dst = [0u8; 5];

    let err = par_copy(&src, 1, &mut dst, 0, 5).unwrap_err();
    assert!(matches!(err, MembandError::OutOfRange { .. }));
    assert_eq!(dst, [0u8; 5]);

    let err = par_copy(&src, 0, &mut dst, 3, 3).unwrap_err();
    assert!(matches!(err, MembandError::OutOfRange { .. }));
    assert_eq!(dst, [0u8; 5]);
}

#[test]
fn test_overflowing_start_is_rejected() {
    let src = [1u8; 8];
    let mut dst = [0u8; 8];
    assert!(par_copy(&src, usize::MAX, &mut dst, 0, 1).is_err());
    assert!(par_copy(&src, 0, &mut dst, usize::MAX - 1, 4).is_err());
    assert_eq!(dst, [0u8; 8]);
}

#[test]
fn test_zero_length_copy_is_noop() {
    let src: [u8; 0] = [];
    let mut dst = [42u8; 3];
    par_copy(&src, 0, &mut dst, 0, 0).unwrap();
    par_copy(&src, 7, &mut dst, 9, 0).unwrap();
    assert_eq!(dst, [42u8; 3]);
}

// =============================================================================
// POLICY INDEPENDENCE
// =============================================================================

#[test]
fn test_every_dispatch_copies_identically() {
    let src = pattern(70_001);
    for (name, copier) in every_dispatch(1024) {
        let mut dst = vec![0u32; 80_000];
        copier.copy(&src, 1, &mut dst, 9_999, 70_000).unwrap();
        assert_eq!(&dst[9_999..79_999], &src[1..], "{}", name);
        assert!(dst[..9_999].iter().all(|&v| v == 0), "{}", name);
        assert_eq!(dst[79_999], 0, "{}", name);
    }
}

#[test]
fn test_threshold_boundaries() {
    const Q: usize = 16_384;
    let src = pattern(Q + 1);
    for len in [Q - 1, Q, Q + 1] {
        for (name, copier) in every_dispatch(Q) {
            let mut dst = vec![0u32; len];
            copier.copy(&src, 0, &mut dst, 0, len).unwrap();
            assert_eq!(&dst[..], &src[..len], "{} len={}", name, len);

            let fresh = copier.copy_to_new(&src, 0, len).unwrap();
            assert_eq!(fresh.len(), len);
            assert_eq!(&fresh[..], &src[..len], "{} len={}", name, len);
        }
    }
}

#[test]
fn test_odd_lengths_with_tiny_quantum() {
    // Quantum 1 forces splitting all the way down on halving.
    let src = pattern(1_001);
    for (name, copier) in every_dispatch(1) {
        for len in [1usize, 2, 3, 7, 999, 1_001] {
            let mut dst = vec![0u32; len];
            copier.copy(&src, 0, &mut dst, 0, len).unwrap();
            assert_eq!(&dst[..], &src[..len], "{} len={}", name, len);
        }
    }
}

#[test]
fn test_struct_elements() {
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Sample {
        id: u32,
        weight: f64,
        tag: char,
    }
    let src: Vec<Sample> = (0..20_000)
        .map(|i| Sample {
            id: i,
            weight: i as f64 * 0.5,
            tag: if i % 2 == 0 { 'e' } else { 'o' },
        })
        .collect();
    let copier = ParallelCopy::new(CopyConfig::halving(ParallelConfig::new(512, 4)));
    let out = copier.copy_to_new(&src, 100, 19_900).unwrap();
    assert_eq!(&out[..], &src[100..]);
}

// =============================================================================
// COPY TO NEW
// =============================================================================

#[test]
fn test_copy_to_new_bounds() {
    let src = pattern(100);
    assert!(par_copy_to_new(&src, 0, 101).is_err());
    assert!(par_copy_to_new(&src, 100, 1).is_err());
    assert_eq!(par_copy_to_new(&src, 100, 0).unwrap(), Vec::<u32>::new());
    assert_eq!(par_copy_to_new(&src, 99, 1).unwrap(), vec![src[99]]);
}

#[test]
fn test_copy_to_new_large() {
    let src: Vec<u8> = (0..1_000_000u32).map(|i| (i % 253) as u8).collect();
    let out = par_copy_to_new(&src, 0, src.len()).unwrap();
    assert_eq!(out, src);
}

// =============================================================================
// VECTORIZED LEAF
// =============================================================================

#[test]
fn test_simd_copy_matches_bulk_copy() {
    let src: Vec<f32> = (0..65_537).map(|i| i as f32 * 0.25).collect();
    for (name, copier) in every_dispatch(2048) {
        let mut bulk = vec![0f32; 65_537];
        let mut simd = vec![0f32; 65_537];
        copier.copy(&src, 3, &mut bulk, 0, 65_534).unwrap();
        copier.copy_simd(&src, 3, &mut simd, 0, 65_534).unwrap();
        assert_eq!(bulk, simd, "{}", name);
    }
}
