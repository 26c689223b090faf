//! Integration tests for zero and constant detection.

use memband::algorithms::{is_all_zero, ZeroDetector};
use memband::config::{ParallelConfig, SplitDiscipline, ZeroDetectConfig};
use memband::memory::{DetectStrategy, SimdTier};

/// Every strategy on every tier this machine runs, under `policy`.
fn detectors(policy: ParallelConfig) -> Vec<ZeroDetector> {
    let mut out = Vec::new();
    for tier in SimdTier::available() {
        for strategy in DetectStrategy::ALL {
            for discipline in [SplitDiscipline::FlatPartition, SplitDiscipline::RecursiveHalving] {
                out.push(ZeroDetector::new(
                    ZeroDetectConfig::default()
                        .with_parallel(policy)
                        .with_discipline(discipline)
                        .with_strategy(strategy)
                        .with_simd_tier(tier),
                ));
            }
        }
    }
    out
}

#[test]
fn test_all_zero_100k_every_strategy_forced_parallel() {
    let buf = vec![0u8; 100_000];
    for detector in detectors(ParallelConfig::new(1, 8)) {
        assert!(detector.is_all_zero(&buf, 0, buf.len()).unwrap());
    }
    assert!(is_all_zero(&buf, 0, buf.len()).unwrap());
}

#[test]
fn test_last_byte_nonzero() {
    let mut buf = vec![0u8; 100_000];
    buf[99_999] = 1;
    let policies = [
        ParallelConfig::new(1, 8),
        ParallelConfig::for_detection(),
        ParallelConfig::sequential(),
    ];
    for policy in policies {
        for detector in detectors(policy) {
            assert!(!detector.is_all_zero(&buf, 0, buf.len()).unwrap());
        }
    }
}

#[test]
fn test_degree_one_matches_automatic() {
    let buf = vec![0u8; 1_000_000];
    let sequential = ZeroDetector::new(
        ZeroDetectConfig::default()
            .with_parallel(ParallelConfig::for_detection().with_degree_of_parallelism(1)),
    );
    let automatic = ZeroDetector::default();
    assert!(sequential.is_slice_zero(&buf).unwrap());
    assert_eq!(
        sequential.is_slice_zero(&buf).unwrap(),
        automatic.is_slice_zero(&buf).unwrap()
    );
}

#[test]
fn test_empty_range_is_true() {
    let buf = [5u8; 10];
    for detector in detectors(ParallelConfig::new(1, 4)) {
        assert!(detector.is_all_zero(&buf, 0, 0).unwrap());
        assert!(detector.is_all_zero(&buf, 10, 0).unwrap());
        assert!(detector.is_all_zero(&[], 0, 0).unwrap());
    }
}

#[test]
fn test_out_of_range_is_error() {
    let buf = [0u8; 10];
    assert!(is_all_zero(&buf, 0, 11).is_err());
    assert!(is_all_zero(&buf, 11, 0).is_err());
    assert!(is_all_zero(&buf, usize::MAX, 2).is_err());
}

#[test]
fn test_threshold_boundaries() {
    const Q: usize = 4096;
    let policy = ParallelConfig::new(Q, 0);
    for len in [Q - 1, Q, Q + 1] {
        let mut buf = vec![0u8; len];
        for detector in detectors(policy) {
            assert!(detector.is_all_zero(&buf, 0, len).unwrap(), "len={}", len);
        }
        buf[len - 1] = 0x10;
        for detector in detectors(policy) {
            assert!(!detector.is_all_zero(&buf, 0, len).unwrap(), "len={}", len);
        }
    }
}

#[test]
fn test_idempotent() {
    let mut buf = vec![0u8; 50_000];
    buf[12_345] = 9;
    let detector = ZeroDetector::default();
    let first = detector.is_slice_zero(&buf).unwrap();
    let second = detector.is_slice_zero(&buf).unwrap();
    assert_eq!(first, second);
    assert!(!first);
}

#[test]
fn test_every_single_mismatch_position_small() {
    let sample: Vec<ZeroDetector> = detectors(ParallelConfig::new(17, 3))
        .into_iter()
        .step_by(3)
        .collect();
    for len in 1..=140usize {
        for pos in 0..len {
            let mut buf = vec![0u8; len];
            buf[pos] = 0x01;
            for detector in &sample {
                assert!(!detector.is_slice_zero(&buf).unwrap(), "len={} pos={}", len, pos);
            }
        }
    }
}

#[test]
fn test_constant_detection() {
    let mut buf = vec![0x7Fu8; 33_333];
    for detector in detectors(ParallelConfig::new(1000, 4)) {
        assert!(detector.is_all_equal(&buf, 0, buf.len(), 0x7F).unwrap());
        assert!(!detector.is_all_equal(&buf, 0, buf.len(), 0x7E).unwrap());
    }
    buf[0] = 0;
    for detector in detectors(ParallelConfig::new(1000, 4)) {
        assert!(!detector.is_all_equal(&buf, 0, buf.len(), 0x7F).unwrap());
        assert!(detector.is_all_equal(&buf, 1, buf.len() - 1, 0x7F).unwrap());
    }
}

/// Threads in this process, from `/proc/self/status`.
#[cfg(target_os = "linux")]
fn process_threads() -> usize {
    std::fs::read_to_string("/proc/self/status")
        .unwrap()
        .lines()
        .find_map(|line| line.strip_prefix("Threads:"))
        .and_then(|n| n.trim().parse().ok())
        .unwrap()
}

#[test]
fn test_huge_degree_on_tiny_buffer() {
    for discipline in [SplitDiscipline::FlatPartition, SplitDiscipline::RecursiveHalving] {
        let detector = ZeroDetector::new(
            ZeroDetectConfig::default()
                .with_parallel(ParallelConfig::new(1, 4000))
                .with_discipline(discipline),
        );
        assert!(detector.is_slice_zero(&[0u8; 2]).unwrap());
        assert!(!detector.is_slice_zero(&[0u8, 9]).unwrap());
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_degree_does_not_spawn_threads() {
    // Warm up the global pool so its threads are already counted.
    let warm = ZeroDetector::new(
        ZeroDetectConfig::default().with_parallel(ParallelConfig::new(1, 0)),
    );
    assert!(warm.is_slice_zero(&[0u8; 64]).unwrap());
    let before = process_threads();

    let buf = [0u8; 64];
    for degree in [2usize, 3, 5, 8, 13, 21, 34, 40, 4000] {
        let detector = ZeroDetector::new(
            ZeroDetectConfig::default().with_parallel(ParallelConfig::new(1, degree)),
        );
        assert!(detector.is_slice_zero(&buf).unwrap());
    }

    // Slack covers test-harness threads started by concurrently running tests.
    let after = process_threads();
    assert!(after < before + 64, "threads grew from {} to {}", before, after);
}
