//! # System Integration Utilities
//!
//! Hardware discovery used to pick vector tiers and worker counts.

pub mod cpu_features;

pub use cpu_features::{get_cpu_features, CpuFeature, CpuFeatureSet, RuntimeCpuFeatures};
