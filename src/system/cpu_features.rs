//! # CPU Feature Detection
//!
//! Runtime detection of the vector extensions the kernels can use, plus the
//! core count and cache line size reported by [`crate::init`].

use std::collections::HashMap;
use std::sync::OnceLock;

/// CPU feature flags relevant to the bulk kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuFeature {
    /// x86_64 128-bit integer vectors
    SSE2,
    /// x86_64 256-bit integer vectors
    AVX2,
    /// x86_64 512-bit foundation
    AVX512F,
    /// x86_64 512-bit byte/word operations
    AVX512BW,
    /// ARM 128-bit vectors
    NEON,
}

/// Detected CPU capabilities
#[derive(Debug, Clone)]
pub struct CpuFeatureSet {
    /// Available CPU features
    pub features: HashMap<CpuFeature, bool>,
    /// CPU vendor (Intel, AMD, ARM, etc.)
    pub vendor: String,
    /// CPU model name
    pub model: String,
    /// Number of logical cores
    pub logical_cores: usize,
    /// Cache line size (typically 64 bytes)
    pub cache_line_size: usize,
}

impl CpuFeatureSet {
    /// Check if a specific feature is available
    pub fn has_feature(&self, feature: CpuFeature) -> bool {
        self.features.get(&feature).copied().unwrap_or(false)
    }
}

/// Runtime CPU feature detection interface
#[derive(Debug, Default)]
pub struct RuntimeCpuFeatures;

impl RuntimeCpuFeatures {
    /// Create a new runtime feature detector
    pub fn new() -> Self {
        Self
    }

    /// Detect all available CPU features
    pub fn detect_features(&self) -> CpuFeatureSet {
        #[cfg_attr(
            not(any(target_arch = "x86_64", target_arch = "aarch64")),
            allow(unused_mut)
        )]
        let mut features = HashMap::new();

        #[cfg(target_arch = "x86_64")]
        {
            self.detect_x86_features(&mut features);
        }

        #[cfg(target_arch = "aarch64")]
        {
            self.detect_arm_features(&mut features);
        }

        let (vendor, model) = self.get_cpu_info();

        CpuFeatureSet {
            features,
            vendor,
            model,
            logical_cores: num_cpus::get().max(1),
            cache_line_size: self.get_cache_line_size(),
        }
    }

    /// `is_x86_feature_detected!` also checks that the OS saves the wider
    /// register state, which raw CPUID bits alone do not.
    #[cfg(target_arch = "x86_64")]
    fn detect_x86_features(&self, features: &mut HashMap<CpuFeature, bool>) {
        features.insert(CpuFeature::SSE2, is_x86_feature_detected!("sse2"));
        features.insert(CpuFeature::AVX2, is_x86_feature_detected!("avx2"));
        features.insert(CpuFeature::AVX512F, is_x86_feature_detected!("avx512f"));
        features.insert(CpuFeature::AVX512BW, is_x86_feature_detected!("avx512bw"));
    }

    #[cfg(target_arch = "aarch64")]
    fn detect_arm_features(&self, features: &mut HashMap<CpuFeature, bool>) {
        features.insert(
            CpuFeature::NEON,
            std::arch::is_aarch64_feature_detected!("neon"),
        );
    }

    /// Get CPU vendor and model information
    fn get_cpu_info(&self) -> (String, String) {
        #[cfg(target_arch = "x86_64")]
        {
            let cpuid = raw_cpuid::CpuId::new();
            let vendor = cpuid
                .get_vendor_info()
                .map(|v| v.as_str().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let model = cpuid
                .get_processor_brand_string()
                .map(|b| b.as_str().trim().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            (vendor, model)
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            let vendor = if cfg!(target_arch = "aarch64") { "ARM" } else { "Unknown" };
            (vendor.to_string(), "Unknown".to_string())
        }
    }

    fn get_cache_line_size(&self) -> usize {
        #[cfg(target_arch = "x86_64")]
        {
            let cpuid = raw_cpuid::CpuId::new();
            if let Some(mut caches) = cpuid.get_cache_parameters() {
                if let Some(first) = caches.next() {
                    let size = first.coherency_line_size() as usize;
                    if size.is_power_of_two() {
                        return size;
                    }
                }
            }
        }
        64
    }
}

static CPU_FEATURES: OnceLock<CpuFeatureSet> = OnceLock::new();

/// Get the global CPU feature set (detected once on first call)
pub fn get_cpu_features() -> &'static CpuFeatureSet {
    CPU_FEATURES.get_or_init(|| RuntimeCpuFeatures::new().detect_features())
}
