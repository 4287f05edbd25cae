//! Tunable configuration for detection and retention.
//!
//! Defaults live in the `defaults` module so tests and the SystemConfig
//! admin path reference the same constants.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Classifier tunables. Read at operation time via the classifier's
/// config handle so live tuning takes effect without a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Per-keyword-match weight for GBV categories.
    pub gbv_keyword_weight: f64,
    /// Per-keyword-match weight for the toxicity lexicon.
    pub toxicity_keyword_weight: f64,
    /// Public channels: flag when toxicity exceeds this.
    pub public_toxicity_threshold: f64,
    /// Public channels: flag when overall_gbv exceeds this.
    pub public_gbv_threshold: f64,
    /// Private/DM channels: flag when toxicity exceeds this.
    pub private_toxicity_threshold: f64,
    /// Private/DM channels: flag when overall_gbv exceeds this.
    pub private_gbv_threshold: f64,
    /// Cache entry lifetime in seconds.
    pub cache_ttl_secs: u64,
    /// Maximum cached results.
    pub cache_max_entries: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            gbv_keyword_weight: defaults::DEFAULT_GBV_KEYWORD_WEIGHT,
            toxicity_keyword_weight: defaults::DEFAULT_TOXICITY_KEYWORD_WEIGHT,
            public_toxicity_threshold: defaults::DEFAULT_PUBLIC_TOXICITY_THRESHOLD,
            public_gbv_threshold: defaults::DEFAULT_PUBLIC_GBV_THRESHOLD,
            private_toxicity_threshold: defaults::DEFAULT_PRIVATE_TOXICITY_THRESHOLD,
            private_gbv_threshold: defaults::DEFAULT_PRIVATE_GBV_THRESHOLD,
            cache_ttl_secs: constants::DETECTION_CACHE_TTL_SECS,
            cache_max_entries: constants::DETECTION_CACHE_MAX_ENTRIES,
        }
    }
}

/// Retention policy windows, enforceable by the storage maintenance pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub report_retention_days: u64,
    pub audit_retention_days: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            report_retention_days: constants::DEFAULT_REPORT_RETENTION_DAYS,
            audit_retention_days: constants::DEFAULT_AUDIT_RETENTION_DAYS,
        }
    }
}

pub mod defaults {
    pub const DEFAULT_GBV_KEYWORD_WEIGHT: f64 = 0.4;
    pub const DEFAULT_TOXICITY_KEYWORD_WEIGHT: f64 = 0.5;
    pub const DEFAULT_PUBLIC_TOXICITY_THRESHOLD: f64 = 0.7;
    pub const DEFAULT_PUBLIC_GBV_THRESHOLD: f64 = 0.3;
    pub const DEFAULT_PRIVATE_TOXICITY_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_PRIVATE_GBV_THRESHOLD: f64 = 0.2;
}
