//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section defaults, so an empty file is a valid config.

use serde::{Deserialize, Serialize};

/// `Cache-Control` applied alongside a generated ETag.
pub const DEFAULT_CACHE_CONTROL: &str = "max-age=0, private, must-revalidate";

/// Largest body the annotator will buffer to digest.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConditionalGetConfig {
    /// ETag generation.
    pub etag: EtagConfig,

    /// 304 short-circuiting.
    pub freshness: FreshnessConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// ETag annotation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EtagConfig {
    /// Generate weak ETags for 200 responses.
    pub enabled: bool,

    /// `Cache-Control` value set when the response has none.
    pub cache_control: String,

    /// Bodies larger than this are passed through without an ETag.
    pub max_body_bytes: usize,
}

impl Default for EtagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Freshness evaluation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FreshnessConfig {
    /// Replace fresh responses with 304 Not Modified.
    pub enabled: bool,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error, off).
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
