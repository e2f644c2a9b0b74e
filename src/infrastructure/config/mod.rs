//! Engine settings: immutable after load, handed to components at construction.
//!
//! Sources, lowest to highest priority: built-in defaults, an optional TOML
//! file, then `ANALYSIS_`-prefixed environment variables with `__` separating
//! nested keys (`ANALYSIS_CACHE__DEFAULT_TTL_SECS=60`).

use crate::domain::error::{AppError, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

pub const ENV_PREFIX: &str = "ANALYSIS_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub charts: ChartSettings,
    pub summary: SummarySettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Row cap applied when a configuration does not set MaxDataPoints
    pub default_max_data_points: usize,

    /// Name of the placeholder series emitted when no numeric columns exist
    pub fallback_series_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericExtraction {
    /// Non-convertible non-null values count as 0
    Lenient,
    /// Non-convertible values are skipped
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Number of sample values kept per column
    pub sample_size: usize,

    pub numeric_extraction: NumericExtraction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Disabled: every get misses and every set is dropped
    pub enabled: bool,

    /// TTL used by `set` when the caller gives none
    pub default_ttl_secs: u64,

    /// Whether the default TTL slides on each read
    pub sliding_expiration: bool,

    /// Capacity of the in-memory store before LRU eviction
    pub max_entries: usize,

    /// Hex characters of the configuration hash appended to cache keys
    pub key_hash_length: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            default_max_data_points: 1000,
            fallback_series_name: "Data".to_string(),
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            sample_size: 5,
            numeric_extraction: NumericExtraction::Lenient,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: 300,
            sliding_expiration: false,
            max_entries: 1000,
            key_hash_length: 16,
        }
    }
}

/// Result of checking a settings value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl AnalysisSettings {
    /// Load defaults, then `path` (if given and present), then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AnalysisSettings::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let settings: AnalysisSettings = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        let validation = settings.validate();
        for warning in &validation.warnings {
            warn!(warning = %warning, "Analysis settings warning");
        }
        if !validation.valid {
            return Err(AppError::ConfigError(validation.errors.join("; ")));
        }

        info!(
            default_max_data_points = settings.charts.default_max_data_points,
            cache_enabled = settings.cache.enabled,
            cache_ttl_secs = settings.cache.default_ttl_secs,
            "Analysis settings loaded"
        );
        Ok(settings)
    }

    /// Same as [`load`](Self::load) after pulling a `.env` file into the environment.
    /// A missing `.env` is not an error.
    pub fn load_with_dotenv(path: Option<&Path>) -> Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                warn!(error = %err, "Failed to read .env file");
            }
        }
        Self::load(path)
    }

    pub fn validate(&self) -> ConfigValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.charts.default_max_data_points == 0 {
            errors.push("charts.default_max_data_points must be > 0".to_string());
        }
        if self.charts.fallback_series_name.trim().is_empty() {
            warnings.push("charts.fallback_series_name is empty".to_string());
        }
        if self.summary.sample_size == 0 {
            warnings.push("summary.sample_size is 0, column samples will be empty".to_string());
        }
        if self.cache.max_entries == 0 {
            errors.push("cache.max_entries must be > 0".to_string());
        }
        if self.cache.key_hash_length == 0 || self.cache.key_hash_length > 64 {
            errors.push("cache.key_hash_length must be between 1 and 64".to_string());
        }
        if self.cache.enabled && self.cache.default_ttl_secs == 0 {
            warnings.push("cache.default_ttl_secs is 0, entries expire immediately".to_string());
        }

        ConfigValidation {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
