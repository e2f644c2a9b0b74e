use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::analysis::{ChartConfiguration, ChartType};
use crate::infrastructure::cache_store::{CacheEntry, CacheExpiry, CacheStore};
use crate::infrastructure::config::CacheSettings;

/// Deterministic cache keys plus a fault-tolerant front for a shared store.
///
/// Store failures are logged and treated as misses (or dropped writes); they
/// never reach the caller. There is no request coalescing: two callers missing
/// the same key both compute and the later write wins.
pub struct AnalysisCache {
    store: Arc<dyn CacheStore>,
    settings: CacheSettings,
}

impl AnalysisCache {
    pub fn new(store: Arc<dyn CacheStore>, settings: CacheSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// `base_key` unchanged without configuration, else `{base_key}_{hash}`
    /// where hash is a truncated SHA-256 of the configuration's canonical JSON.
    pub fn generate_cache_key(
        &self,
        base_key: &str,
        configuration: Option<&ChartConfiguration>,
    ) -> String {
        match configuration {
            None => base_key.to_string(),
            Some(config) => format!("{}_{}", base_key, self.configuration_hash(config)),
        }
    }

    fn configuration_hash(&self, configuration: &ChartConfiguration) -> String {
        let mut hasher = Sha256::new();
        hasher.update(configuration.canonical_json().as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(self.settings.key_hash_length);
        digest
    }

    pub fn chart_cache_key(
        &self,
        dataset_id: i64,
        chart_type: ChartType,
        configuration: Option<&ChartConfiguration>,
    ) -> String {
        self.generate_cache_key(&format!("chart_{}_{}", dataset_id, chart_type), configuration)
    }

    pub fn comparison_cache_key(
        &self,
        dataset_id1: i64,
        dataset_id2: i64,
        chart_type: ChartType,
        configuration: Option<&ChartConfiguration>,
    ) -> String {
        self.generate_cache_key(
            &format!("comparison_{}_{}_{}", dataset_id1, dataset_id2, chart_type),
            configuration,
        )
    }

    pub fn summary_cache_key(&self, dataset_id: i64) -> String {
        format!("summary_{}", dataset_id)
    }

    pub fn statistics_cache_key(&self, dataset_id: i64) -> String {
        format!("stats_{}", dataset_id)
    }

    /// Expiry used when `set` is given none
    pub fn default_expiry(&self) -> CacheExpiry {
        let ttl = Duration::from_secs(self.settings.default_ttl_secs);
        if self.settings.sliding_expiration {
            CacheExpiry::Sliding(ttl)
        } else {
            CacheExpiry::Absolute(ttl)
        }
    }

    /// Cached value, or `None` on a miss, a store failure, or a value that no
    /// longer deserializes as `T`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.settings.enabled {
            return None;
        }

        let value = match self.store.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(key, "Cache miss");
                return None;
            }
            Err(err) => {
                warn!(key, error = %err, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(typed) => {
                debug!(key, "Cache hit");
                Some(typed)
            }
            Err(err) => {
                warn!(key, error = %err, "Cached value has unexpected shape, treating as miss");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T, expiry: Option<CacheExpiry>) {
        if !self.settings.enabled {
            return;
        }

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "Value not cacheable, skipping");
                return;
            }
        };

        let entry = CacheEntry::new(key, value, expiry.unwrap_or_else(|| self.default_expiry()));
        if let Err(err) = self.store.set(entry) {
            warn!(key, error = %err, "Cache write failed");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            warn!(key, error = %err, "Cache remove failed");
        }
    }

    /// Empties the underlying store
    pub fn clear(&self) {
        if let Err(err) = self.store.compact(1.0) {
            warn!(error = %err, "Cache clear failed");
        }
    }

    /// Return the cached value for `key`, or compute, store and return it
    pub fn get_or_compute<T, F>(&self, key: &str, expiry: Option<CacheExpiry>, compute: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(cached) = self.get(key) {
            return cached;
        }
        let value = compute();
        self.set(key, &value, expiry);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{AppError, Result};
    use crate::infrastructure::cache_store::InMemoryCacheStore;
    use serde_json::{json, Value};
    use std::cell::Cell;

    fn cache() -> AnalysisCache {
        AnalysisCache::new(Arc::new(InMemoryCacheStore::new(100)), CacheSettings::default())
    }

    struct BrokenStore;

    impl CacheStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Value>> {
            Err(AppError::CacheError("down".to_string()))
        }
        fn set(&self, _entry: CacheEntry) -> Result<()> {
            Err(AppError::CacheError("down".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(AppError::CacheError("down".to_string()))
        }
        fn compact(&self, _percentage: f64) -> Result<()> {
            Err(AppError::CacheError("down".to_string()))
        }
    }

    #[test]
    fn test_key_without_configuration_is_base_key() {
        assert_eq!(cache().generate_cache_key("base", None), "base");
    }

    #[test]
    fn test_equal_configurations_share_a_key() {
        let cache = cache();
        let a = ChartConfiguration::default()
            .with_max_data_points(50)
            .with_extra("theme", json!("dark"));
        let b = ChartConfiguration::default()
            .with_max_data_points(50)
            .with_extra("theme", json!("dark"));
        let changed = b.clone().with_max_data_points(51);

        let key_a = cache.chart_cache_key(3, ChartType::Line, Some(&a));
        assert_eq!(key_a, cache.chart_cache_key(3, ChartType::Line, Some(&b)));
        assert_ne!(key_a, cache.chart_cache_key(3, ChartType::Line, Some(&changed)));
        assert!(key_a.starts_with("chart_3_Line_"));
        assert_eq!(key_a.len(), "chart_3_Line_".len() + 16);
    }

    #[test]
    fn test_specialized_keys() {
        let cache = cache();
        assert_eq!(
            cache.comparison_cache_key(1, 2, ChartType::Pie, None),
            "comparison_1_2_Pie"
        );
        assert_eq!(cache.summary_cache_key(9), "summary_9");
        assert_eq!(cache.statistics_cache_key(9), "stats_9");
    }

    #[test]
    fn test_typed_round_trip_and_clear() {
        let cache = cache();
        cache.set("k", &vec![1.0, 2.0], None);
        assert_eq!(cache.get::<Vec<f64>>("k"), Some(vec![1.0, 2.0]));
        assert_eq!(cache.get::<String>("k"), None);

        cache.clear();
        assert_eq!(cache.get::<Vec<f64>>("k"), None);
    }

    #[test]
    fn test_store_failure_degrades_to_miss() {
        let cache = AnalysisCache::new(Arc::new(BrokenStore), CacheSettings::default());
        cache.set("k", &1, None);
        assert_eq!(cache.get::<i32>("k"), None);
        cache.remove("k");
        cache.clear();

        assert_eq!(cache.get_or_compute("k", None, || 42), 42);
    }

    #[test]
    fn test_get_or_compute_computes_once() {
        let cache = cache();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            "value".to_string()
        };

        assert_eq!(cache.get_or_compute("k", None, compute), "value");
        assert_eq!(cache.get_or_compute("k", None, compute), "value");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let settings = CacheSettings {
            enabled: false,
            ..Default::default()
        };
        let cache = AnalysisCache::new(Arc::new(InMemoryCacheStore::new(10)), settings);
        cache.set("k", &1, None);
        assert_eq!(cache.get::<i32>("k"), None);
    }

    #[test]
    fn test_statistics_with_non_finite_text_stay_cacheable() {
        use crate::application::use_cases::data_analysis::DataAnalyzer;
        use crate::domain::analysis::{StatisticalSummary, TabularRow};

        let rows = vec![
            TabularRow::new().with("name", "Infinity").with("n", 1),
            TabularRow::new().with("name", "1").with("n", 3),
        ];
        let stats = DataAnalyzer::default().generate_statistical_summary(5, &rows);
        assert!(!stats.columns.contains_key("name"));

        let cache = cache();
        let key = cache.statistics_cache_key(5);
        cache.set(&key, &stats, None);
        assert_eq!(cache.get::<StatisticalSummary>(&key), Some(stats));
    }

    #[test]
    fn test_sliding_default_expiry() {
        let settings = CacheSettings {
            sliding_expiration: true,
            default_ttl_secs: 30,
            ..Default::default()
        };
        let cache = AnalysisCache::new(Arc::new(InMemoryCacheStore::new(10)), settings);
        assert_eq!(
            cache.default_expiry(),
            CacheExpiry::Sliding(Duration::from_secs(30))
        );
    }
}
