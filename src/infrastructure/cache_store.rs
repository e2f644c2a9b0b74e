use crate::domain::error::{AppError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How long an entry lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheExpiry {
    /// Expires a fixed time after it was written
    Absolute(Duration),
    /// Expires after going unread for the given time
    Sliding(Duration),
}

impl CacheExpiry {
    fn duration(&self) -> Duration {
        match self {
            CacheExpiry::Absolute(d) | CacheExpiry::Sliding(d) => *d,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub value: Value,
    pub expiry: CacheExpiry,
    created_at: Instant,
    last_access: Instant,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, value: Value, expiry: CacheExpiry) -> Self {
        let now = Instant::now();
        Self {
            key: key.into(),
            value,
            expiry,
            created_at: now,
            last_access: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        let anchor = match self.expiry {
            CacheExpiry::Absolute(_) => self.created_at,
            CacheExpiry::Sliding(_) => self.last_access,
        };
        anchor.elapsed() >= self.expiry.duration()
    }
}

/// Shared key-value store behind the analysis cache. Implementations must be
/// safe for concurrent single-key get/set/remove; a `set` on an existing key
/// replaces it (last writer wins).
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, entry: CacheEntry) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Drop roughly `percentage` (0.0 - 1.0) of entries, expired ones first.
    /// `compact(1.0)` empties the store.
    fn compact(&self, percentage: f64) -> Result<()>;
}

struct StoreState {
    entries: HashMap<String, CacheEntry>,
    access_order: Vec<String>,
    hits: usize,
    misses: usize,
}

/// Process-local store with TTL and LRU eviction
pub struct InMemoryCacheStore {
    state: Mutex<StoreState>,
    max_entries: usize,
}

impl InMemoryCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::new(),
                access_order: Vec::new(),
                hits: 0,
                misses: 0,
            }),
            max_entries: max_entries.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| AppError::CacheError("cache store lock poisoned".to_string()))
    }

    /// Remove expired entries
    pub fn cleanup_expired(&self) -> Result<usize> {
        let mut state = self.lock()?;
        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.entries.remove(key);
            state.access_order.retain(|k| k != key);
        }
        Ok(expired.len())
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let state = self.lock()?;
        let total_requests = state.hits + state.misses;
        let hit_rate = if total_requests > 0 {
            state.hits as f32 / total_requests as f32
        } else {
            0.0
        };

        Ok(CacheStats {
            total_entries: state.entries.len(),
            valid_entries: state.entries.values().filter(|e| !e.is_expired()).count(),
            max_entries: self.max_entries,
            hits: state.hits,
            misses: state.misses,
            hit_rate,
        })
    }
}

impl StoreState {
    fn touch(&mut self, key: &str) {
        self.access_order.retain(|k| k != key);
        self.access_order.push(key.to_string());
    }

    fn drop_key(&mut self, key: &str) {
        self.entries.remove(key);
        self.access_order.retain(|k| k != key);
    }
}

impl CacheStore for InMemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut state = self.lock()?;

        let expired = match state.entries.get_mut(key) {
            Some(entry) if !entry.is_expired() => {
                entry.last_access = Instant::now();
                let value = entry.value.clone();
                state.hits += 1;
                state.touch(key);
                return Ok(Some(value));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            state.drop_key(key);
        }
        state.misses += 1;
        Ok(None)
    }

    fn set(&self, entry: CacheEntry) -> Result<()> {
        let mut state = self.lock()?;
        let key = entry.key.clone();

        if !state.entries.contains_key(&key) {
            while state.entries.len() >= self.max_entries && !state.access_order.is_empty() {
                let oldest = state.access_order.remove(0);
                state.entries.remove(&oldest);
            }
        }

        state.entries.insert(key.clone(), entry);
        state.touch(&key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.drop_key(key);
        Ok(())
    }

    fn compact(&self, percentage: f64) -> Result<()> {
        let mut state = self.lock()?;

        if percentage >= 1.0 {
            state.entries.clear();
            state.access_order.clear();
            state.hits = 0;
            state.misses = 0;
            return Ok(());
        }

        let target = (state.entries.len() as f64 * percentage.max(0.0)).ceil() as usize;
        let mut victims: Vec<String> = state
            .entries
            .values()
            .filter(|e| e.is_expired())
            .map(|e| e.key.clone())
            .collect();
        // Then least recently used
        for key in state.access_order.iter() {
            if victims.len() >= target {
                break;
            }
            if !victims.contains(key) {
                victims.push(key.clone());
            }
        }

        for key in victims {
            state.drop_key(&key);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub max_entries: usize,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    fn entry(key: &str, value: Value) -> CacheEntry {
        CacheEntry::new(key, value, CacheExpiry::Absolute(Duration::from_secs(60)))
    }

    #[test]
    fn test_set_get_remove() {
        let store = InMemoryCacheStore::new(10);
        store.set(entry("a", json!(1))).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(json!(1)));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_last_writer_wins() {
        let store = InMemoryCacheStore::new(10);
        store.set(entry("k", json!("first"))).unwrap();
        store.set(entry("k", json!("second"))).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!("second")));
        assert_eq!(store.stats().unwrap().total_entries, 1);
    }

    #[test]
    fn test_absolute_expiry() {
        let store = InMemoryCacheStore::new(10);
        store
            .set(CacheEntry::new(
                "short",
                json!(true),
                CacheExpiry::Absolute(Duration::from_millis(20)),
            ))
            .unwrap();
        sleep(Duration::from_millis(40));
        assert_eq!(store.get("short").unwrap(), None);
    }

    #[test]
    fn test_sliding_expiry_extends_on_read() {
        let store = InMemoryCacheStore::new(10);
        store
            .set(CacheEntry::new(
                "slide",
                json!(1),
                CacheExpiry::Sliding(Duration::from_millis(400)),
            ))
            .unwrap();
        for _ in 0..3 {
            sleep(Duration::from_millis(100));
            assert!(store.get("slide").unwrap().is_some());
        }
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let store = InMemoryCacheStore::new(2);
        store.set(entry("a", json!(1))).unwrap();
        store.set(entry("b", json!(2))).unwrap();
        store.get("a").unwrap();
        store.set(entry("c", json!(3))).unwrap();

        assert!(store.get("a").unwrap().is_some());
        assert!(store.get("b").unwrap().is_none());
        assert!(store.get("c").unwrap().is_some());
    }

    #[test]
    fn test_full_compaction_empties_store() {
        let store = InMemoryCacheStore::new(10);
        store.set(entry("a", json!(1))).unwrap();
        store.set(entry("b", json!(2))).unwrap();
        store.get("a").unwrap();

        store.compact(1.0).unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_partial_compaction_drops_least_recent() {
        let store = InMemoryCacheStore::new(10);
        for key in ["a", "b", "c", "d"] {
            store.set(entry(key, json!(key))).unwrap();
        }
        store.compact(0.5).unwrap();
        assert!(store.get("a").unwrap().is_none());
        assert!(store.get("b").unwrap().is_none());
        assert!(store.get("d").unwrap().is_some());
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let store = InMemoryCacheStore::new(10);
        store.set(entry("a", json!(1))).unwrap();
        store.get("a").unwrap();
        store.get("missing").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }
}
