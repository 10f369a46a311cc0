//! Bounded LRU store for rendered artifacts

use crate::config::CacheConfig;
use crate::generator::GeneratedObject;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry {
    artifact: Arc<GeneratedObject>,
    inserted_at: Instant,
}

/// Snapshot of cache occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub object_count: usize,
    pub animated_count: usize,
    pub max_size: usize,
    pub ttl_minutes: u64,
    pub enabled: bool,
}

/// Thread-safe cache of generated images keyed by configuration
///
/// Eviction happens under the same lock as insertion, so the store never
/// holds more than `max_size` entries. A disabled cache misses every lookup
/// and drops every store.
pub struct GenerationCache {
    config: CacheConfig,
    ttl: Option<Duration>,
    entries: Option<Mutex<LruCache<String, CacheEntry>>>,
}

impl GenerationCache {
    pub fn new(config: CacheConfig) -> Self {
        let entries = config.enabled.then(|| {
            let capacity = NonZeroUsize::new(config.max_size).unwrap_or(NonZeroUsize::MIN);
            Mutex::new(LruCache::new(capacity))
        });
        let ttl = (config.ttl_minutes > 0).then(|| Duration::from_secs(config.ttl_minutes.saturating_mul(60)));
        Self { config, ttl, entries }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(CacheConfig::default())
    }

    /// Expire entries `ttl` after they are written, overriding `ttl_minutes`.
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    fn lock(entries: &Mutex<LruCache<String, CacheEntry>>) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl.is_some_and(|ttl| entry.inserted_at.elapsed() >= ttl)
    }

    pub fn get(&self, key: &str) -> Option<Arc<GeneratedObject>> {
        let entries = self.entries.as_ref()?;
        let mut entries = Self::lock(entries);

        let expired = match entries.get(key) {
            Some(entry) if !self.is_expired(entry) => {
                debug!("Generator cache hit for key '{}'", key);
                return Some(Arc::clone(&entry.artifact));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            debug!("Generator cache entry expired for key '{}'", key);
        }
        debug!("Generator cache miss for key '{}'", key);
        None
    }

    pub fn put(&self, key: impl Into<String>, artifact: Arc<GeneratedObject>) {
        let Some(entries) = self.entries.as_ref() else {
            return;
        };
        let key = key.into();
        debug!("Stored generated object in cache with key '{}'", key);
        Self::lock(entries).put(key, CacheEntry { artifact, inserted_at: Instant::now() });
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| Self::lock(entries).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Some(entries) = self.entries.as_ref() {
            Self::lock(entries).clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let (object_count, animated_count) = match self.entries.as_ref() {
            Some(entries) => {
                let entries = Self::lock(entries);
                let animated = entries.iter().filter(|(_, e)| e.artifact.is_animated()).count();
                (entries.len(), animated)
            }
            None => (0, 0),
        };

        CacheStats {
            object_count,
            animated_count,
            max_size: self.config.max_size,
            ttl_minutes: self.config.ttl_minutes,
            enabled: self.is_enabled(),
        }
    }
}

impl Default for GenerationCache {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for GenerationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationCache").field("config", &self.config).field("len", &self.len()).finish()
    }
}
