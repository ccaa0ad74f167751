//! In-process caching of derived results with a fixed TTL
//!
//! Analytics summaries and other lookups derived from a merged view are
//! cheap to recompute but requested often. This cache keys them by source
//! type, source id, and a hash of the contributing content, expires entries
//! lazily after a fixed TTL, and is invalidated wholesale (never partially)
//! whenever a merge recomputation succeeds.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Entries live for three minutes, inside the 2-5 minute band used across
/// the derived-result caches.
pub const DEFAULT_TTL: Duration = Duration::from_secs(180);

/// Cache key combining the active source and a content fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source_type: String,
    pub source_id: String,
    pub content_hash: u64,
}

impl CacheKey {
    pub fn new(source_type: &str, source_id: &str, content: &impl Hash) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Self {
            source_type: source_type.to_string(),
            source_id: source_id.to_string(),
            content_hash: hasher.finish(),
        }
    }
}

/// TTL cache for derived values.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    entries: Arc<Mutex<HashMap<CacheKey, (Instant, V)>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with an explicit TTL (tests use short ones).
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Get a live entry, or compute and cache it.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Result<V>
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key)? {
            return Ok(value);
        }
        let value = compute();
        self.insert(key, value.clone())?;
        Ok(value)
    }

    /// Get a live entry without computing. Expired entries read as absent.
    pub fn get(&self, key: &CacheKey) -> Result<Option<V>> {
        let entries = self.lock()?;
        Ok(entries.get(key).and_then(|(inserted, value)| {
            if inserted.elapsed() < self.ttl {
                Some(value.clone())
            } else {
                None
            }
        }))
    }

    /// Manually insert a value.
    pub fn insert(&self, key: CacheKey, value: V) -> Result<()> {
        let mut entries = self.lock()?;
        entries.insert(key, (Instant::now(), value));
        Ok(())
    }

    /// Drop every entry. Invalidation is wholesale by contract.
    pub fn invalidate_all(&self) -> Result<()> {
        let mut entries = self.lock()?;
        entries.clear();
        Ok(())
    }

    /// Number of stored entries (live or expired).
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<CacheKey, (Instant, V)>>> {
        self.entries.lock().map_err(|_| Error::LockPoisoned {
            context: "derived-result cache".to_string(),
        })
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
