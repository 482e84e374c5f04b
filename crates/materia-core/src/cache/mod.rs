//! In-memory TTL cache for formula pools and rankings
//!
//! A cache is an ordinary value: construct it, wrap it in an `Arc` and hand it
//! to whoever needs it. Expired entries are never returned; they are removed
//! when read and by an optional background sweeper.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Hit/miss counters for one cache
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hit rate as a percentage (0.0-100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            0.0
        } else {
            (self.hits() as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    /// `None` when `now + ttl` does not fit in an `Instant`: never expires
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        !matches!(self.expires_at, Some(at) if at <= now)
    }
}

/// Key-value store with per-entry expiration
///
/// Uses [`DashMap`] so concurrent lookups for different formulas do not
/// contend on a single lock.
pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            stats: CacheStats::default(),
        }
    }

    /// Get a live value; an expired entry is removed and reported absent
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();

        let live = match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(entry) => {
                // the read guard must be released before removing
                drop(entry);
                self.entries.remove_if(key, |_, entry| !entry.is_live(now));
                None
            }
            None => None,
        };

        match live {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        live
    }

    /// Store a value that expires after `ttl`, replacing any previous value
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let expires_at = self.clock.now().checked_add(ttl);
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Whether a live value exists; expired entries are removed
    pub fn has(&self, key: &K) -> bool {
        let now = self.clock.now();
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        self.entries.contains_key(key)
    }

    /// Remove an entry, returning whether one was present
    pub fn delete(&self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Return the cached value for `key`, or run `producer` once and cache
    /// its result.
    ///
    /// A producer error is returned as-is and nothing is cached. No shard
    /// lock is held while the producer runs, so concurrent misses on one key
    /// may each produce; the last store wins.
    pub fn cached_fetch<E, F>(&self, key: K, ttl: Duration, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = producer()?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Start a background thread purging expired entries every `interval`.
    ///
    /// The thread holds only a weak reference and exits once the cache is
    /// dropped or the returned handle is stopped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> SweeperHandle {
        let cache: Weak<Self> = Arc::downgrade(self);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || loop {
            thread::park_timeout(interval);
            if stop_flag.load(Ordering::Relaxed) {
                break;
            }
            let Some(cache) = cache.upgrade() else {
                break;
            };
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "cache_sweep");
            }
        });

        SweeperHandle {
            stop,
            handle: Some(handle),
        }
    }
}

/// Handle to a background sweeper; stops the thread when dropped
pub struct SweeperHandle {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
