//! Keep-alive retention of mounted tab content.
//!
//! [`KeepAliveCache`] holds the mounted view of every open tab, keyed by the
//! tab's path, so switching tabs shows the retained view again instead of
//! building a fresh one. Only the active tab's entry is rendered; the others
//! stay mounted and keep their scroll position, form input and local state.
//!
//! Entries leave the cache in three ways:
//!
//! - [`evict`](KeepAliveCache::evict) when the owning tab closes,
//! - [`evict_all`](KeepAliveCache::evict_all) on logout,
//! - capacity pressure: the cache is an [`lru`] cache, so opening more tabs
//!   than the capacity drops the least recently activated entry. That tab
//!   stays open and is mounted again the next time it is activated.
//!
//! [`KeepAliveStats`] tracks hits, misses and evictions.
//!
//! # Examples
//!
//! ```
//! use gpui_workbench::keep_alive::KeepAliveCache;
//!
//! let mut cache = KeepAliveCache::with_capacity(8);
//! let mut mounts = 0;
//! cache.get_or_create("/users", || { mounts += 1; "users view" });
//! cache.get_or_create("/users", || { mounts += 1; "users view" });
//!
//! assert_eq!(mounts, 1);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::{debug_log, trace_log};
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;

/// Counters tracking keep-alive effectiveness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepAliveStats {
    /// Lookups that found a retained view.
    pub hits: usize,
    /// Lookups that had to mount a new view.
    pub misses: usize,
    /// Entries removed by explicit eviction (tab close, logout).
    pub evictions: usize,
    /// Entries dropped because the cache was full.
    pub capacity_evictions: usize,
}

impl KeepAliveStats {
    /// Hit rate as a value in `0.0..=1.0`, or `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bounded cache of mounted views keyed by tab path.
pub struct KeepAliveCache<V> {
    entries: LruCache<String, V>,
    stats: KeepAliveStats,
}

impl<V> KeepAliveCache<V> {
    /// Default number of retained views.
    pub const DEFAULT_CAPACITY: usize = 32;

    /// Create a cache with [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` views (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: KeepAliveStats::default(),
        }
    }

    /// Return the view retained for `key`, mounting it with `factory` if absent.
    ///
    /// `factory` runs at most once per key while the entry is alive.
    pub fn get_or_create<F>(&mut self, key: &str, factory: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        if self.entries.contains(key) {
            self.stats.hits += 1;
            trace_log!("Keep-alive hit for '{}'", key);
        } else {
            self.stats.misses += 1;
            trace_log!("Keep-alive miss for '{}', mounting", key);
            self.make_room();
        }
        self.entries.get_or_insert_mut(key.to_string(), factory)
    }

    /// Look up a retained view, marking it most recently activated.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let found = self.entries.get(key);
        if found.is_some() {
            self.stats.hits += 1;
            trace_log!("Keep-alive hit for '{}'", key);
        } else {
            self.stats.misses += 1;
            trace_log!("Keep-alive miss for '{}'", key);
        }
        found
    }

    /// Store a view mounted outside the cache, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, view: V) {
        let key = key.into();
        if !self.entries.contains(&key) {
            self.make_room();
        }
        debug_log!("Retaining view for '{}'", key);
        self.entries.put(key, view);
    }

    /// Mark `key` as the most recently activated entry.
    pub fn touch(&mut self, key: &str) {
        self.entries.promote(key);
    }

    /// Whether a view is retained for `key` (does not affect recency).
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Drop the view retained for `key`.
    pub fn evict(&mut self, key: &str) -> Option<V> {
        let view = self.entries.pop(key);
        if view.is_some() {
            self.stats.evictions += 1;
            debug_log!("Evicted keep-alive entry '{}'", key);
        }
        view
    }

    /// Drop every entry whose key fails `keep`.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: Fn(&str) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| !keep(key.as_str()))
            .map(|(key, _)| key.clone())
            .collect();
        for key in doomed {
            self.evict(&key);
        }
    }

    /// Drop every entry.
    pub fn evict_all(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.evictions += count;
        debug_log!("Evicted all {} keep-alive entries", count);
    }

    /// Retained keys, most recently activated first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Number of retained views
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is retained
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained views
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Current statistics
    pub const fn stats(&self) -> &KeepAliveStats {
        &self.stats
    }

    /// Reset all counters to zero
    pub fn reset_stats(&mut self) {
        self.stats = KeepAliveStats::default();
    }

    fn make_room(&mut self) {
        if self.entries.len() < self.capacity() {
            return;
        }
        if let Some((key, _)) = self.entries.pop_lru() {
            self.stats.capacity_evictions += 1;
            debug_log!(
                "Keep-alive full ({} entries), dropped least recent '{}'",
                self.capacity(),
                key
            );
        }
    }
}

impl<V> Default for KeepAliveCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for KeepAliveCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeepAliveCache")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_factory_runs_once_per_key() {
        let mut cache = KeepAliveCache::new();
        let calls = Cell::new(0);

        for _ in 0..3 {
            cache.get_or_create("/users", || {
                calls.set(calls.get() + 1);
                String::from("users")
            });
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 2);
    }

    #[test]
    fn test_retained_state_is_mutable() {
        let mut cache = KeepAliveCache::new();
        *cache.get_or_create("/counter", || 0_u32) += 5;
        assert_eq!(*cache.get_or_create("/counter", || 0), 5);
    }

    #[test]
    fn test_evict_then_remount() {
        let mut cache = KeepAliveCache::new();
        cache.get_or_create("/files", || 1);
        assert_eq!(cache.evict("/files"), Some(1));
        assert!(!cache.contains("/files"));
        assert_eq!(cache.evict("/files"), None);

        assert_eq!(*cache.get_or_create("/files", || 2), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_capacity_drops_least_recent() {
        let mut cache = KeepAliveCache::with_capacity(2);
        cache.get_or_create("/a", || 'a');
        cache.get_or_create("/b", || 'b');
        cache.touch("/a");
        cache.get_or_create("/c", || 'c');

        assert!(cache.contains("/a"));
        assert!(!cache.contains("/b"));
        assert!(cache.contains("/c"));
        assert_eq!(cache.stats().capacity_evictions, 1);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache: KeepAliveCache<()> = KeepAliveCache::with_capacity(0);
        assert_eq!(cache.capacity(), 1);
    }

    #[test]
    fn test_retain_and_evict_all() {
        let mut cache = KeepAliveCache::new();
        for key in ["/", "/a", "/b"] {
            cache.insert(key, key.len());
        }
        cache.retain(|key| key == "/" || key == "/b");
        let mut keys: Vec<_> = cache.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["/", "/b"]);

        cache.evict_all();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().evictions, 3);
    }

    #[test]
    fn test_split_get_and_insert() {
        let mut cache = KeepAliveCache::new();
        assert!(cache.get("/users").is_none());
        cache.insert("/users", "view");
        assert_eq!(cache.get("/users"), Some(&"view"));
        assert!((cache.stats().hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
