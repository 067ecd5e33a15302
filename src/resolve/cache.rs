//! Shared resolution cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::model::Node;

#[derive(Debug, Default)]
struct CacheMaps {
    /// OID -> covering node, `None` remembers a miss
    nodes: HashMap<String, Option<Node>>,
    /// Node OID -> symbolic name
    base_names: HashMap<String, String>,
    /// Queried OID -> formatted label, empty remembers "unresolved"
    labels: HashMap<String, String>,
    /// Source generation the entries were computed against
    generation: u64,
}

impl CacheMaps {
    fn len(&self) -> usize {
        self.nodes.len() + self.base_names.len() + self.labels.len()
    }
}

/// Statistics for the resolution cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    /// Top-level label and node lookups
    pub total_lookups: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
    /// Entries across all three maps
    pub cache_size: usize,
}

/// Node, base-name and label caches behind one reader/writer lock.
///
/// Entries never expire on their own. [`clear`](Self::clear) drops
/// everything; [`sync_generation`](Self::sync_generation) does the same when
/// the underlying node source has changed.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    maps: RwLock<CacheMaps>,
    lookups: AtomicUsize,
    hits: AtomicUsize,
}

impl ResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning is recovered: every write leaves the maps consistent.
    fn read(&self) -> RwLockReadGuard<'_, CacheMaps> {
        self.maps.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheMaps> {
        self.maps.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, hit: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Cached label for a normalized OID. `Some("")` means known unresolved.
    pub fn label(&self, oid: &str) -> Option<String> {
        let found = self.read().labels.get(oid).cloned();
        self.record(found.is_some());
        found
    }

    pub fn insert_label(&self, oid: impl Into<String>, label: impl Into<String>) {
        self.write().labels.insert(oid.into(), label.into());
    }

    /// Cached base name for a node OID. Not counted in the statistics.
    pub fn base_name(&self, oid: &str) -> Option<String> {
        self.read().base_names.get(oid).cloned()
    }

    pub fn insert_base_name(&self, oid: impl Into<String>, name: impl Into<String>) {
        self.write().base_names.insert(oid.into(), name.into());
    }

    /// Cached covering node. `Some(None)` means known to have none.
    pub fn node(&self, oid: &str) -> Option<Option<Node>> {
        let found = self.read().nodes.get(oid).cloned();
        self.record(found.is_some());
        found
    }

    pub fn insert_node(&self, oid: impl Into<String>, node: Option<Node>) {
        self.write().nodes.insert(oid.into(), node);
    }

    /// Drop all entries if `generation` differs from the one they were
    /// computed against. Returns whether anything was invalidated.
    pub fn sync_generation(&self, generation: u64) -> bool {
        if self.read().generation == generation {
            return false;
        }
        let mut maps = self.write();
        if maps.generation == generation {
            return false;
        }
        let dropped = maps.len();
        *maps = CacheMaps {
            generation,
            ..CacheMaps::default()
        };
        tracing::debug!(generation, dropped, "resolution cache invalidated");
        true
    }

    /// Drop every cached entry and reset the statistics.
    pub fn clear(&self) {
        let mut maps = self.write();
        let generation = maps.generation;
        *maps = CacheMaps {
            generation,
            ..CacheMaps::default()
        };
        self.lookups.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.lookups.load(Ordering::Relaxed);
        let hits = self.hits.load(Ordering::Relaxed);
        CacheStats {
            total_lookups: total,
            cache_hits: hits,
            cache_misses: total.saturating_sub(hits),
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            cache_size: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    #[test]
    fn test_negative_label_is_a_hit() {
        let cache = ResolutionCache::new();
        assert_eq!(cache.label("1.2"), None);
        cache.insert_label("1.2", "");
        assert_eq!(cache.label("1.2"), Some(String::new()));

        let stats = cache.stats();
        assert_eq!(stats.total_lookups, 2);
        assert_eq!(stats.cache_hits, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_node_entry() {
        let cache = ResolutionCache::new();
        cache.insert_node("9.9", None);
        assert_eq!(cache.node("9.9"), Some(None));
    }

    #[test]
    fn test_sync_generation_clears_on_change() {
        let cache = ResolutionCache::new();
        cache.insert_base_name("1.3", "org");
        assert!(!cache.sync_generation(0));
        assert_eq!(cache.len(), 1);

        assert!(cache.sync_generation(3));
        assert!(cache.is_empty());
        assert!(!cache.sync_generation(3));
    }

    #[test]
    fn test_clear_resets_stats() {
        let cache = ResolutionCache::new();
        cache.insert_node("1", Some(Node::new("1", "iso", NodeKind::Node)));
        let _ = cache.node("1");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().total_lookups, 0);
    }
}
