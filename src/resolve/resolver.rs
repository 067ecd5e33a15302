//! Cached OID name resolution.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::decode::{format_value, FormattedValue};
use crate::error::Result;
use crate::model::{normalize_oid, strip_oid_prefix, Node, SnmpResult};
use crate::store::NodeSource;

use super::cache::{CacheStats, ResolutionCache};
use super::prefix::{candidates, find_covering_node, format_label, nearest_named_ancestor};

/// Resolves numeric OIDs to labels such as `ifDescr[10]`.
///
/// Follows the same longest-prefix rule as
/// [`find_longest_prefix_match`](super::find_longest_prefix_match), backed by a
/// [`ResolutionCache`]. The cache
/// can be shared between resolvers by passing the same `Arc` to
/// [`with_cache`](Self::with_cache).
///
/// Resolution is advisory: store errors are logged and produce an empty label
/// or `None`, and are never cached.
///
/// ```rust,ignore
/// let resolver = OidResolver::new(store);
/// assert_eq!(resolver.resolve_name("1.3.6.1.2.1.2.2.1.2.10"), "ifDescr[10]");
/// ```
#[derive(Debug)]
pub struct OidResolver<S: NodeSource> {
    source: S,
    cache: Arc<ResolutionCache>,
    invalidate_on_change: bool,
}

impl<S: NodeSource> OidResolver<S> {
    /// Create a resolver with a fresh cache.
    pub fn new(source: S) -> Self {
        Self::with_cache(source, Arc::new(ResolutionCache::new()))
    }

    /// Create a resolver over an existing cache.
    ///
    /// The cache is brought up to date with the source lazily, on the first
    /// lookup, and only while invalidation is enabled.
    pub fn with_cache(source: S, cache: Arc<ResolutionCache>) -> Self {
        Self {
            source,
            cache,
            invalidate_on_change: true,
        }
    }

    /// Create a resolver configured from the `resolver` config section.
    pub fn from_config(source: S, config: &ResolverConfig) -> Self {
        Self::new(source).invalidate_on_module_change(config.invalidate_on_module_change)
    }

    /// Whether to drop cached entries when the source's node set changes.
    #[must_use]
    pub fn invalidate_on_module_change(mut self, enabled: bool) -> Self {
        self.invalidate_on_change = enabled;
        self
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn refresh(&self) {
        if self.invalidate_on_change {
            self.cache.sync_generation(self.source.generation());
        }
    }

    /// Resolve an OID to a display label, or an empty string if nothing
    /// covering it is loaded.
    pub fn resolve_name(&self, oid: &str) -> String {
        self.refresh();
        let key = normalize_oid(oid);
        if key.is_empty() {
            return String::new();
        }
        if let Some(label) = self.cache.label(&key) {
            return label;
        }

        tracing::debug!(oid = %key, "resolution cache miss");
        match self.resolve_uncached(&key) {
            Ok(label) => {
                self.cache.insert_label(key, label.clone());
                label
            }
            Err(e) => {
                tracing::warn!(oid = %key, error = %e, "failed to resolve OID name");
                String::new()
            }
        }
    }

    /// Walk the candidates longest first. Each prefix is answered from the
    /// base-name cache when possible and from the source otherwise, before
    /// any shorter prefix is considered.
    fn resolve_uncached(&self, key: &str) -> Result<String> {
        let mut probed = HashSet::new();
        for candidate in candidates(key) {
            let prefix = normalize_oid(&candidate.prefix);
            if !probed.insert(prefix.clone()) {
                continue;
            }
            if let Some(base) = self.cache.base_name(&prefix) {
                return Ok(format_label(&base, &candidate.suffix));
            }
            if let Some(node) = self.source.node_exact(&prefix)? {
                if !node.name.is_empty() {
                    let label = format_label(&node.name, &candidate.suffix);
                    self.cache.insert_base_name(prefix, node.name);
                    return Ok(label);
                }
            }
        }

        let Some(found) = nearest_named_ancestor(&self.source, key)? else {
            return Ok(String::new());
        };
        if strip_oid_prefix(key, &found.node.oid).is_some() {
            self.cache
                .insert_base_name(found.node.oid.clone(), found.node.name.clone());
        }
        Ok(found.label())
    }

    /// The loaded node with the longest OID prefix of `oid`.
    pub fn lookup_node(&self, oid: &str) -> Option<Node> {
        self.refresh();
        let key = normalize_oid(oid);
        if key.is_empty() {
            return None;
        }
        if let Some(cached) = self.cache.node(&key) {
            return cached;
        }

        match find_covering_node(&self.source, &key) {
            Ok(node) => {
                self.cache.insert_node(key, node.clone());
                node
            }
            Err(e) => {
                tracing::warn!(oid = %key, error = %e, "failed to look up node for OID");
                None
            }
        }
    }

    /// Decode a protocol result using the syntax of its covering node.
    pub fn format_result(&self, result: &SnmpResult) -> FormattedValue {
        let syntax = self
            .lookup_node(&result.oid)
            .map(|node| node.syntax)
            .unwrap_or_default();
        format_value(&result.value, &result.value_type, &syntax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::NodeKind;
    use crate::store::MemoryNodes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts exact lookups so tests can tell cache hits from store queries.
    struct Counting {
        inner: MemoryNodes,
        queries: AtomicUsize,
    }

    impl NodeSource for Counting {
        fn node_exact(&self, oid: &str) -> Result<Option<Node>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.node_exact(oid)
        }

        fn get_children(&self, oid: &str) -> Result<Vec<Node>> {
            self.inner.get_children(oid)
        }

        fn generation(&self) -> u64 {
            self.inner.generation()
        }
    }

    fn counting() -> Counting {
        let inner = [
            Node::new("1.3.6.1.2.1.1.5", "sysName", NodeKind::Scalar),
            Node::new("1.3.6.1.2.1.2.2.1.2", "ifDescr", NodeKind::Column),
        ]
        .into_iter()
        .collect();
        Counting {
            inner,
            queries: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_second_resolution_hits_cache() {
        let resolver = OidResolver::new(counting());
        assert_eq!(resolver.resolve_name("1.3.6.1.2.1.2.2.1.2.10"), "ifDescr[10]");
        let after_first = resolver.source().queries.load(Ordering::SeqCst);
        assert!(after_first > 0);

        assert_eq!(resolver.resolve_name("1.3.6.1.2.1.2.2.1.2.10"), "ifDescr[10]");
        assert_eq!(resolver.source().queries.load(Ordering::SeqCst), after_first);
        assert_eq!(resolver.cache_stats().cache_hits, 1);
    }

    #[test]
    fn test_sibling_index_uses_base_name_cache() {
        let resolver = OidResolver::new(counting());
        resolver.resolve_name("1.3.6.1.2.1.2.2.1.2.1");
        let before = resolver.source().queries.load(Ordering::SeqCst);

        // Only the full instance OID is probed; the column name comes from cache
        assert_eq!(resolver.resolve_name(".1.3.6.1.2.1.2.2.1.2.2"), "ifDescr[2]");
        assert_eq!(resolver.source().queries.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn test_cached_parent_does_not_shadow_longer_match() {
        let mut source = counting();
        source
            .inner
            .insert(Node::new("1.3.6.1.2.1.1", "system", NodeKind::Node));
        let resolver = OidResolver::new(source);

        assert_eq!(resolver.resolve_name("1.3.6.1.2.1.1"), "system");
        assert_eq!(resolver.resolve_name("1.3.6.1.2.1.1.5.0"), "sysName");
        assert_eq!(resolver.resolve_name("1.3.6.1.2.1.1.7.0"), "system[7.0]");
    }

    #[test]
    fn test_unresolved_is_negatively_cached() {
        let resolver = OidResolver::new(counting());
        assert_eq!(resolver.resolve_name("2.25.1"), "");
        let before = resolver.source().queries.load(Ordering::SeqCst);
        assert_eq!(resolver.resolve_name("2.25.1"), "");
        assert_eq!(resolver.source().queries.load(Ordering::SeqCst), before);
    }

    #[test]
    fn test_lookup_node_caches_misses() {
        let resolver = OidResolver::new(counting());
        assert!(resolver.lookup_node("9.9.9").is_none());
        let before = resolver.source().queries.load(Ordering::SeqCst);
        assert!(resolver.lookup_node("9.9.9").is_none());
        assert_eq!(resolver.source().queries.load(Ordering::SeqCst), before);
    }

    #[test]
    fn test_invalidation_on_source_change() {
        let mut source = MemoryNodes::new();
        source.insert(Node::new("1.3.6.1.2.1.1.5", "sysName", NodeKind::Scalar));
        let cache = Arc::new(ResolutionCache::new());

        let resolver = OidResolver::with_cache(&source, Arc::clone(&cache));
        assert_eq!(resolver.resolve_name("1.3.6.1.2.1.1.1.0"), "");
        drop(resolver);

        source.insert(Node::new("1.3.6.1.2.1.1.1", "sysDescr", NodeKind::Scalar));
        let resolver = OidResolver::with_cache(&source, cache);
        assert_eq!(resolver.resolve_name("1.3.6.1.2.1.1.1.0"), "sysDescr");
    }

    #[test]
    fn test_format_result_uses_node_syntax() {
        let source: MemoryNodes = [Node::new("1.3.6.1.2.1.1.3", "sysUpTime", NodeKind::Scalar)
            .with_syntax("TimeTicks")]
        .into_iter()
        .collect();
        let resolver = OidResolver::new(source);
        let result = SnmpResult::new("1.3.6.1.2.1.1.3.0", "8640000", "Integer");
        let formatted = resolver.format_result(&result);
        assert!(formatted.formatted);
        assert_eq!(formatted.text, "1d 0h 0m 0.00s");
    }
}
