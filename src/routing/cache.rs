//! Resolved route cache.
//!
//! # Responsibilities
//! - Map a concrete runtime type to its merged route table
//! - Compute missing entries lazily (collect + merge)
//! - Accept explicit pre-registrations
//!
//! # Design Decisions
//! - DashMap shards give lock-free-in-practice reads under concurrency
//! - No lock is held while collecting; racing misses both compute and the last
//!   insert wins (results are value-equal for a fixed model)
//! - Entries are replaced whole, never mutated

use dashmap::DashMap;
use std::sync::Arc;

use crate::hierarchy::TypeKey;
use crate::observability::metrics;
use crate::routing::merger::merge;
use crate::routing::model::ResourceModel;
use crate::routing::table::RouteTable;

/// Process-wide cache of merged route tables, keyed by concrete type.
#[derive(Debug, Clone, Default)]
pub struct ResolvedRouteCache {
    inner: Arc<DashMap<TypeKey, Arc<RouteTable>>>,
}

impl ResolvedRouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the merged table for `ty`, computing it on first use.
    pub fn resolve(&self, ty: &TypeKey, model: &ResourceModel) -> Arc<RouteTable> {
        if let Some(hit) = self.get(ty) {
            metrics::record_cache_lookup(true);
            return hit;
        }
        metrics::record_cache_lookup(false);

        let contributions = model.collector().collect(ty);
        let merged = Arc::new(merge(&contributions));
        tracing::debug!(
            ty = %ty,
            contributions = contributions.len(),
            methods = merged.len(),
            routes = merged.route_count(),
            "Resolved route table"
        );

        self.inner.insert(ty.clone(), merged.clone());
        metrics::record_cache_size(self.inner.len());
        merged
    }

    /// Install a table for `ty`, bypassing collection.
    pub fn install(&self, ty: impl Into<TypeKey>, table: RouteTable) {
        self.inner.insert(ty.into(), Arc::new(table));
        metrics::record_cache_size(self.inner.len());
    }

    /// Cached entry for `ty`, if any.
    pub fn get(&self, ty: &TypeKey) -> Option<Arc<RouteTable>> {
        self.inner.get(ty).map(|entry| entry.value().clone())
    }

    /// Resolve every declared concrete type up front.
    pub fn prewarm(&self, model: &ResourceModel) -> usize {
        let mut resolved = 0;
        for ty in model.hierarchy().concrete_types() {
            self.resolve(ty, model);
            resolved += 1;
        }
        tracing::info!(types = resolved, "Route cache prewarmed");
        resolved
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::TypeHierarchy;
    use crate::routing::endpoint::Endpoint;
    use crate::routing::registry::RouteRegistry;
    use axum::http::Method;

    fn key(s: &str) -> TypeKey {
        TypeKey::new(s)
    }

    fn model() -> ResourceModel {
        let hierarchy = TypeHierarchy::builder()
            .capability("Listable", Vec::<TypeKey>::new())
            .concrete("Orders", None, ["Listable"])
            .concrete("Empty", None, Vec::<TypeKey>::new())
            .build()
            .unwrap();
        let mut registry = RouteRegistry::new();
        registry
            .register(
                "Orders",
                RouteTable::builder()
                    .route(Method::GET, "/{id}", Endpoint::resource("get"))
                    .unwrap()
                    .build(),
            )
            .register(
                "Listable",
                RouteTable::builder()
                    .route(Method::GET, "/", Endpoint::resource("list"))
                    .unwrap()
                    .build(),
            );
        ResourceModel::new(hierarchy, registry)
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = ResolvedRouteCache::new();
        let model = model();
        assert!(cache.get(&key("Orders")).is_none());

        let first = cache.resolve(&key("Orders"), &model);
        assert_eq!(first.route_count(), 2);
        let second = cache.resolve(&key("Orders"), &model);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unregistered_type_resolves_empty() {
        let cache = ResolvedRouteCache::new();
        let table = cache.resolve(&key("Empty"), &model());
        assert!(table.is_empty());
    }

    #[test]
    fn test_install_takes_priority() {
        let cache = ResolvedRouteCache::new();
        let custom = RouteTable::builder()
            .route(Method::DELETE, "/", Endpoint::resource("purge"))
            .unwrap()
            .build();
        cache.install("Orders", custom.clone());

        let resolved = cache.resolve(&key("Orders"), &model());
        assert_eq!(*resolved, custom);
        assert!(resolved.get(&Method::GET).is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = ResolvedRouteCache::new();
        let other = cache.clone();
        cache.resolve(&key("Orders"), &model());
        assert!(other.get(&key("Orders")).is_some());
    }

    #[test]
    fn test_concurrent_resolution_is_value_equal() {
        let cache = ResolvedRouteCache::new();
        let model = model();
        let results: Vec<Arc<RouteTable>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.resolve(&key("Orders"), &model)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for table in &results {
            assert_eq!(**table, *results[0]);
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_prewarm() {
        let cache = ResolvedRouteCache::new();
        assert_eq!(cache.prewarm(&model()), 2);
        assert_eq!(cache.len(), 2);
    }
}
