//! Route collection over a type's ancestry.
//!
//! # Traversal
//! ```text
//! walk(T):
//!     T is root or absent          → stop
//!     registry[T] exists           → push it, remember "own registration"
//!     for each capability C of T   → visit(C)
//!     no own registration          → walk(base(T))
//!
//! visit(C):
//!     C already seen               → skip
//!     mark C seen, push registry[C] if present
//!     for each super-capability S of C → visit(S)
//! ```
//!
//! # Design Decisions
//! - Capability sets are always explored, even below a registered type
//! - Base-type climbing stops at the first type with its own registration
//! - One visited set per collection; diamonds contribute once
//! - Output order: own table, then capabilities depth-first, then the base chain

use std::collections::HashSet;
use std::sync::Arc;

use crate::hierarchy::{TypeHierarchy, TypeKey};
use crate::routing::registry::RouteRegistry;
use crate::routing::table::RouteTable;

/// Walks a [`TypeHierarchy`] collecting directly-registered tables.
#[derive(Debug, Clone, Copy)]
pub struct RouteCollector<'a> {
    hierarchy: &'a TypeHierarchy,
    registry: &'a RouteRegistry,
}

impl<'a> RouteCollector<'a> {
    pub fn new(hierarchy: &'a TypeHierarchy, registry: &'a RouteRegistry) -> Self {
        Self { hierarchy, registry }
    }

    /// Tables contributing to `ty`, in merge order.
    pub fn collect(&self, ty: &TypeKey) -> Vec<Arc<RouteTable>> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        self.walk(Some(ty), &mut found, &mut seen);
        tracing::trace!(ty = %ty, contributions = found.len(), "Collected route tables");
        found
    }

    fn walk(&self, ty: Option<&TypeKey>, found: &mut Vec<Arc<RouteTable>>, seen: &mut HashSet<&'a TypeKey>) {
        let Some(ty) = ty.filter(|t| !self.hierarchy.is_root(t)) else {
            return;
        };

        let own = self.registry.get(ty);
        if let Some(table) = own {
            tracing::trace!(ty = %ty, "Own registration");
            found.push(table.clone());
        }

        for capability in self.hierarchy.capabilities_of(ty) {
            self.visit_capability(capability, found, seen);
        }

        if own.is_none() {
            self.walk(self.hierarchy.base_of(ty), found, seen);
        }
    }

    fn visit_capability(
        &self,
        capability: &'a TypeKey,
        found: &mut Vec<Arc<RouteTable>>,
        seen: &mut HashSet<&'a TypeKey>,
    ) {
        if !seen.insert(capability) {
            return;
        }
        if let Some(table) = self.registry.get(capability) {
            tracing::trace!(capability = %capability, "Capability registration");
            found.push(table.clone());
        }
        for parent in self.hierarchy.capabilities_of(capability) {
            self.visit_capability(parent, found, seen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::endpoint::Endpoint;
    use axum::http::Method;

    fn key(s: &str) -> TypeKey {
        TypeKey::new(s)
    }

    fn table(name: &str) -> RouteTable {
        RouteTable::builder()
            .route(Method::GET, "/", Endpoint::resource(name))
            .unwrap()
            .build()
    }

    fn names(found: &[Arc<RouteTable>]) -> Vec<String> {
        found
            .iter()
            .map(|t| t.get(&Method::GET).unwrap().paths()[0].endpoint.name().to_string())
            .collect()
    }

    #[test]
    fn test_nothing_registered() {
        let h = TypeHierarchy::builder()
            .concrete("A", None, Vec::<TypeKey>::new())
            .build()
            .unwrap();
        let r = RouteRegistry::new();
        assert!(RouteCollector::new(&h, &r).collect(&key("A")).is_empty());
    }

    #[test]
    fn test_root_contributes_nothing() {
        let h = TypeHierarchy::builder().build().unwrap();
        let mut r = RouteRegistry::new();
        r.register("object", table("root"));
        assert!(RouteCollector::new(&h, &r).collect(&key("object")).is_empty());
    }

    #[test]
    fn test_undeclared_type_uses_own_registration() {
        let h = TypeHierarchy::builder().build().unwrap();
        let mut r = RouteRegistry::new();
        r.register("Loose", table("loose"));
        let found = RouteCollector::new(&h, &r).collect(&key("Loose"));
        assert_eq!(names(&found), vec!["loose"]);
    }

    #[test]
    fn test_base_chain_stops_at_first_registration() {
        let h = TypeHierarchy::builder()
            .concrete("A", None, Vec::<TypeKey>::new())
            .concrete("B", Some(key("A")), Vec::<TypeKey>::new())
            .concrete("C", Some(key("B")), Vec::<TypeKey>::new())
            .build()
            .unwrap();
        let mut r = RouteRegistry::new();
        r.register("A", table("a")).register("B", table("b"));

        let found = RouteCollector::new(&h, &r).collect(&key("C"));
        assert_eq!(names(&found), vec!["b"]);
    }

    #[test]
    fn test_climbs_past_unregistered_ancestors() {
        let h = TypeHierarchy::builder()
            .capability("Mid", Vec::<TypeKey>::new())
            .concrete("A", None, Vec::<TypeKey>::new())
            .concrete("B", Some(key("A")), ["Mid"])
            .concrete("C", Some(key("B")), Vec::<TypeKey>::new())
            .build()
            .unwrap();
        let mut r = RouteRegistry::new();
        r.register("A", table("a")).register("Mid", table("mid"));

        // B's capability is visited before climbing to A
        let found = RouteCollector::new(&h, &r).collect(&key("C"));
        assert_eq!(names(&found), vec!["mid", "a"]);
    }

    #[test]
    fn test_diamond_contributes_once() {
        let h = TypeHierarchy::builder()
            .capability("I", Vec::<TypeKey>::new())
            .capability("A", ["I"])
            .capability("B", ["I"])
            .concrete("C", None, ["A", "B"])
            .build()
            .unwrap();
        let mut r = RouteRegistry::new();
        r.register("I", table("i"));

        let found = RouteCollector::new(&h, &r).collect(&key("C"));
        assert_eq!(names(&found), vec!["i"]);
    }

    #[test]
    fn test_capabilities_explored_below_registered_type() {
        let h = TypeHierarchy::builder()
            .capability("Listable", Vec::<TypeKey>::new())
            .capability("Searchable", ["Listable"])
            .concrete("Base", None, Vec::<TypeKey>::new())
            .concrete("Orders", Some(key("Base")), ["Searchable"])
            .build()
            .unwrap();
        let mut r = RouteRegistry::new();
        r.register("Orders", table("orders"))
            .register("Searchable", table("search"))
            .register("Listable", table("list"))
            .register("Base", table("base"));

        let found = RouteCollector::new(&h, &r).collect(&key("Orders"));
        assert_eq!(names(&found), vec!["orders", "search", "list"]);
    }

    #[test]
    fn test_capability_shared_with_base_type_counted_once() {
        let h = TypeHierarchy::builder()
            .capability("I", Vec::<TypeKey>::new())
            .concrete("Parent", None, ["I"])
            .concrete("Child", Some(key("Parent")), ["I"])
            .build()
            .unwrap();
        let mut r = RouteRegistry::new();
        r.register("I", table("i"));

        let found = RouteCollector::new(&h, &r).collect(&key("Child"));
        assert_eq!(names(&found), vec!["i"]);
    }
}
