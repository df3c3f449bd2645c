//! Per-type route tables.
//!
//! A [`RouteTable`] maps an HTTP method to the [`PathMapper`] serving it.
//! Tables are immutable once built; the cache only ever replaces them whole.

use axum::http::Method;
use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::endpoint::Endpoint;
use crate::routing::mapper::{PathMapper, RoutePath};
use crate::routing::template::{PathTemplate, TemplateError};

/// Immutable method → matcher mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    mappers: HashMap<Method, Arc<PathMapper>>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Build a table from ready-made mappers.
    pub fn from_mappers(mappers: impl IntoIterator<Item = (Method, PathMapper)>) -> Self {
        Self {
            mappers: mappers
                .into_iter()
                .map(|(method, mapper)| (method, Arc::new(mapper)))
                .collect(),
        }
    }

    /// The matcher for `method`, if this table serves it.
    pub fn get(&self, method: &Method) -> Option<&PathMapper> {
        self.mappers.get(method).map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Method, &PathMapper)> {
        self.mappers.iter().map(|(m, p)| (m, p.as_ref()))
    }

    /// True when no method is served at all.
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Number of methods served.
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// Total number of templates across all methods.
    pub fn route_count(&self) -> usize {
        self.mappers.values().map(|m| m.len()).sum()
    }
}

/// Incrementally assembles a [`RouteTable`], keeping per-method insertion order.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    paths: HashMap<Method, Vec<RoutePath>>,
}

impl RouteTableBuilder {
    /// Add one template for `method`.
    pub fn route(mut self, method: Method, template: &str, endpoint: Endpoint) -> Result<Self, TemplateError> {
        let template = PathTemplate::parse(template)?;
        self.push(method, RoutePath::new(template, Arc::new(endpoint)));
        Ok(self)
    }

    /// Add an already-parsed route under `method`.
    pub fn push(&mut self, method: Method, path: RoutePath) {
        self.paths.entry(method).or_default().push(path);
    }

    pub fn build(self) -> RouteTable {
        RouteTable::from_mappers(
            self.paths
                .into_iter()
                .map(|(method, paths)| (method, PathMapper::new(paths))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_groups_by_method() {
        let table = RouteTable::builder()
            .route(Method::GET, "/items", Endpoint::resource("list"))
            .unwrap()
            .route(Method::GET, "/items/{id}", Endpoint::resource("get"))
            .unwrap()
            .route(Method::POST, "/items", Endpoint::resource("create"))
            .unwrap()
            .build();

        assert_eq!(table.len(), 2);
        assert_eq!(table.route_count(), 3);
        let get = table.get(&Method::GET).unwrap();
        assert_eq!(get.paths()[0].endpoint.name(), "list");
        assert_eq!(get.paths()[1].endpoint.name(), "get");
        assert!(table.get(&Method::DELETE).is_none());
    }

    #[test]
    fn test_builder_rejects_bad_template() {
        let err = RouteTable::builder()
            .route(Method::GET, "items", Endpoint::resource("list"))
            .unwrap_err();
        assert!(matches!(err, TemplateError::MissingLeadingSlash(_)));
    }

    #[test]
    fn test_empty_table() {
        let table = RouteTable::default();
        assert!(table.is_empty());
        assert_eq!(table.route_count(), 0);
    }
}
