//! Route table merging.
//!
//! Same-method template lists are concatenated in input order, each table
//! contributing its templates in its own order.

use axum::http::Method;
use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::mapper::{PathMapper, RoutePath};
use crate::routing::table::RouteTable;

/// Combine per-type tables into one table.
pub fn merge(tables: &[Arc<RouteTable>]) -> RouteTable {
    let mut paths: HashMap<Method, Vec<RoutePath>> = HashMap::new();
    for table in tables {
        for (method, mapper) in table.iter() {
            paths
                .entry(method.clone())
                .or_default()
                .extend(mapper.paths().iter().cloned());
        }
    }
    RouteTable::from_mappers(
        paths
            .into_iter()
            .map(|(method, paths)| (method, PathMapper::new(paths))),
    )
}
