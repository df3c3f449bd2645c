//! Directly-registered route tables.

use std::collections::HashMap;
use std::sync::Arc;

use crate::hierarchy::TypeKey;
use crate::routing::table::RouteTable;

/// Route tables authored directly against a type.
///
/// Built before serving starts and read-only afterwards; inherited and
/// implemented contributions are never folded in here.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    tables: HashMap<TypeKey, Arc<RouteTable>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the table for `ty`, replacing any previous one.
    pub fn register(&mut self, ty: impl Into<TypeKey>, table: RouteTable) -> &mut Self {
        self.tables.insert(ty.into(), Arc::new(table));
        self
    }

    pub fn get(&self, ty: &TypeKey) -> Option<&Arc<RouteTable>> {
        self.tables.get(ty)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
