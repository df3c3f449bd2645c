//! Type identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque handle naming a concrete resource type or a capability set.
///
/// Cloning is a reference-count bump, so keys can be stored freely in
/// registries, caches and per-request state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey(Arc<str>);

impl TypeKey {
    /// Create a key from a type name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// Whether a type can be instantiated or only declares a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A concrete type with an optional base type.
    #[default]
    Concrete,
    /// An interface-like contract; never has a base type.
    Capability,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_equality_and_hash() {
        let a = TypeKey::new("OrderResource");
        let b = TypeKey::from(String::from("OrderResource"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));
        assert!(!set.contains(&TypeKey::from("Other")));
    }

    #[test]
    fn test_kind_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: TypeKind,
        }
        let w: Wrapper = toml::from_str("kind = \"capability\"").unwrap();
        assert_eq!(w.kind, TypeKind::Capability);
        assert_eq!(TypeKind::default(), TypeKind::Concrete);
    }
}
