//! Type graph: base-type chains and capability-set edges.
//!
//! # Responsibilities
//! - Store, per type, its kind, single base type and declared capability sets
//! - Validate declarations once at build time
//! - Answer ancestry queries without allocation on the request path
//!
//! # Design Decisions
//! - Declarations may arrive in any order; references are resolved in `build()`
//! - Cycles are rejected up front so walks never need their own guards on the base chain
//! - Capability order is declaration order (it drives route merge order)

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::hierarchy::types::{TypeKey, TypeKind};

/// Default name of the universal root type.
pub const DEFAULT_ROOT: &str = "object";

/// Errors raised while building a [`TypeHierarchy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("type `{0}` is declared more than once")]
    Duplicate(TypeKey),

    #[error("type `{ty}` references undeclared type `{missing}`")]
    Unknown { ty: TypeKey, missing: TypeKey },

    #[error("type `{ty}` uses capability `{base}` as its base type")]
    CapabilityAsBase { ty: TypeKey, base: TypeKey },

    #[error("type `{ty}` lists concrete type `{capability}` as a capability")]
    ConcreteAsCapability { ty: TypeKey, capability: TypeKey },

    #[error("capability `{0}` cannot declare a base type")]
    CapabilityWithBase(TypeKey),

    #[error("inheritance cycle through `{0}`")]
    Cycle(TypeKey),

    #[error("the root type `{0}` cannot be redeclared")]
    RootRedeclared(TypeKey),
}

#[derive(Debug, Clone)]
struct TypeNode {
    kind: TypeKind,
    base: Option<TypeKey>,
    capabilities: Vec<TypeKey>,
}

/// Immutable type graph consumed by the route collector.
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    root: TypeKey,
    nodes: HashMap<TypeKey, TypeNode>,
}

impl TypeHierarchy {
    /// Start building a hierarchy rooted at [`DEFAULT_ROOT`].
    pub fn builder() -> TypeHierarchyBuilder {
        TypeHierarchyBuilder::new(DEFAULT_ROOT)
    }

    /// The universal root type.
    pub fn root(&self) -> &TypeKey {
        &self.root
    }

    pub fn is_root(&self, ty: &TypeKey) -> bool {
        *ty == self.root
    }

    /// Returns true if the type was declared (the root always is).
    pub fn contains(&self, ty: &TypeKey) -> bool {
        self.nodes.contains_key(ty)
    }

    pub fn kind_of(&self, ty: &TypeKey) -> Option<TypeKind> {
        self.nodes.get(ty).map(|n| n.kind)
    }

    /// Direct base type. `None` for the root, capabilities and undeclared types.
    pub fn base_of(&self, ty: &TypeKey) -> Option<&TypeKey> {
        self.nodes.get(ty).and_then(|n| n.base.as_ref())
    }

    /// Capability sets directly declared by `ty`, in declaration order.
    pub fn capabilities_of(&self, ty: &TypeKey) -> &[TypeKey] {
        self.nodes
            .get(ty)
            .map(|n| n.capabilities.as_slice())
            .unwrap_or(&[])
    }

    /// All declared concrete types except the root.
    pub fn concrete_types(&self) -> impl Iterator<Item = &TypeKey> {
        self.nodes
            .iter()
            .filter(|(key, node)| node.kind == TypeKind::Concrete && **key != self.root)
            .map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Declaration {
    name: TypeKey,
    kind: TypeKind,
    base: Option<TypeKey>,
    capabilities: Vec<TypeKey>,
}

/// Collects type declarations and validates them into a [`TypeHierarchy`].
#[derive(Debug, Clone)]
pub struct TypeHierarchyBuilder {
    root: TypeKey,
    declarations: Vec<Declaration>,
}

impl TypeHierarchyBuilder {
    /// Create a builder with a custom root type name.
    pub fn new(root: impl Into<TypeKey>) -> Self {
        Self {
            root: root.into(),
            declarations: Vec::new(),
        }
    }

    /// Declare a concrete type. A missing base defaults to the root.
    pub fn concrete<I, K>(mut self, name: impl Into<TypeKey>, base: Option<TypeKey>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<TypeKey>,
    {
        self.declarations.push(Declaration {
            name: name.into(),
            kind: TypeKind::Concrete,
            base,
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Declare a capability set extending the given capability sets.
    pub fn capability<I, K>(mut self, name: impl Into<TypeKey>, supers: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<TypeKey>,
    {
        self.declarations.push(Declaration {
            name: name.into(),
            kind: TypeKind::Capability,
            base: None,
            capabilities: supers.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Declare a type of either kind. Used by the config layer.
    pub fn declare(
        mut self,
        name: TypeKey,
        kind: TypeKind,
        base: Option<TypeKey>,
        capabilities: Vec<TypeKey>,
    ) -> Self {
        self.declarations.push(Declaration {
            name,
            kind,
            base,
            capabilities,
        });
        self
    }

    /// Validate all declarations and freeze the graph.
    pub fn build(self) -> Result<TypeHierarchy, HierarchyError> {
        let mut nodes: HashMap<TypeKey, TypeNode> = HashMap::with_capacity(self.declarations.len() + 1);
        nodes.insert(
            self.root.clone(),
            TypeNode {
                kind: TypeKind::Concrete,
                base: None,
                capabilities: Vec::new(),
            },
        );

        for decl in &self.declarations {
            if decl.name == self.root {
                return Err(HierarchyError::RootRedeclared(decl.name.clone()));
            }
            if decl.kind == TypeKind::Capability && decl.base.is_some() {
                return Err(HierarchyError::CapabilityWithBase(decl.name.clone()));
            }
            let base = match decl.kind {
                TypeKind::Concrete => Some(decl.base.clone().unwrap_or_else(|| self.root.clone())),
                TypeKind::Capability => None,
            };
            let node = TypeNode {
                kind: decl.kind,
                base,
                capabilities: decl.capabilities.clone(),
            };
            if nodes.insert(decl.name.clone(), node).is_some() {
                return Err(HierarchyError::Duplicate(decl.name.clone()));
            }
        }

        for (ty, node) in &nodes {
            if let Some(base) = &node.base {
                match nodes.get(base) {
                    None => {
                        return Err(HierarchyError::Unknown {
                            ty: ty.clone(),
                            missing: base.clone(),
                        })
                    }
                    Some(b) if b.kind == TypeKind::Capability => {
                        return Err(HierarchyError::CapabilityAsBase {
                            ty: ty.clone(),
                            base: base.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
            for cap in &node.capabilities {
                match nodes.get(cap) {
                    None => {
                        return Err(HierarchyError::Unknown {
                            ty: ty.clone(),
                            missing: cap.clone(),
                        })
                    }
                    Some(c) if c.kind == TypeKind::Concrete => {
                        return Err(HierarchyError::ConcreteAsCapability {
                            ty: ty.clone(),
                            capability: cap.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        let hierarchy = TypeHierarchy {
            root: self.root,
            nodes,
        };
        hierarchy.check_base_chains()?;
        hierarchy.check_capability_graph()?;
        Ok(hierarchy)
    }
}

impl TypeHierarchy {
    fn check_base_chains(&self) -> Result<(), HierarchyError> {
        for start in self.nodes.keys() {
            let mut seen = HashSet::new();
            let mut current = Some(start);
            while let Some(ty) = current {
                if !seen.insert(ty) {
                    return Err(HierarchyError::Cycle(ty.clone()));
                }
                current = self.base_of(ty);
            }
        }
        Ok(())
    }

    fn check_capability_graph(&self) -> Result<(), HierarchyError> {
        // 0 = unvisited, 1 = on stack, 2 = done
        let mut state: HashMap<&TypeKey, u8> = HashMap::new();
        for start in self.nodes.keys() {
            self.visit_capabilities(start, &mut state)?;
        }
        Ok(())
    }

    fn visit_capabilities<'a>(
        &'a self,
        ty: &'a TypeKey,
        state: &mut HashMap<&'a TypeKey, u8>,
    ) -> Result<(), HierarchyError> {
        match state.get(ty).copied().unwrap_or(0) {
            1 => return Err(HierarchyError::Cycle(ty.clone())),
            2 => return Ok(()),
            _ => {}
        }
        state.insert(ty, 1);
        for cap in self.capabilities_of(ty) {
            self.visit_capabilities(cap, state)?;
        }
        state.insert(ty, 2);
        Ok(())
    }
}
