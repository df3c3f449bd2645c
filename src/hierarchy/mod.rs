//! Type hierarchy subsystem.
//!
//! # Data Flow
//! ```text
//! TypeConfig[] (or programmatic declarations)
//!     → graph.rs (TypeHierarchyBuilder collects declarations)
//!     → build(): referential checks + cycle detection
//!     → TypeHierarchy (immutable adjacency lists)
//!     → consumed read-only by routing::collector
//! ```
//!
//! # Design Decisions
//! - Explicit graph instead of runtime reflection
//! - Two edge kinds: single base type, ordered capability sets
//! - Universal root is always present and terminates base-chain walks
//! - Undeclared types behave as leaves (no base, no capabilities)

pub mod graph;
pub mod types;

pub use graph::{HierarchyError, TypeHierarchy, TypeHierarchyBuilder};
pub use types::{TypeKey, TypeKind};
