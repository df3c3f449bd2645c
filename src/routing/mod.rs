//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     RouterConfig
//!     → model.rs (TypeHierarchy + RouteRegistry of direct tables)
//!
//! Locator resolution (per concrete type, first time only):
//!     cache.rs miss
//!     → collector.rs (walk base chain + capability sets)
//!     → merger.rs (concatenate per-method template lists)
//!     → cache.rs store
//!
//! Matching:
//!     table.rs (method → mapper)
//!     → mapper.rs (pick template)
//!     → template.rs (segment match, remaining suffix, params)
//! ```
//!
//! # Design Decisions
//! - Tables are immutable; the cache replaces entries whole
//! - Merge order is deterministic and is the final tie-break when matching
//! - No regex in the hot path

pub mod cache;
pub mod collector;
pub mod endpoint;
pub mod mapper;
pub mod merger;
pub mod model;
pub mod registry;
pub mod table;
pub mod template;

pub use cache::ResolvedRouteCache;
pub use collector::RouteCollector;
pub use endpoint::Endpoint;
pub use mapper::{PathMapper, PathParams, RequestMatch, RoutePath};
pub use merger::merge;
pub use model::{ModelError, ResourceModel};
pub use registry::RouteRegistry;
pub use table::{RouteTable, RouteTableBuilder};
pub use template::{PathTemplate, TemplateError};
