//! Sub-resource locator routing.
//!
//! Resolves, at request time, the routes exposed by a sub-resource returned
//! from a locator endpoint and restarts matching against them.
//!
//! ```text
//! request → dispatch::Pipeline
//!     → dispatch::LocatorDispatcher (instantiate, resolve, match, restart)
//!         → routing::ResolvedRouteCache
//!             → miss: routing::RouteCollector → routing::merge
//!     → http::response
//! ```

pub mod config;
pub mod dispatch;
pub mod hierarchy;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use dispatch::{LocatorDispatcher, Pipeline, RequestContext};
pub use hierarchy::{TypeHierarchy, TypeKey};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{ResolvedRouteCache, ResourceModel, RouteTable};
