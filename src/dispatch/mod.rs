//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP request (method, path)
//!     → context.rs (RequestContext seeded with entry locator)
//!     → pipeline.rs loop:
//!         → locator.rs (instantiate, resolve routes, match, restart)
//!         → endpoint produces another locator? → next round
//!     → DispatchOutcome or DispatchError (error.rs)
//! ```
//!
//! # Design Decisions
//! - Per-request state is owned by one context, never shared
//! - Instantiation is pluggable through the Instantiator trait
//! - Routing misses are 404s; configuration mistakes are 500s

pub mod context;
pub mod error;
pub mod instantiate;
pub mod locator;
pub mod pipeline;

pub use context::{Locator, RequestContext, Resource, UriMatchState};
pub use error::{DispatchError, FailureKind};
pub use instantiate::{DeclaredResource, FactoryInstantiator, InstantiationError, Instantiator};
pub use locator::LocatorDispatcher;
pub use pipeline::{DispatchOutcome, Pipeline};
