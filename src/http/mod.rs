//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and propagated)
//!     → dispatch::Pipeline (locator rounds)
//!     → response.rs (outcome or failure as JSON + status)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{DispatchResponse, ErrorResponse};
pub use server::{AppState, HttpServer};
