//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Swap in rebuilt pipelines on config reload
//! - Record request metrics

use arc_swap::ArcSwap;
use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, RouterConfig};
use crate::dispatch::{Pipeline, RequestContext};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::{DispatchResponse, ErrorResponse};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ArcSwap<Pipeline>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(ArcSwap::from_pointee(pipeline)),
        }
    }

    /// Rebuild the pipeline (model and a fresh cache) and swap it in.
    ///
    /// Requests already running keep the pipeline they loaded.
    pub fn reload(&self, config: &RouterConfig) -> Result<(), ConfigError> {
        let pipeline = build_pipeline(config)?;
        self.pipeline.store(Arc::new(pipeline));
        tracing::info!(
            entry = %config.dispatch.entry,
            types = config.types.len(),
            resources = config.resources.len(),
            "Routes reloaded"
        );
        Ok(())
    }
}

/// HTTP front end for the locator pipeline.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is validated first, so a default or hand-built
    /// config that could never dispatch is rejected here.
    pub fn new(config: RouterConfig) -> Result<Self, ConfigError> {
        let state = AppState::new(build_pipeline(&config)?);
        let router = Self::build_router(&config, state.clone());
        Ok(Self { router, config, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config the server was started with.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, entry = %self.state.pipeline.load().entry(), "HTTP server starting");

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.reload(&config) {
                    tracing::error!(error = %e, "Rejected reloaded config, keeping current routes");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn build_pipeline(config: &RouterConfig) -> Result<Pipeline, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)?;
    Ok(Pipeline::from_config(config)?)
}

/// Runs the locator pipeline for every request.
async fn dispatch_handler(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let start_time = Instant::now();
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(request_id = %request_id, method = %method, path = %uri.path(), "Dispatching request");

    let pipeline = state.pipeline.load_full();
    let mut ctx = RequestContext::new(method.clone(), uri.path()).with_request_id(&request_id);
    let response = match pipeline.run(&mut ctx) {
        Ok(outcome) => DispatchResponse::new(&request_id, &outcome).into_response(),
        Err(error) => ErrorResponse::new(&request_id, &error).into_response(),
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}
