//! Per-request dispatch state.
//!
//! # Responsibilities
//! - Carry the locator value, method and remaining path between rounds
//! - Record matched state so earlier rounds can be inspected
//! - Expose named transitions instead of raw field writes
//!
//! # Design Decisions
//! - Exclusively owned by one request and passed by `&mut`; never shared
//! - Transitions only move state forward; a round never undoes a previous one

use axum::http::Method;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::error::DispatchError;
use crate::hierarchy::TypeKey;
use crate::routing::endpoint::Endpoint;
use crate::routing::mapper::PathParams;

/// A live resource instance.
pub trait Resource: Send + Sync + fmt::Debug {
    /// Concrete runtime type of this instance.
    fn type_key(&self) -> TypeKey;
}

/// Value produced by a locator endpoint.
#[derive(Debug, Clone)]
pub enum Locator {
    /// A type reference still to be instantiated.
    Type(TypeKey),
    /// An already constructed instance.
    Instance(Arc<dyn Resource>),
}

/// Snapshot of URI matching state taken before a round rewrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriMatchState {
    pub remaining: String,
    pub path_params: PathParams,
    pub target: Option<Arc<Endpoint>>,
}

/// In-flight request state read and written by the locator dispatcher.
#[derive(Debug)]
pub struct RequestContext {
    request_id: String,
    method: Method,
    remaining: String,
    result: Option<Locator>,
    path_params: PathParams,
    matched: Vec<UriMatchState>,
    endpoint_instance: Option<Arc<dyn Resource>>,
    target: Option<Arc<Endpoint>>,
    failure: Option<DispatchError>,
    restarts: usize,
}

impl RequestContext {
    /// Fresh context for `method` with `path` still to be matched.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: String::new(),
            method,
            remaining: path.into(),
            result: None,
            path_params: PathParams::new(),
            matched: Vec::new(),
            endpoint_instance: None,
            target: None,
            failure: None,
            restarts: 0,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Unconsumed path suffix from the previous matching stage.
    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    /// The last result value produced by the pipeline.
    pub fn result(&self) -> Option<&Locator> {
        self.result.as_ref()
    }

    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Match states saved by earlier rounds, oldest first.
    pub fn matched(&self) -> &[UriMatchState] {
        &self.matched
    }

    /// Instance subsequent invocations run against.
    pub fn endpoint_instance(&self) -> Option<&Arc<dyn Resource>> {
        self.endpoint_instance.as_ref()
    }

    /// Next dispatch target.
    pub fn target(&self) -> Option<&Arc<Endpoint>> {
        self.target.as_ref()
    }

    pub fn failure(&self) -> Option<&DispatchError> {
        self.failure.as_ref()
    }

    pub fn take_failure(&mut self) -> Option<DispatchError> {
        self.failure.take()
    }

    /// Number of pipeline restarts so far.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn set_result(&mut self, locator: Locator) {
        self.result = Some(locator);
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }

    pub fn save_uri_match_state(&mut self) {
        self.matched.push(UriMatchState {
            remaining: self.remaining.clone(),
            path_params: self.path_params.clone(),
            target: self.target.clone(),
        });
    }

    pub fn set_remaining(&mut self, remaining: impl Into<String>) {
        self.remaining = remaining.into();
    }

    /// Replace the active path-parameter set.
    pub fn set_path_params(&mut self, params: PathParams) {
        self.path_params = params;
    }

    pub fn set_endpoint_instance(&mut self, instance: Arc<dyn Resource>) {
        self.endpoint_instance = Some(instance);
    }

    /// Restart the pipeline against `target`.
    pub fn restart(&mut self, target: Arc<Endpoint>) {
        self.target = Some(target);
        self.restarts += 1;
    }

    /// Record a terminal failure.
    pub fn fail(&mut self, error: DispatchError) {
        self.failure = Some(error);
    }
}
