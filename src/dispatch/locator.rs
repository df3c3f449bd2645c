//! Sub-resource locator dispatch.
//!
//! # Flow
//! ```text
//! ctx.result (Locator)
//!     → Type(ty)? instantiate it
//!     → runtime type → ResolvedRouteCache::resolve
//!     → table.get(method) → mapper.map(remaining or "/")
//!     → save match state, rewrite remaining/params/instance, restart(endpoint)
//! ```
//!
//! # Design Decisions
//! - Failures are recorded on the context and never retried
//! - The resolved instance is bound as-is; it is never instantiated twice
//! - Reentrant: each call only advances the context by one round

use std::sync::Arc;

use crate::dispatch::context::{Locator, RequestContext};
use crate::dispatch::error::DispatchError;
use crate::dispatch::instantiate::Instantiator;
use crate::hierarchy::TypeKey;
use crate::observability::metrics;
use crate::routing::cache::ResolvedRouteCache;
use crate::routing::model::ResourceModel;
use crate::routing::table::RouteTable;

/// Resolves a locator value to its routes and restarts matching against it.
#[derive(Clone)]
pub struct LocatorDispatcher {
    model: Arc<ResourceModel>,
    cache: ResolvedRouteCache,
    instantiator: Arc<dyn Instantiator>,
}

impl LocatorDispatcher {
    pub fn new(model: Arc<ResourceModel>, cache: ResolvedRouteCache, instantiator: Arc<dyn Instantiator>) -> Self {
        Self {
            model,
            cache,
            instantiator,
        }
    }

    pub fn model(&self) -> &ResourceModel {
        &self.model
    }

    pub fn cache(&self) -> &ResolvedRouteCache {
        &self.cache
    }

    /// Install a merged table for `ty` ahead of any lookup.
    pub fn pre_register(&self, ty: impl Into<TypeKey>, table: RouteTable) {
        self.cache.install(ty, table);
    }

    /// Run one locator round. Failures end up in [`RequestContext::failure`].
    pub fn dispatch(&self, ctx: &mut RequestContext) {
        match self.advance(ctx) {
            Ok(()) => metrics::record_dispatch("matched"),
            Err(error) => {
                metrics::record_dispatch(error.outcome());
                if error.status().is_server_error() {
                    tracing::error!(
                        request_id = %ctx.request_id(),
                        method = %ctx.method(),
                        error = %error,
                        "Locator dispatch failed"
                    );
                } else {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        method = %ctx.method(),
                        error = %error,
                        "Locator dispatch found no route"
                    );
                }
                ctx.fail(error);
            }
        }
    }

    fn advance(&self, ctx: &mut RequestContext) -> Result<(), DispatchError> {
        let instance = match ctx.result() {
            Some(Locator::Type(ty)) => self.instantiator.instantiate(ty)?,
            Some(Locator::Instance(instance)) => instance.clone(),
            None => return Err(DispatchError::MissingLocator),
        };
        let ty = instance.type_key();

        let table = self.cache.resolve(&ty, &self.model);
        if table.is_empty() {
            return Err(DispatchError::NotAResource { ty });
        }

        let mapper = table
            .get(ctx.method())
            .ok_or_else(|| DispatchError::MethodNotSupported {
                ty: ty.clone(),
                method: ctx.method().clone(),
            })?;

        let path = match ctx.remaining() {
            "" => "/",
            remaining => remaining,
        };
        let matched = mapper.map(path).ok_or_else(|| DispatchError::NoMatch {
            ty: ty.clone(),
            path: path.to_string(),
        })?;

        tracing::debug!(
            request_id = %ctx.request_id(),
            ty = %ty,
            endpoint = %matched.endpoint,
            locator = matched.endpoint.is_locator(),
            remaining = %matched.remaining,
            "Locator matched"
        );

        ctx.save_uri_match_state();
        ctx.set_remaining(matched.remaining);
        ctx.set_path_params(matched.path_params);
        ctx.set_endpoint_instance(instance);
        ctx.clear_result();
        ctx.restart(matched.endpoint);
        Ok(())
    }
}
