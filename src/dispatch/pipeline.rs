//! Request pipeline driving locator rounds to a terminal endpoint.

use std::sync::Arc;

use crate::config::schema::RouterConfig;
use crate::dispatch::context::{Locator, RequestContext};
use crate::dispatch::error::DispatchError;
use crate::dispatch::instantiate::FactoryInstantiator;
use crate::dispatch::locator::LocatorDispatcher;
use crate::hierarchy::TypeKey;
use crate::routing::cache::ResolvedRouteCache;
use crate::routing::endpoint::Endpoint;
use crate::routing::mapper::PathParams;
use crate::routing::model::{ModelError, ResourceModel};

/// Final result of a successful dispatch.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub endpoint: Arc<Endpoint>,
    /// Type of the instance the endpoint runs against.
    pub resource_type: TypeKey,
    pub path_params: PathParams,
    /// Locator rounds taken, including the entry round.
    pub rounds: usize,
}

/// Seeds each request with the entry resource and follows locators.
#[derive(Clone)]
pub struct Pipeline {
    dispatcher: LocatorDispatcher,
    entry: TypeKey,
    max_rounds: usize,
}

impl Pipeline {
    pub fn new(dispatcher: LocatorDispatcher, entry: TypeKey, max_rounds: usize) -> Self {
        Self {
            dispatcher,
            entry,
            max_rounds,
        }
    }

    /// Build a pipeline with a fresh cache from a validated config.
    pub fn from_config(config: &RouterConfig) -> Result<Self, ModelError> {
        let model = Arc::new(ResourceModel::from_config(config)?);
        let instantiator = Arc::new(FactoryInstantiator::from_model(&model));
        let cache = ResolvedRouteCache::new();
        if config.dispatch.prewarm_cache {
            cache.prewarm(&model);
        }
        let dispatcher = LocatorDispatcher::new(model, cache, instantiator);
        Ok(Self::new(
            dispatcher,
            TypeKey::new(&config.dispatch.entry),
            config.dispatch.max_rounds,
        ))
    }

    pub fn dispatcher(&self) -> &LocatorDispatcher {
        &self.dispatcher
    }

    pub fn entry(&self) -> &TypeKey {
        &self.entry
    }

    /// Dispatch `ctx` until a non-locator endpoint is reached.
    pub fn run(&self, ctx: &mut RequestContext) -> Result<DispatchOutcome, DispatchError> {
        ctx.set_result(Locator::Type(self.entry.clone()));

        loop {
            if ctx.restarts() >= self.max_rounds {
                return Err(DispatchError::TooManyRounds {
                    limit: self.max_rounds,
                });
            }

            self.dispatcher.dispatch(ctx);
            if let Some(error) = ctx.take_failure() {
                return Err(error);
            }

            let target = ctx.target().cloned().ok_or(DispatchError::MissingLocator)?;
            if let Some(next) = target.produces() {
                ctx.set_result(Locator::Type(next.clone()));
                continue;
            }

            if ctx.remaining() != "/" {
                return Err(DispatchError::UnconsumedPath {
                    endpoint: target.name().to_string(),
                    remaining: ctx.remaining().to_string(),
                });
            }

            let resource_type = ctx
                .endpoint_instance()
                .map(|instance| instance.type_key())
                .ok_or(DispatchError::MissingLocator)?;
            return Ok(DispatchOutcome {
                endpoint: target,
                resource_type,
                path_params: ctx.path_params().clone(),
                rounds: ctx.restarts(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use axum::http::Method;

    const SHOP: &str = r#"
        [dispatch]
        entry = "shop"
        max_rounds = 4

        [[types]]
        name = "shop"

        [[types]]
        name = "orders"

        [[types]]
        name = "loop"

        [[resources]]
        type = "shop"
        [[resources.routes]]
        methods = ["GET"]
        path = "/orders"
        endpoint = "orders_locator"
        produces = "orders"
        [[resources.routes]]
        methods = ["GET"]
        path = "/loop"
        endpoint = "loop_locator"
        produces = "loop"

        [[resources]]
        type = "orders"
        [[resources.routes]]
        methods = ["GET"]
        path = "/{id}"
        endpoint = "get_order"

        [[resources]]
        type = "loop"
        [[resources.routes]]
        methods = ["GET"]
        path = "/"
        endpoint = "again"
        produces = "loop"
    "#;

    fn pipeline() -> Pipeline {
        Pipeline::from_config(&parse_config(SHOP).unwrap()).unwrap()
    }

    #[test]
    fn test_follows_locator_chain() {
        let mut ctx = RequestContext::new(Method::GET, "/orders/7");
        let outcome = pipeline().run(&mut ctx).unwrap();

        assert_eq!(outcome.endpoint.name(), "get_order");
        assert_eq!(outcome.resource_type, TypeKey::new("orders"));
        assert_eq!(outcome.path_params["id"], "7");
        assert_eq!(outcome.rounds, 2);
        assert_eq!(ctx.matched().len(), 2);
    }

    #[test]
    fn test_terminal_endpoint_must_consume_path() {
        let mut ctx = RequestContext::new(Method::GET, "/orders/7/extra");
        let err = pipeline().run(&mut ctx).unwrap_err();
        assert!(matches!(err, DispatchError::UnconsumedPath { .. }));
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_round_limit() {
        let mut ctx = RequestContext::new(Method::GET, "/loop");
        let err = pipeline().run(&mut ctx).unwrap_err();
        assert!(matches!(err, DispatchError::TooManyRounds { limit: 4 }));
    }

    #[test]
    fn test_unknown_path() {
        let mut ctx = RequestContext::new(Method::GET, "/customers");
        let err = pipeline().run(&mut ctx).unwrap_err();
        assert!(matches!(err, DispatchError::NoMatch { .. }));
    }

    #[derive(Debug)]
    struct Storefront;
    impl crate::dispatch::Resource for Storefront {
        fn type_key(&self) -> TypeKey {
            TypeKey::new("orders")
        }
    }

    #[test]
    fn test_resource_type_comes_from_instance() {
        let model = Arc::new(ResourceModel::from_config(&parse_config(SHOP).unwrap()).unwrap());
        let mut instantiator = FactoryInstantiator::new();
        instantiator.register("shop", || Arc::new(Storefront) as Arc<dyn crate::dispatch::Resource>);
        let dispatcher = LocatorDispatcher::new(model, ResolvedRouteCache::new(), Arc::new(instantiator));
        let pipeline = Pipeline::new(dispatcher, TypeKey::new("shop"), 4);

        let mut ctx = RequestContext::new(Method::GET, "/9");
        let outcome = pipeline.run(&mut ctx).unwrap();
        assert_eq!(outcome.endpoint.name(), "get_order");
        assert_eq!(outcome.resource_type, TypeKey::new("orders"));
        assert_eq!(pipeline.entry(), &TypeKey::new("shop"));
    }

    #[test]
    fn test_prewarm_from_config() {
        let mut config = parse_config(SHOP).unwrap();
        config.dispatch.prewarm_cache = true;
        let pipeline = Pipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.dispatcher().cache().len(), 3);
    }
}
