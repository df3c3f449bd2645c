//! The resource model: type graph plus directly-registered route tables.

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::hierarchy::{HierarchyError, TypeHierarchy, TypeHierarchyBuilder, TypeKey};
use crate::routing::collector::RouteCollector;
use crate::routing::endpoint::Endpoint;
use crate::routing::registry::RouteRegistry;
use crate::routing::table::RouteTable;
use crate::routing::template::TemplateError;

/// Errors raised while building a [`ResourceModel`].
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("route `{endpoint}` on `{ty}`: {source}")]
    Template {
        ty: TypeKey,
        endpoint: String,
        source: TemplateError,
    },

    #[error("route `{endpoint}` on `{ty}` has invalid method `{method}`")]
    InvalidMethod {
        ty: TypeKey,
        endpoint: String,
        method: String,
    },
}

/// Read-only input to route resolution.
#[derive(Debug, Clone)]
pub struct ResourceModel {
    hierarchy: TypeHierarchy,
    registry: RouteRegistry,
}

impl ResourceModel {
    pub fn new(hierarchy: TypeHierarchy, registry: RouteRegistry) -> Self {
        Self { hierarchy, registry }
    }

    /// Build the hierarchy and registry described by `config`.
    pub fn from_config(config: &RouterConfig) -> Result<Self, ModelError> {
        let hierarchy = config
            .types
            .iter()
            .fold(
                TypeHierarchyBuilder::new(config.dispatch.root_type.as_str()),
                |builder, ty| {
                    builder.declare(
                        TypeKey::new(&ty.name),
                        ty.kind,
                        ty.base.as_deref().map(TypeKey::new),
                        ty.implements.iter().map(TypeKey::new).collect(),
                    )
                },
            )
            .build()?;

        let mut registry = RouteRegistry::new();
        for resource in &config.resources {
            let ty = TypeKey::new(&resource.type_name);
            let mut builder = RouteTable::builder();
            for route in &resource.routes {
                for method in &route.methods {
                    let method = Method::from_bytes(method.as_bytes()).map_err(|_| ModelError::InvalidMethod {
                        ty: ty.clone(),
                        endpoint: route.endpoint.clone(),
                        method: method.clone(),
                    })?;
                    let endpoint = match &route.produces {
                        Some(target) => Endpoint::locator(&route.endpoint, target.as_str()),
                        None => Endpoint::resource(&route.endpoint),
                    };
                    builder = builder
                        .route(method, &route.path, endpoint)
                        .map_err(|source| ModelError::Template {
                            ty: ty.clone(),
                            endpoint: route.endpoint.clone(),
                            source,
                        })?;
                }
            }
            registry.register(ty, builder.build());
        }

        tracing::debug!(
            types = hierarchy.len(),
            registered = registry.len(),
            "Resource model built"
        );

        Ok(Self::new(hierarchy, registry))
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// A collector walking this model.
    pub fn collector(&self) -> RouteCollector<'_> {
        RouteCollector::new(&self.hierarchy, &self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_from_config() {
        let config = parse_config(
            r#"
            [dispatch]
            entry = "shop"

            [[types]]
            name = "Listable"
            kind = "capability"

            [[types]]
            name = "shop"
            implements = ["Listable"]

            [[types]]
            name = "orders"

            [[resources]]
            type = "shop"
            [[resources.routes]]
            methods = ["GET", "DELETE"]
            path = "/orders"
            endpoint = "orders"
            produces = "orders"
            "#,
        )
        .unwrap();

        let model = ResourceModel::from_config(&config).unwrap();
        let shop = TypeKey::new("shop");
        assert_eq!(model.hierarchy().capabilities_of(&shop), &[TypeKey::new("Listable")]);

        let table = model.registry().get(&shop).unwrap();
        assert_eq!(table.len(), 2);
        let get = table.get(&Method::GET).unwrap();
        assert_eq!(get.paths()[0].endpoint.produces(), Some(&TypeKey::new("orders")));
        assert!(model.registry().get(&TypeKey::new("orders")).is_none());
    }

    #[test]
    fn test_cycle_surfaces_as_model_error() {
        let mut config = RouterConfig::default();
        config.types = toml::from_str::<RouterConfig>(
            r#"
            [[types]]
            name = "a"
            base = "b"
            [[types]]
            name = "b"
            base = "a"
            "#,
        )
        .unwrap()
        .types;

        let err = ResourceModel::from_config(&config).unwrap_err();
        assert!(matches!(err, ModelError::Hierarchy(HierarchyError::Cycle(_))));
    }
}
