//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::hierarchy::TypeKind;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Locator dispatch settings.
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Declared resource types and capability sets.
    pub types: Vec<TypeConfig>,

    /// Route tables registered directly against a type.
    pub resources: Vec<ResourceConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Locator dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Name of the universal root type; ancestry walks stop here.
    pub root_type: String,

    /// Resource type every request is first dispatched against.
    pub entry: String,

    /// Maximum locator rounds per request.
    pub max_rounds: usize,

    /// Resolve every concrete type's routes at startup.
    pub prewarm_cache: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            root_type: "object".to_string(),
            entry: "root".to_string(),
            max_rounds: 16,
            prewarm_cache: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A declared type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypeConfig {
    /// Unique type name.
    pub name: String,

    /// Concrete type or capability set.
    #[serde(default)]
    pub kind: TypeKind,

    /// Base type (concrete types only; defaults to the root type).
    #[serde(default)]
    pub base: Option<String>,

    /// Capability sets this type declares, in order.
    #[serde(default)]
    pub implements: Vec<String>,
}

/// Routes authored directly against one type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    /// Owning type name.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Routes in registration order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// A single route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP methods served by this route.
    pub methods: Vec<String>,

    /// Path template, e.g. "/items/{id}".
    pub path: String,

    /// Endpoint name reported on match.
    pub endpoint: String,

    /// For sub-resource locators: the type the endpoint returns.
    #[serde(default)]
    pub produces: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.dispatch.root_type, "object");
        assert_eq!(config.dispatch.max_rounds, 16);
        assert!(!config.observability.metrics_enabled);
        assert!(config.types.is_empty());
    }

    #[test]
    fn test_minimal_toml() {
        let config: RouterConfig = toml::from_str(
            r#"
            [dispatch]
            entry = "shop"

            [[types]]
            name = "shop"

            [[types]]
            name = "Listable"
            kind = "capability"

            [[resources]]
            type = "shop"
            [[resources.routes]]
            methods = ["GET"]
            path = "/orders"
            endpoint = "orders"
            produces = "orders"
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch.entry, "shop");
        assert_eq!(config.dispatch.max_rounds, 16);
        assert_eq!(config.types[1].kind, TypeKind::Capability);
        assert_eq!(config.resources[0].type_name, "shop");
        assert_eq!(config.resources[0].routes[0].produces.as_deref(), Some("orders"));
    }
}
