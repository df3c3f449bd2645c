//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (bases, capabilities, resources, locator targets)
//! - Validate HTTP method tokens and path templates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Inheritance cycles are left to the hierarchy builder

use axum::http::Method;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::hierarchy::TypeKind;
use crate::routing::template::{PathTemplate, TemplateError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("type name must not be empty")]
    EmptyTypeName,

    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("type `{0}` redeclares the root type")]
    RootRedeclared(String),

    #[error("type `{ty}` references unknown type `{missing}`")]
    UnknownType { ty: String, missing: String },

    #[error("type `{ty}` cannot use capability `{base}` as a base")]
    CapabilityAsBase { ty: String, base: String },

    #[error("capability `{0}` cannot declare a base type")]
    CapabilityWithBase(String),

    #[error("type `{ty}` implements `{capability}`, which is not a capability")]
    NotACapability { ty: String, capability: String },

    #[error("resource references unknown type `{0}`")]
    UnknownResourceType(String),

    #[error("type `{0}` has more than one resource section")]
    DuplicateResource(String),

    #[error("resource `{0}` declares no routes")]
    EmptyResource(String),

    #[error("route `{endpoint}` on `{ty}` lists no methods")]
    NoMethods { ty: String, endpoint: String },

    #[error("route `{endpoint}` on `{ty}` has invalid method `{method}`")]
    InvalidMethod { ty: String, endpoint: String, method: String },

    #[error("route `{endpoint}` on `{ty}`: {source}")]
    InvalidTemplate {
        ty: String,
        endpoint: String,
        source: TemplateError,
    },

    #[error("locator `{endpoint}` on `{ty}` produces `{target}`, which is not a declared concrete type")]
    InvalidLocatorTarget { ty: String, endpoint: String, target: String },

    #[error("entry type `{0}` is not a declared concrete type")]
    InvalidEntry(String),

    #[error("dispatch.max_rounds must be at least 1")]
    InvalidMaxRounds,

    #[error("timeouts.request_secs must be at least 1")]
    InvalidRequestTimeout,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let root = config.dispatch.root_type.as_str();

    let mut kinds: HashMap<&str, TypeKind> = HashMap::new();
    kinds.insert(root, TypeKind::Concrete);
    for ty in &config.types {
        if ty.name.is_empty() {
            errors.push(ValidationError::EmptyTypeName);
        } else if ty.name == root {
            errors.push(ValidationError::RootRedeclared(ty.name.clone()));
        } else if kinds.insert(ty.name.as_str(), ty.kind).is_some() {
            errors.push(ValidationError::DuplicateType(ty.name.clone()));
        }
    }

    for ty in &config.types {
        if let Some(base) = &ty.base {
            if ty.kind == TypeKind::Capability {
                errors.push(ValidationError::CapabilityWithBase(ty.name.clone()));
            }
            match kinds.get(base.as_str()) {
                None => errors.push(ValidationError::UnknownType {
                    ty: ty.name.clone(),
                    missing: base.clone(),
                }),
                Some(TypeKind::Capability) => errors.push(ValidationError::CapabilityAsBase {
                    ty: ty.name.clone(),
                    base: base.clone(),
                }),
                Some(TypeKind::Concrete) => {}
            }
        }
        for cap in &ty.implements {
            match kinds.get(cap.as_str()) {
                None => errors.push(ValidationError::UnknownType {
                    ty: ty.name.clone(),
                    missing: cap.clone(),
                }),
                Some(TypeKind::Concrete) => errors.push(ValidationError::NotACapability {
                    ty: ty.name.clone(),
                    capability: cap.clone(),
                }),
                Some(TypeKind::Capability) => {}
            }
        }
    }

    let is_concrete = |name: &str| name != root && kinds.get(name) == Some(&TypeKind::Concrete);

    let mut seen_resources = HashSet::new();
    for resource in &config.resources {
        let ty = &resource.type_name;
        if ty == root || !kinds.contains_key(ty.as_str()) {
            errors.push(ValidationError::UnknownResourceType(ty.clone()));
        }
        if !seen_resources.insert(ty.as_str()) {
            errors.push(ValidationError::DuplicateResource(ty.clone()));
        }
        if resource.routes.is_empty() {
            errors.push(ValidationError::EmptyResource(ty.clone()));
        }

        for route in &resource.routes {
            if route.methods.is_empty() {
                errors.push(ValidationError::NoMethods {
                    ty: ty.clone(),
                    endpoint: route.endpoint.clone(),
                });
            }
            for method in &route.methods {
                if Method::from_bytes(method.as_bytes()).is_err() {
                    errors.push(ValidationError::InvalidMethod {
                        ty: ty.clone(),
                        endpoint: route.endpoint.clone(),
                        method: method.clone(),
                    });
                }
            }
            if let Err(source) = PathTemplate::parse(&route.path) {
                errors.push(ValidationError::InvalidTemplate {
                    ty: ty.clone(),
                    endpoint: route.endpoint.clone(),
                    source,
                });
            }
            if let Some(target) = &route.produces {
                if !is_concrete(target) {
                    errors.push(ValidationError::InvalidLocatorTarget {
                        ty: ty.clone(),
                        endpoint: route.endpoint.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }

    if !is_concrete(&config.dispatch.entry) {
        errors.push(ValidationError::InvalidEntry(config.dispatch.entry.clone()));
    }
    if config.dispatch.max_rounds == 0 {
        errors.push(ValidationError::InvalidMaxRounds);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::InvalidRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
