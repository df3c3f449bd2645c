//! Locator instantiation.
//!
//! When a locator hands back a type reference instead of an instance, an
//! [`Instantiator`] materializes it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::dispatch::context::Resource;
use crate::hierarchy::TypeKey;
use crate::routing::model::ResourceModel;

/// The instantiation collaborator failed to produce a locator instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not instantiate resource type `{ty}`: {reason}")]
pub struct InstantiationError {
    pub ty: TypeKey,
    pub reason: String,
}

impl InstantiationError {
    pub fn new(ty: TypeKey, reason: impl Into<String>) -> Self {
        Self {
            ty,
            reason: reason.into(),
        }
    }
}

/// Produces instances for type references.
pub trait Instantiator: Send + Sync {
    fn instantiate(&self, ty: &TypeKey) -> Result<Arc<dyn Resource>, InstantiationError>;
}

/// A resource with no state beyond its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredResource {
    ty: TypeKey,
}

impl DeclaredResource {
    pub fn new(ty: TypeKey) -> Self {
        Self { ty }
    }
}

impl Resource for DeclaredResource {
    fn type_key(&self) -> TypeKey {
        self.ty.clone()
    }
}

type Factory = Arc<dyn Fn() -> Arc<dyn Resource> + Send + Sync>;

/// Instantiator backed by per-type factory closures.
#[derive(Clone, Default)]
pub struct FactoryInstantiator {
    factories: HashMap<TypeKey, Factory>,
}

impl fmt::Debug for FactoryInstantiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryInstantiator")
            .field("types", &self.factories.len())
            .finish()
    }
}

impl FactoryInstantiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// One [`DeclaredResource`] factory per declared concrete type.
    pub fn from_model(model: &ResourceModel) -> Self {
        let mut instantiator = Self::new();
        for ty in model.hierarchy().concrete_types() {
            let resource: Arc<dyn Resource> = Arc::new(DeclaredResource::new(ty.clone()));
            instantiator.register(ty.clone(), move || resource.clone());
        }
        instantiator
    }

    /// Register a factory for `ty`, replacing any previous one.
    pub fn register<F>(&mut self, ty: impl Into<TypeKey>, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn Resource> + Send + Sync + 'static,
    {
        self.factories.insert(ty.into(), Arc::new(factory));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Instantiator for FactoryInstantiator {
    fn instantiate(&self, ty: &TypeKey) -> Result<Arc<dyn Resource>, InstantiationError> {
        let factory = self
            .factories
            .get(ty)
            .ok_or_else(|| InstantiationError::new(ty.clone(), "no factory registered for this type"))?;
        Ok(factory())
    }
}
