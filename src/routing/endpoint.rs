//! Endpoint descriptors produced by route matching.

use std::fmt;

use crate::hierarchy::TypeKey;

/// A matched, invokable endpoint.
///
/// When `produces` is set the endpoint is a sub-resource locator: invoking it
/// yields a reference to that type, whose own routes are dispatched next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    name: String,
    produces: Option<TypeKey>,
}

impl Endpoint {
    /// A terminal resource method.
    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            produces: None,
        }
    }

    /// A sub-resource locator returning `target`.
    pub fn locator(name: impl Into<String>, target: impl Into<TypeKey>) -> Self {
        Self {
            name: name.into(),
            produces: Some(target.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type a locator endpoint hands back, if any.
    pub fn produces(&self) -> Option<&TypeKey> {
        self.produces.as_ref()
    }

    pub fn is_locator(&self) -> bool {
        self.produces.is_some()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.produces {
            Some(target) => write!(f, "{} -> {}", self.name, target),
            None => f.write_str(&self.name),
        }
    }
}
