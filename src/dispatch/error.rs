//! Dispatch error taxonomy.

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::dispatch::instantiate::InstantiationError;
use crate::hierarchy::TypeKey;

/// How a dispatch failure surfaces to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A valid routing outcome: nothing serves this request.
    NotFound,
    /// A programming or configuration error on the server side.
    ServerFault,
}

/// Terminal failure of a locator dispatch. Never retried.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),

    #[error("resource locator returned a value of type `{ty}` that is not a resource")]
    NotAResource { ty: TypeKey },

    #[error("resource `{ty}` has no `{method}` routes")]
    MethodNotSupported { ty: TypeKey, method: Method },

    #[error("no route on resource `{ty}` matches `{path}`")]
    NoMatch { ty: TypeKey, path: String },

    #[error("no locator value on the request context")]
    MissingLocator,

    #[error("endpoint `{endpoint}` left `{remaining}` unmatched")]
    UnconsumedPath { endpoint: String, remaining: String },

    #[error("locator chain exceeded {limit} rounds")]
    TooManyRounds { limit: usize },
}

impl DispatchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DispatchError::MethodNotSupported { .. }
            | DispatchError::NoMatch { .. }
            | DispatchError::UnconsumedPath { .. } => FailureKind::NotFound,
            DispatchError::Instantiation(_)
            | DispatchError::NotAResource { .. }
            | DispatchError::MissingLocator
            | DispatchError::TooManyRounds { .. } => FailureKind::ServerFault,
        }
    }

    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self.kind() {
            FailureKind::NotFound => StatusCode::NOT_FOUND,
            FailureKind::ServerFault => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self.kind() {
            FailureKind::NotFound => "not_found",
            FailureKind::ServerFault => "fault",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = DispatchError::MethodNotSupported {
            ty: TypeKey::new("Orders"),
            method: Method::POST,
        };
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.outcome(), "not_found");

        let fault = DispatchError::NotAResource {
            ty: TypeKey::new("Plain"),
        };
        assert_eq!(fault.kind(), FailureKind::ServerFault);
        assert_eq!(fault.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let inst = DispatchError::from(InstantiationError::new(TypeKey::new("Broken"), "no factory"));
        assert_eq!(inst.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(inst.to_string().contains("Broken"));
    }

    #[test]
    fn test_error_display() {
        let err = DispatchError::NoMatch {
            ty: TypeKey::new("Orders"),
            path: "/c".into(),
        };
        assert_eq!(err.to_string(), "no route on resource `Orders` matches `/c`");
    }
}
