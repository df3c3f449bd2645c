//! Response mapping.
//!
//! # Responsibilities
//! - Serialize successful dispatch outcomes as JSON
//! - Map dispatch failures to HTTP status codes
//!
//! # Design Decisions
//! - Method/path misses are 404 Not Found
//! - Instantiation and unrecognized-locator failures are 500
//! - Path parameters are emitted in sorted order for stable output

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::dispatch::{DispatchError, DispatchOutcome};

/// Body returned when a request reaches a terminal endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub request_id: String,
    pub endpoint: String,
    pub resource_type: String,
    pub path_params: BTreeMap<String, String>,
    pub rounds: usize,
}

impl DispatchResponse {
    pub fn new(request_id: &str, outcome: &DispatchOutcome) -> Self {
        Self {
            request_id: request_id.to_string(),
            endpoint: outcome.endpoint.name().to_string(),
            resource_type: outcome.resource_type.to_string(),
            path_params: outcome
                .path_params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            rounds: outcome.rounds,
        }
    }
}

impl IntoResponse for DispatchResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Body returned when dispatch fails.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub request_id: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(request_id: &str, error: &DispatchError) -> Self {
        Self {
            status: error.status(),
            request_id: request_id.to_string(),
            error: error.to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        ErrorResponse::new("", &self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::TypeKey;
    use crate::routing::Endpoint;
    use std::sync::Arc;

    #[test]
    fn test_error_status() {
        let err = DispatchError::NoMatch {
            ty: TypeKey::new("orders"),
            path: "/x".into(),
        };
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = DispatchError::NotAResource {
            ty: TypeKey::new("plain"),
        };
        let body = ErrorResponse::new("req-9", &err);
        assert_eq!(body.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_outcome_body() {
        let outcome = DispatchOutcome {
            endpoint: Arc::new(Endpoint::resource("get_order")),
            resource_type: TypeKey::new("orders"),
            path_params: [("id".to_string(), "7".to_string())].into_iter().collect(),
            rounds: 2,
        };
        let body = DispatchResponse::new("req-1", &outcome);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["endpoint"], "get_order");
        assert_eq!(json["path_params"]["id"], "7");
        assert_eq!(json["rounds"], 2);
    }
}
