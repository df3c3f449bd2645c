//! Per-method path matcher.
//!
//! # Responsibilities
//! - Hold an ordered list of `(template, endpoint)` pairs
//! - Pick one endpoint for a request path
//! - Expose the list so tables can be concatenated by the merger
//!
//! # Design Decisions
//! - Most consumed segments wins, then most literal segments, then first registered
//! - Insertion order is never re-sorted, so merge order stays the final tie-break
//! - Linear scan (route counts per resource type are small)

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::endpoint::Endpoint;
use crate::routing::template::{PathTemplate, TemplateMatch};

/// Path-parameter bindings, name to raw segment value.
pub type PathParams = HashMap<String, String>;

/// A template paired with the endpoint it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath {
    pub template: PathTemplate,
    pub endpoint: Arc<Endpoint>,
}

impl RoutePath {
    pub fn new(template: PathTemplate, endpoint: Arc<Endpoint>) -> Self {
        Self { template, endpoint }
    }
}

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMatch {
    pub endpoint: Arc<Endpoint>,
    /// Unconsumed path suffix, `/` when the path was fully consumed.
    pub remaining: String,
    pub path_params: PathParams,
}

/// Matches request paths against an ordered template set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMapper {
    paths: Vec<RoutePath>,
}

impl PathMapper {
    pub fn new(paths: Vec<RoutePath>) -> Self {
        Self { paths }
    }

    /// Templates in registration order.
    pub fn paths(&self) -> &[RoutePath] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Match `path` and return the winning endpoint, or `None`.
    pub fn map(&self, path: &str) -> Option<RequestMatch> {
        let mut best: Option<(&RoutePath, (usize, usize), TemplateMatch)> = None;

        for route in &self.paths {
            let Some(m) = route.template.match_prefix(path) else {
                continue;
            };
            let rank = (m.consumed, route.template.literal_count());
            // strictly better only: earlier registrations keep ties
            if best.as_ref().map_or(true, |(_, r, _)| rank > *r) {
                best = Some((route, rank, m));
            }
        }

        best.map(|(route, _, m)| RequestMatch {
            endpoint: route.endpoint.clone(),
            remaining: m.remaining,
            path_params: m.params.into_iter().collect(),
        })
    }
}
