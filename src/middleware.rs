//! Request-time dispatch of CORS rules.
//!
//! Rules are scanned in configuration order and the first one whose path
//! prefix matches the request decides the outcome. Later rules are never
//! consulted once a rule has matched, even if the matched rule's origin
//! filter rejects the request.

use crate::cors::CorsPolicy;
use crate::rules::CorsRule;
use axum::{
    extract::{Request, State},
    http::{header::VARY, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Whether a rule scoped to `rule_path` applies to `request_path`.
///
/// Plain, case-sensitive string prefix match: `/api` matches `/api`,
/// `/api/widgets` and `/apiv2`; `/` matches everything; `/api/` does not
/// match `/api`.
pub fn path_matches(rule_path: &str, request_path: &str) -> bool {
    request_path.starts_with(rule_path)
}

/// Outcome of scanning the rules for one request
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// A rule matched a preflight request; answer immediately
    Preflight(HeaderMap),

    /// A rule matched; run the next handler and add these headers
    Forward(HeaderMap),

    /// No rule matched
    Unmatched,
}

/// Applies the first matching CORS rule to each request
#[derive(Clone)]
pub struct CorsDispatcher {
    rules: Arc<[CorsRule]>,
    policy: Arc<dyn CorsPolicy>,
}

impl CorsDispatcher {
    pub fn new<P>(rules: Vec<CorsRule>, policy: P) -> Self
    where
        P: CorsPolicy + 'static,
    {
        Self {
            rules: rules.into(),
            policy: Arc::new(policy),
        }
    }

    pub fn rules(&self) -> &[CorsRule] {
        &self.rules
    }

    /// First rule whose path matches `path`
    pub fn matching_rule(&self, path: &str) -> Option<&CorsRule> {
        self.rules.iter().find(|rule| path_matches(&rule.path, path))
    }

    /// Decide how `request` should be handled
    pub fn dispatch(&self, request: &Request) -> Dispatch {
        let Some(rule) = self.matching_rule(request.uri().path()) else {
            return Dispatch::Unmatched;
        };

        let mut headers = HeaderMap::new();
        self.policy.apply_headers(&rule.options, request, &mut headers);

        if self.policy.is_preflight(request) {
            tracing::debug!(rule = %rule.path, path = %request.uri().path(), "Answering CORS preflight");
            Dispatch::Preflight(headers)
        } else {
            tracing::debug!(rule = %rule.path, path = %request.uri().path(), "Applied CORS rule");
            Dispatch::Forward(headers)
        }
    }
}

/// CORS middleware - install with `axum::middleware::from_fn_with_state`
pub async fn cors_rules_middleware(
    State(dispatcher): State<Arc<CorsDispatcher>>,
    req: Request,
    next: Next,
) -> Response {
    let dispatch = dispatcher.dispatch(&req);
    match dispatch {
        Dispatch::Preflight(headers) => (StatusCode::OK, headers).into_response(),
        Dispatch::Forward(headers) => {
            let mut response = next.run(req).await;
            merge_headers(response.headers_mut(), &headers);
            response
        }
        Dispatch::Unmatched => next.run(req).await,
    }
}

/// Add CORS headers to a handler's response. `Vary` is appended; any other
/// header the handler already set is left alone.
fn merge_headers(target: &mut HeaderMap, cors: &HeaderMap) {
    for name in cors.keys() {
        if name != VARY && target.contains_key(name) {
            continue;
        }
        for value in cors.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}
