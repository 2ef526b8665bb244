//! CORS header application.
//!
//! The dispatcher never writes CORS headers itself: it hands the matched
//! rule's [`CorsOptions`] to a [`CorsPolicy`]. [`StandardCors`] is the policy
//! used by the server.

use axum::extract::Request;
use http::header::{
    HeaderName, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
    ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
    VARY,
};
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;

/// Origin entry that allows every origin
pub const ANY_ORIGIN: &str = "*";

/// Methods sent in preflight responses unless a rule overrides them
pub const DEFAULT_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";

/// CORS options for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorsOptions {
    /// Allowed origins; an entry of `*` allows any origin
    pub allowed_origins: Vec<String>,

    /// Value of `Access-Control-Allow-Methods` on preflight responses
    pub allowed_methods: String,

    /// `Access-Control-Allow-Credentials`, not sent when unset
    pub allow_credentials: Option<bool>,

    /// `Access-Control-Max-Age` in seconds, not sent unless positive
    pub max_age: i64,

    /// `Access-Control-Allow-Headers`; empty echoes the requested headers
    pub allowed_headers: String,

    /// `Access-Control-Expose-Headers`, not sent when empty
    pub exposed_headers: String,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            allowed_origins: vec![ANY_ORIGIN.to_string()],
            allowed_methods: DEFAULT_METHODS.to_string(),
            allow_credentials: None,
            max_age: 0,
            allowed_headers: String::new(),
            exposed_headers: String::new(),
        }
    }
}

impl CorsOptions {
    /// Whether `origin` passes this rule's origin filter
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins
            .iter()
            .any(|allowed| allowed == ANY_ORIGIN || allowed == origin)
    }
}

/// Capability used by the dispatcher to write CORS headers
#[cfg_attr(test, mockall::automock)]
pub trait CorsPolicy: Send + Sync {
    /// Write the CORS response headers for `request` into `headers`
    fn apply_headers(&self, options: &CorsOptions, request: &Request, headers: &mut HeaderMap);

    /// Whether `request` is a CORS preflight request
    fn is_preflight(&self, request: &Request) -> bool;
}

/// Standard CORS header logic
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCors;

impl CorsPolicy for StandardCors {
    fn apply_headers(&self, options: &CorsOptions, request: &Request, headers: &mut HeaderMap) {
        headers.append(VARY, HeaderValue::from_static("origin"));

        let Some(origin) = request.headers().get(ORIGIN) else {
            return;
        };
        let allowed = origin
            .to_str()
            .map(|o| options.is_origin_allowed(o))
            .unwrap_or(false);
        if !allowed {
            tracing::debug!(origin = ?origin, "Origin not allowed by CORS rule");
            return;
        }
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());

        if self.is_preflight(request) {
            set_header(headers, ACCESS_CONTROL_ALLOW_METHODS, &options.allowed_methods);
            if !options.allowed_headers.is_empty() {
                set_header(headers, ACCESS_CONTROL_ALLOW_HEADERS, &options.allowed_headers);
            } else if let Some(requested) = request.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
                headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
            }
            if options.max_age > 0 {
                headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(options.max_age));
            }
        }

        if let Some(credentials) = options.allow_credentials {
            let value = if credentials { "true" } else { "false" };
            headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static(value));
        }
        if !options.exposed_headers.is_empty() {
            set_header(headers, ACCESS_CONTROL_EXPOSE_HEADERS, &options.exposed_headers);
        }
    }

    fn is_preflight(&self, request: &Request) -> bool {
        request.method() == Method::OPTIONS
            && request
                .headers()
                .get(ACCESS_CONTROL_REQUEST_METHOD)
                .is_some_and(|v| !v.is_empty())
    }
}

fn set_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => {
            tracing::warn!(header = %name, value = %value, "Skipping invalid CORS header value");
        }
    }
}
