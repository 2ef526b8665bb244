//! Integration tests for the CORS middleware stack.
//!
//! These drive the full router (rules parsed from Corsfile text, standard
//! CORS policy, echo fallback) with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pathcors::cors::StandardCors;
use pathcors::middleware::CorsDispatcher;
use pathcors::routes::{create_router, AppState};
use pathcors::rules::parse_str;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const CORSFILE: &str = r#"
# API is restricted to one origin
cors http://app.example.com /api {
    methods "GET, POST"
    allow_credentials true
    max_age 600
    exposed_headers X-Total-Count
}

# Everything else is open
cors /
"#;

fn app() -> Router {
    let rules = parse_str("Corsfile", CORSFILE).expect("test Corsfile should parse");
    let state = Arc::new(AppState {
        config_path: "Corsfile".into(),
        rule_count: rules.len(),
    });
    create_router(state, CorsDispatcher::new(rules, StandardCors))
}

fn request(method: Method, uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Test module for simple (non-preflight) requests
mod simple_request_tests {
    use super::*;

    #[tokio::test]
    async fn test_allowed_origin_reaches_handler_with_headers() {
        let response = app()
            .oneshot(request(
                Method::GET,
                "/api/widgets",
                &[("origin", "http://app.example.com")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://app.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_EXPOSE_HEADERS], "X-Total-Count");
        assert!(headers.get(header::ACCESS_CONTROL_MAX_AGE).is_none());

        let body = body_json(response).await;
        assert_eq!(body["path"], "/api/widgets");
        assert_eq!(body["method"], "GET");
        assert_eq!(body["origin"], "http://app.example.com");
    }

    #[tokio::test]
    async fn test_restrictive_rule_shadows_open_rule() {
        // /api matches first and rejects this origin; the open / rule is never used
        let response = app()
            .oneshot(request(
                Method::GET,
                "/api/widgets",
                &[("origin", "http://other.com")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
        assert_eq!(response.headers()[header::VARY], "origin");
    }

    #[tokio::test]
    async fn test_open_rule_echoes_any_origin() {
        let response = app()
            .oneshot(request(
                Method::GET,
                "/static/app.js",
                &[("origin", "http://other.com")],
            ))
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://other.com"
        );
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .is_none());
    }

    #[tokio::test]
    async fn test_health_route_is_behind_cors() {
        let response = app()
            .oneshot(request(Method::GET, "/_health", &[("origin", "http://x.com")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://x.com"
        );
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["rules"], 2);
    }
}

/// Test module for preflight requests
mod preflight_tests {
    use super::*;

    #[tokio::test]
    async fn test_preflight_is_answered_without_handler() {
        let response = app()
            .oneshot(request(
                Method::OPTIONS,
                "/api/widgets",
                &[
                    ("origin", "http://app.example.com"),
                    ("access-control-request-method", "POST"),
                    ("access-control-request-headers", "content-type"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "600");

        // The echo handler would have produced a JSON body
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_preflight_still_short_circuits() {
        let response = app()
            .oneshot(request(
                Method::OPTIONS,
                "/api",
                &[
                    ("origin", "http://other.com"),
                    ("access-control-request-method", "DELETE"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_plain_options_request_reaches_handler() {
        let response = app()
            .oneshot(request(Method::OPTIONS, "/api", &[("origin", "http://app.example.com")]))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["method"], "OPTIONS");
    }
}

/// Test module for routers with no matching rule
mod unmatched_tests {
    use super::*;

    #[tokio::test]
    async fn test_unmatched_path_is_untouched() {
        let rules = parse_str("Corsfile", "cors /api").unwrap();
        let state = Arc::new(AppState {
            config_path: "Corsfile".into(),
            rule_count: rules.len(),
        });
        let app = create_router(state, CorsDispatcher::new(rules, StandardCors));

        let response = app
            .oneshot(request(
                Method::OPTIONS,
                "/other",
                &[
                    ("origin", "http://x.com"),
                    ("access-control-request-method", "GET"),
                ],
            ))
            .await
            .unwrap();

        assert!(response.headers().get(header::VARY).is_none());
        let body = body_json(response).await;
        assert_eq!(body["path"], "/other");
    }
}
