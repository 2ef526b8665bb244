use crate::middleware::{cors_rules_middleware, CorsDispatcher};
use axum::middleware;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::echo;
use super::health;
use super::AppState;

/// Create application router
///
/// Every route, including the fallback, sits behind the CORS rules.
pub fn create_router(state: Arc<AppState>, dispatcher: CorsDispatcher) -> axum::Router {
    let health_routes = axum::Router::new().route("/_health", get(health::health_check));

    health_routes
        .fallback(echo::echo)
        .layer(middleware::from_fn_with_state(
            Arc::new(dispatcher),
            cors_rules_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
