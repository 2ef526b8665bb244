//! Server startup and shutdown logic.

use crate::config::Config;
use crate::cors::StandardCors;
use crate::error::{AppError, AppResult};
use crate::middleware::CorsDispatcher;
use crate::routes;
use crate::rules;
use crate::state;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the web server with the given configuration.
///
/// The CORS rules are loaded before the listener is bound, so an invalid
/// Corsfile stops startup.
///
/// # Errors
///
/// This function will return an error if:
/// - The Corsfile cannot be read or contains a syntax error
/// - Server binding fails
/// - Server runtime error occurs
pub async fn run_server(config: Config) -> AppResult<()> {
    info!("Starting pathcors server...");

    let rules = rules::load_rules(&config.cors.config_path)?;
    for rule in &rules {
        tracing::debug!(path = %rule.path, options = ?rule.options, "CORS rule");
    }

    let state = Arc::new(state::AppState {
        config_path: config.cors.config_path.clone(),
        rule_count: rules.len(),
    });
    let dispatcher = CorsDispatcher::new(rules, StandardCors);

    let app = routes::create_router(state, dispatcher);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create a future that resolves when a shutdown signal is received.
///
/// On Unix-like systems, this listens for both Ctrl+C (SIGINT) and SIGTERM.
/// On other platforms, it only listens for Ctrl+C.
///
/// # Panics
///
/// Panics if signal handler installation fails.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
