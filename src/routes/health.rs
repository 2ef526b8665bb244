use crate::routes::types::HealthCheckResponse;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use super::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        config_path: state.config_path.display().to_string(),
        rules: state.rule_count,
    })
}
