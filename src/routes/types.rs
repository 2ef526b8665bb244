use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub config_path: String,
    pub rules: usize,
}

/// Echo response describing the request that reached the handler
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub method: String,
    pub path: String,
    pub origin: Option<String>,
}
