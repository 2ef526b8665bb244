use crate::routes::types::EchoResponse;
use axum::extract::Request;
use axum::http::header::ORIGIN;
use axum::Json;

/// Fallback handler standing in for the application behind the CORS layer
pub async fn echo(req: Request) -> Json<EchoResponse> {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    Json(EchoResponse {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        origin,
    })
}
