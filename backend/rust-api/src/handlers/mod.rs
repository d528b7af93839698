use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::metrics;
use crate::services::AppState;

pub mod profile;
pub mod progress;
pub mod sessions;
pub mod submissions;
pub mod tips;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let backend = state.store.backend();
    let store_health = match tokio::time::timeout(Duration::from_secs(1), state.store.ping()).await
    {
        Ok(Ok(())) => json!({ "status": "healthy", "backend": backend }),
        Ok(Err(e)) => json!({
            "status": "unhealthy",
            "backend": backend,
            "error": format!("{:#}", e),
        }),
        Err(_) => json!({
            "status": "unhealthy",
            "backend": backend,
            "error": "Store ping timeout after 1s",
        }),
    };

    let healthy = store_health["status"] == "healthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "service": "bandprep-api",
            "version": env!("CARGO_PKG_VERSION"),
            "evaluator": state.evaluator.name(),
            "dependencies": { "store": store_health },
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// HTTP Basic auth for `/metrics`; credentials come from `METRICS_AUTH`
/// as `username:password`.
pub async fn metrics_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let credentials = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|encoded| general_purpose::STANDARD.decode(encoded).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let expected = std::env::var("METRICS_AUTH").unwrap_or_else(|_| "admin:changeme".to_string());
    if credentials != expected {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
