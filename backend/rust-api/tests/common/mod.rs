#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bandprep_api::{
    config::{Config, EvaluatorConfig, StoreBackend},
    create_router,
    evaluator::SimulatedEvaluator,
    middlewares::auth::{JwtClaims, JwtService},
    services::AppState,
    store::MemoryStore,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_database: "bandprep_test".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        store_backend: StoreBackend::Memory,
        evaluator: EvaluatorConfig {
            url: None,
            writing_delay_ms: 0,
            speaking_delay_ms: 0,
            timeout_secs: 1,
        },
    }
}

pub fn create_test_app() -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let app_state = Arc::new(AppState::new(
        test_config(),
        Arc::new(MemoryStore::new()),
        Arc::new(SimulatedEvaluator::instant()),
    ));

    create_router(app_state)
}

pub fn token_for(user_id: &str, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    JwtService::new(TEST_SECRET)
        .generate_token(&JwtClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + 3600) as usize,
            iat: now as usize,
        })
        .unwrap()
}

/// A fresh student id with its bearer token.
pub fn new_student() -> (String, String) {
    let user_id = format!("student-{}", Uuid::new_v4());
    let token = token_for(&user_id, "student");
    (user_id, token)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };
    (status, json)
}

pub async fn create_profile(app: &Router, token: &str, current_score: f64) {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/profile",
        Some(token),
        Some(serde_json::json!({
            "full_name": "Test Student",
            "email": "student@example.com",
            "target_score": 7.5,
            "current_score": current_score,
            "study_goal": "Graduate school",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}
