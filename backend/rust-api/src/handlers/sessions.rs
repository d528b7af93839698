use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    error::ServiceResult,
    extractors::AppJson,
    models::{CompleteSessionRequest, CreateSessionRequest},
    services::{session_service::SessionService, AppState, AuthContext},
};

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(req): AppJson<CreateSessionRequest>,
) -> ServiceResult<impl IntoResponse> {
    let service = SessionService::new(state.store.clone());
    let session = service.create_session(&ctx, req.module_type).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> ServiceResult<impl IntoResponse> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.history(&ctx).await?))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(session_id): Path<String>,
) -> ServiceResult<impl IntoResponse> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.get_session(&ctx, &session_id).await?))
}

/// `{}` completes without a score.
pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(session_id): Path<String>,
    AppJson(req): AppJson<CompleteSessionRequest>,
) -> ServiceResult<impl IntoResponse> {
    tracing::info!("Completing session: {}", session_id);

    let service = SessionService::new(state.store.clone());
    Ok(Json(service.complete_session(&ctx, &session_id, req).await?))
}

pub async fn submit_session(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(session_id): Path<String>,
) -> ServiceResult<impl IntoResponse> {
    let service = SessionService::new(state.store.clone());
    Ok(Json(service.submit_session(&ctx, &session_id).await?))
}
