use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::{
    error::ServiceResult,
    extractors::AppJson,
    models::{
        ListeningSubmissionRequest, ReadingSubmissionRequest, SpeakingSubmissionRequest,
        WritingSubmissionRequest,
    },
    services::{submission_service::SubmissionService, AppState, AuthContext},
};

fn service(state: &AppState) -> SubmissionService {
    SubmissionService::new(state.store.clone(), state.evaluator.clone())
}

pub async fn submit_writing(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(req): AppJson<WritingSubmissionRequest>,
) -> ServiceResult<impl IntoResponse> {
    let submission = service(&state).submit_writing(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn list_writing(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service(&state).writing_history(&ctx).await?))
}

pub async fn submit_speaking(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(req): AppJson<SpeakingSubmissionRequest>,
) -> ServiceResult<impl IntoResponse> {
    let recording = service(&state).submit_speaking(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(recording)))
}

pub async fn submit_reading(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(req): AppJson<ReadingSubmissionRequest>,
) -> ServiceResult<impl IntoResponse> {
    let response = service(&state).submit_reading(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn submit_listening(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(req): AppJson<ListeningSubmissionRequest>,
) -> ServiceResult<impl IntoResponse> {
    let response = service(&state).submit_listening(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
