use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::{
    error::ServiceResult,
    extractors::AppJson,
    models::{profile::StudyTimeRequest, NewProfile, ProfileUpdate},
    services::{profile_service::ProfileService, AppState, AuthContext},
};

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(req): AppJson<NewProfile>,
) -> ServiceResult<impl IntoResponse> {
    let service = ProfileService::new(state.store.clone());
    let profile = service.create_profile(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> ServiceResult<impl IntoResponse> {
    let service = ProfileService::new(state.store.clone());
    Ok(Json(service.get_profile(&ctx).await?))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(update): AppJson<ProfileUpdate>,
) -> ServiceResult<impl IntoResponse> {
    let service = ProfileService::new(state.store.clone());
    Ok(Json(service.update_profile(&ctx, update).await?))
}

pub async fn increment_tests_completed(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> ServiceResult<impl IntoResponse> {
    let service = ProfileService::new(state.store.clone());
    service.increment_test_completion(&ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_study_time(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(req): AppJson<StudyTimeRequest>,
) -> ServiceResult<impl IntoResponse> {
    let service = ProfileService::new(state.store.clone());
    service.add_study_time(&ctx, req.minutes).await?;
    Ok(StatusCode::NO_CONTENT)
}
