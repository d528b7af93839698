use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::ServiceResult,
    extractors::AppJson,
    models::{NewTip, TipCategory},
    services::{tips_service::TipsService, AppState, AuthContext},
};

#[derive(Debug, Deserialize)]
pub struct TipsQuery {
    pub limit: Option<usize>,
}

pub async fn daily_tips(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TipsQuery>,
) -> ServiceResult<impl IntoResponse> {
    let service = TipsService::new(state.store.clone());
    Ok(Json(service.daily_tips(query.limit).await?))
}

pub async fn personalized_tips(
    State(state): State<Arc<AppState>>,
) -> ServiceResult<impl IntoResponse> {
    let service = TipsService::new(state.store.clone());
    Ok(Json(service.personalized_tips().await?))
}

pub async fn tips_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<TipCategory>,
) -> ServiceResult<impl IntoResponse> {
    let service = TipsService::new(state.store.clone());
    Ok(Json(service.tips_by_category(category).await?))
}

pub async fn add_tip(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    AppJson(req): AppJson<NewTip>,
) -> ServiceResult<impl IntoResponse> {
    let service = TipsService::new(state.store.clone());
    let tip = service.add_tip(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(tip)))
}
