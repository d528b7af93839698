use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::{
    error::ServiceResult,
    services::{progress_service::ProgressService, AppState, AuthContext},
};

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> ServiceResult<impl IntoResponse> {
    let service = ProgressService::new(state.store.clone());
    Ok(Json(service.get_user_progress(&ctx).await?))
}
