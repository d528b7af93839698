use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by the practice services.
///
/// Nothing here is retried or recovered locally; every variant propagates to
/// the caller, which for HTTP means a JSON error body with a matching status.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No active identity when an operation needs one.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    /// The caller broke a documented precondition (zero questions, a
    /// backwards status move, ...).
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The data store rejected a read or write.
    #[error("Persistence failure: {0:#}")]
    Persistence(anyhow::Error),

    /// The external evaluator could not produce an assessment.
    #[error("Evaluation failure: {0:#}")]
    Evaluation(anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::PreconditionViolation(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Evaluation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = json!({
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
