use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod evaluator;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod scoring;
pub mod services;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    let api = Router::new()
        .merge(sessions_routes())
        .merge(submissions_routes())
        .route("/progress", get(handlers::progress::get_progress))
        .merge(profile_routes())
        .merge(tips_routes())
        .nest("/admin", admin_routes())
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::auth::auth_context_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/v1", api)
        .with_state(app_state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
}

fn sessions_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/sessions",
            post(handlers::sessions::create_session).get(handlers::sessions::list_sessions),
        )
        .route("/sessions/{id}", get(handlers::sessions::get_session))
        .route("/sessions/{id}/complete", post(handlers::sessions::complete_session))
        .route("/sessions/{id}/submit", post(handlers::sessions::submit_session))
}

fn submissions_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/submissions/writing",
            post(handlers::submissions::submit_writing).get(handlers::submissions::list_writing),
        )
        .route("/submissions/speaking", post(handlers::submissions::submit_speaking))
        .route("/submissions/reading", post(handlers::submissions::submit_reading))
        .route("/submissions/listening", post(handlers::submissions::submit_listening))
}

fn profile_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/profile",
            post(handlers::profile::create_profile)
                .get(handlers::profile::get_profile)
                .patch(handlers::profile::update_profile),
        )
        .route(
            "/profile/tests-completed",
            post(handlers::profile::increment_tests_completed),
        )
        .route("/profile/study-time", post(handlers::profile::add_study_time))
}

fn tips_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tips", get(handlers::tips::daily_tips))
        .route("/tips/personalized", get(handlers::tips::personalized_tips))
        .route("/tips/category/{category}", get(handlers::tips::tips_by_category))
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tips", post(handlers::tips::add_tip))
        .route_layer(middleware::from_fn(
            middlewares::auth::admin_guard_middleware,
        ))
}
