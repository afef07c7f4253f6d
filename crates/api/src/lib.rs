#![forbid(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use services::{AppServices, ProgressService};
use tower_http::trace::TraceLayer;

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use config::Config;
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub progress: Arc<ProgressService>,
}

impl AppState {
    #[must_use]
    pub fn new(services: &AppServices) -> Self {
        Self {
            progress: services.progress(),
        }
    }
}

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/v1/courses/recent-activity",
            get(routes::recent_activity),
        )
        .route(
            "/api/v1/courses/:course_id/progress",
            get(routes::course_progress),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
