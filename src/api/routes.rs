use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::search))
        .route("/movies/:id/availability", get(handlers::availability))
        .route(
            "/movies/:id/ratings/histogram",
            get(handlers::movie_histogram),
        )
        .route("/ratings/analysis", post(handlers::score_analysis))
}
