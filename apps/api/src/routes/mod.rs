pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/match-jobs", post(handlers::handle_match_jobs))
        .route(
            "/api/calculate-similarity",
            post(handlers::handle_calculate_similarity),
        )
        .route("/api/extract-skills", post(handlers::handle_extract_skills))
        .route(
            "/api/recommendations",
            post(handlers::handle_recommendations),
        )
        .with_state(state)
}
