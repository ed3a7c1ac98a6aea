use axum::Router;
use axum::routing::{get, post};

use super::handlers::{circuit, classify, health, thresholds};
use crate::service::SharedState;

/// Create the API router with all endpoints
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health::get_health))
        // Single readings
        .route("/classify", post(classify::classify_measurement))
        .route("/classify/batch", post(classify::classify_batch))
        // Whole circuits and schedules
        .route("/circuits/classify", post(circuit::classify_circuit))
        .route("/schedule/classify", post(circuit::classify_schedule))
        .route("/max_zs", get(circuit::get_max_zs))
        // Threshold table
        .route(
            "/thresholds",
            get(thresholds::get_thresholds).put(thresholds::put_thresholds),
        )
        // Add state to all routes
        .with_state(state)
}
