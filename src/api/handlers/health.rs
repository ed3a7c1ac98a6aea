use axum::Json;
use axum::extract::State;

use crate::api::models::*;
use crate::service::SharedState;

/// GET /health - Liveness and a running count of classified readings
pub async fn get_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let state = state.read().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        classified: state.classified(),
        uptime_seconds: state.uptime_seconds(),
    })
}
