use axum::Json;
use axum::extract::State;

use crate::api::models::*;
use crate::classification::{MeasurementKind, ThresholdTable};
use crate::error::ClassifierError;
use crate::presentation::Treatment;
use crate::service::SharedState;

/// POST /classify - Classify a single reading
pub async fn classify_measurement(
    State(state): State<SharedState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let state = state.read().await;

    let response = classify_one(&state.thresholds, request)?;
    state.record_classified(1);

    Ok(Json(response))
}

/// POST /classify/batch - Classify several readings; any unknown kind rejects the batch
pub async fn classify_batch(
    State(state): State<SharedState>,
    Json(request): Json<BatchClassifyRequest>,
) -> Result<Json<BatchClassifyResponse>, ApiError> {
    let state = state.read().await;

    let results = request
        .measurements
        .into_iter()
        .map(|m| classify_one(&state.thresholds, m))
        .collect::<Result<Vec<_>, _>>()?;

    state.record_classified(results.len() as u64);

    tracing::debug!("Classified batch of {} readings", results.len());

    Ok(Json(BatchClassifyResponse { results }))
}

fn classify_one(
    table: &ThresholdTable,
    request: ClassifyRequest,
) -> Result<ClassifyResponse, ClassifierError> {
    let kind: MeasurementKind = request.kind.parse()?;
    let result = table.classify(kind, &request.value, request.max_zs.as_deref());

    Ok(ClassifyResponse {
        kind,
        label: kind.label(),
        unit: kind.unit(),
        value: request.value,
        result,
        treatment: Treatment::for_result(result),
    })
}
