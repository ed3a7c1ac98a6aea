use axum::Json;
use axum::extract::{Query, State};

use crate::api::models::*;
use crate::circuit::max_zs::parse_rating;
use crate::circuit::{CircuitClassification, CircuitRecord, DeviceDesignation, TripCurve};
use crate::error::ClassifierError;
use crate::schedule::{Schedule, ScheduleReport};
use crate::service::SharedState;

/// POST /circuits/classify - Classify every field on one circuit
pub async fn classify_circuit(
    State(state): State<SharedState>,
    Json(record): Json<CircuitRecord>,
) -> Json<CircuitClassification> {
    let state = state.read().await;

    let classification = record.classify(&state.thresholds);
    state.record_classified(classification.fields.len() as u64);

    tracing::debug!(
        "Circuit {} classified as {}",
        classification.circuit_number,
        classification.overall
    );

    Json(classification)
}

/// POST /schedule/classify - Classify a whole schedule of tests
pub async fn classify_schedule(
    State(state): State<SharedState>,
    Json(request): Json<ScheduleRequest>,
) -> Json<ScheduleReport> {
    let state = state.read().await;

    let report = Schedule::new(request.circuits).classify(&state.thresholds);
    state.record_classified(report.field_totals.total() as u64);

    Json(report)
}

/// GET /max_zs?curve=B&rating=32 - Tabulated and derated maximum Zs
pub async fn get_max_zs(
    Query(query): Query<MaxZsQuery>,
) -> Result<Json<MaxZsResponse>, ApiError> {
    let curve = query
        .curve
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let designation = match curve {
        Some(curve) => {
            let curve = curve.parse::<TripCurve>()?;
            let rating = parse_rating(&query.rating)
                .ok_or_else(|| ClassifierError::UnknownDevice(query.rating.clone()))?;
            DeviceDesignation::new(curve, rating)
        }
        None => DeviceDesignation::parse(&query.rating)?,
    };

    let (Some(max_zs), Some(derated_max_zs)) =
        (designation.max_zs(), designation.derated_max_zs())
    else {
        return Err(ClassifierError::UnknownDevice(designation.to_string()).into());
    };

    Ok(Json(MaxZsResponse {
        curve: designation.curve,
        rating: designation.rating,
        max_zs,
        derated_max_zs,
    }))
}
