use axum::Json;
use axum::extract::State;

use crate::api::models::*;
use crate::classification::ThresholdTable;
use crate::service::SharedState;

/// GET /thresholds - Active threshold table
pub async fn get_thresholds(State(state): State<SharedState>) -> Json<ThresholdsResponse> {
    let state = state.read().await;

    Json(ThresholdsResponse {
        rows: state.thresholds.rows(),
    })
}

/// PUT /thresholds - Replace the threshold table; sections left out keep their defaults
pub async fn put_thresholds(
    State(state): State<SharedState>,
    Json(table): Json<ThresholdTable>,
) -> Result<Json<ThresholdsResponse>, ApiError> {
    table.validate()?;

    let mut state = state.write().await;
    state.thresholds = table;

    tracing::info!("Threshold table replaced");

    Ok(Json(ThresholdsResponse {
        rows: state.thresholds.rows(),
    }))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::classification::{MeasurementKind, Rule};
    use crate::error::ClassifierError;
    use crate::service::state::create_shared_state;

    #[tokio::test]
    async fn test_get_thresholds() {
        let state = create_shared_state();

        let response = get_thresholds(State(state)).await;

        assert_eq!(response.rows.len(), MeasurementKind::ALL.len());
        assert_eq!(response.rows[1].kind, MeasurementKind::Zs);
    }

    #[tokio::test]
    async fn test_put_thresholds() {
        let state = create_shared_state();

        let mut table = ThresholdTable::default();
        table.rcd_trip_time.pass_max = dec!(40);
        table.rcd_trip_time.warning_max = dec!(40);

        let response = put_thresholds(State(state.clone()), Json(table)).await.unwrap();

        let rcd = response
            .rows
            .iter()
            .find(|r| r.kind == MeasurementKind::RcdTripTime)
            .unwrap();
        assert!(matches!(&rcd.rule, Rule::Ceiling(rule) if rule.pass_max == dec!(40)));

        // Verify state was updated
        assert_eq!(state.read().await.thresholds.rcd_trip_time.pass_max, dec!(40));
    }

    #[tokio::test]
    async fn test_put_thresholds_rejects_invalid() {
        let state = create_shared_state();

        let mut table = ThresholdTable::default();
        table.r1r2.warning_max = dec!(0.5);

        let err = put_thresholds(State(state.clone()), Json(table)).await.unwrap_err();

        assert!(matches!(err.0, ClassifierError::Config(_)));
        // Active table untouched
        assert_eq!(state.read().await.thresholds, ThresholdTable::default());
    }
}
