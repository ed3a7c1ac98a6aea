use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::circuit::{CircuitRecord, TripCurve};
use crate::classification::{ClassificationResult, MeasurementKind, ThresholdRow};
use crate::error::ClassifierError;
use crate::presentation::Treatment;

// ============= Health Endpoint =============

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub classified: u64,
    pub uptime_seconds: i64,
}

// ============= Classification Endpoints =============

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    /// Wire name or alias, e.g. "zs", "r1+r2"
    pub kind: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub max_zs: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub kind: MeasurementKind,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub value: String,
    pub result: ClassificationResult,
    pub treatment: Treatment,
}

#[derive(Debug, Deserialize)]
pub struct BatchClassifyRequest {
    pub measurements: Vec<ClassifyRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchClassifyResponse {
    pub results: Vec<ClassifyResponse>,
}

// ============= Circuit Endpoints =============

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub circuits: Vec<CircuitRecord>,
}

#[derive(Debug, Deserialize)]
pub struct MaxZsQuery {
    /// May be blank when `rating` carries the full designation ("B32")
    #[serde(default)]
    pub curve: Option<String>,
    pub rating: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaxZsResponse {
    pub curve: TripCurve,
    pub rating: u16,
    pub max_zs: Decimal,
    pub derated_max_zs: Decimal,
}

// ============= Threshold Endpoints =============

#[derive(Debug, Serialize)]
pub struct ThresholdsResponse {
    pub rows: Vec<ThresholdRow>,
}

// ============= Error Response =============

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned from handlers, rendered as `ErrorResponse` JSON
#[derive(Debug)]
pub struct ApiError(pub ClassifierError);

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ClassifierError::UnknownKind(_) | ClassifierError::UnsupportedFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            ClassifierError::UnknownDevice(_) => StatusCode::NOT_FOUND,
            ClassifierError::Config(_) | ClassifierError::Toml(_) | ClassifierError::Json(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ClassifierError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::warn!("Request failed ({}): {}", status, self.0);

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let response = ApiError(ClassifierError::UnknownKind("volts".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            ApiError(ClassifierError::UnknownDevice("K32".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError(ClassifierError::Config("bad".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_classify_request_defaults() {
        let request: ClassifyRequest = serde_json::from_str(r#"{"kind": "zs"}"#).unwrap();

        assert_eq!(request.value, "");
        assert!(request.max_zs.is_none());
    }
}
