use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use circuit_test_service::api::create_router;
use circuit_test_service::service::state::create_shared_state;

fn server() -> TestServer {
    TestServer::new(create_router(create_shared_state())).unwrap()
}

#[tokio::test]
async fn classify_reading_end_to_end() {
    let server = server();

    let response = server
        .post("/classify")
        .json(&json!({ "kind": "zs", "value": "0.81", "max_zs": "1.0" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["kind"], "zs");
    assert_eq!(body["result"], "warning");
    assert_eq!(body["treatment"]["border_style"], "warning");

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["classified"], 1);
}

#[tokio::test]
async fn zs_without_limit_is_unknown() {
    let server = server();

    let body: Value = server
        .post("/classify")
        .json(&json!({ "kind": "zs", "value": "0.3" }))
        .await
        .json();

    assert_eq!(body["result"], "unknown");
    assert_eq!(body["treatment"]["icon"], Value::Null);
}

#[tokio::test]
async fn batch_rejects_unknown_kind() {
    let server = server();

    let response = server
        .post("/classify/batch")
        .json(&json!({
            "measurements": [
                { "kind": "r1r2", "value": "0.5" },
                { "kind": "voltage", "value": "230" }
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("voltage"));
}

#[tokio::test]
async fn circuit_from_form_export() {
    let server = server();

    let body: Value = server
        .post("/circuits/classify")
        .json(&json!({
            "circuitNumber": "1",
            "circuitDesignation": "C1",
            "bsStandard": "BS EN 61009-1",
            "protectiveDeviceCurve": "B",
            "protectiveDeviceRating": "32",
            "r1r2": "0.31",
            "zs": "0.42",
            "insulationLiveEarth": ">200",
            "polarity": "✓",
            "rcdOneX": "18",
            "pfc": "2.1"
        }))
        .await
        .json();

    assert_eq!(body["overall"], "pass");
    assert_eq!(body["max_zs"], "1.10");
    assert_eq!(body["max_zs_source"], "derived");
    assert_eq!(body["fields"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn schedule_report_totals() {
    let server = server();

    let body: Value = server
        .post("/schedule/classify")
        .json(&json!({
            "circuits": [
                { "circuitNumber": "1", "r1r2": "0.4", "polarity": "ok" },
                { "circuitNumber": "2", "insulationLiveEarth": "0.5" },
                { "circuitNumber": "3" }
            ]
        }))
        .await
        .json();

    assert_eq!(body["overall"], "fail");
    assert_eq!(body["circuit_totals"]["pass"], 1);
    assert_eq!(body["circuit_totals"]["fail"], 1);
    assert_eq!(body["circuit_totals"]["unknown"], 1);
    assert!(body["generated_at"].is_string());
}

#[tokio::test]
async fn replacing_thresholds_changes_verdicts() {
    let server = server();

    server
        .put("/thresholds")
        .json(&json!({ "r1r2": { "pass_max": "0.2", "warning_max": "0.3" } }))
        .await
        .assert_status_ok();

    let body: Value = server
        .post("/classify")
        .json(&json!({ "kind": "r1r2", "value": "0.31" }))
        .await
        .json();
    assert_eq!(body["result"], "fail");

    let rows: Value = server.get("/thresholds").await.json();
    assert_eq!(rows["rows"][0]["rule"]["type"], "ceiling");
    assert_eq!(rows["rows"][0]["rule"]["pass_max"], "0.2");
}

#[tokio::test]
async fn invalid_thresholds_are_rejected() {
    let server = server();

    server
        .put("/thresholds")
        .json(&json!({ "polarity": { "accepted": [] } }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn max_zs_lookup() {
    let server = server();

    let body: Value = server
        .get("/max_zs")
        .add_query_param("curve", "C")
        .add_query_param("rating", "20")
        .await
        .json();

    assert_eq!(body["curve"], "C");
    assert_eq!(body["max_zs"], "1.09");
    assert_eq!(body["derated_max_zs"], "0.87");

    server
        .get("/max_zs")
        .add_query_param("rating", "B45")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
