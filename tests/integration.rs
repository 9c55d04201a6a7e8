//! Integration tests for the Payroll Engine HTTP API.
//!
//! This test suite drives the router end to end:
//! - Deduction computation (PF cap, ESI cliff, slab tax)
//! - Anomaly and compliance scans
//! - Readiness scoring
//! - Pay run creation, retrieval and immutability
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/rules.yaml").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

fn record(id: &str, basic: &str, gross: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Employee {}", id),
        "department": "Operations",
        "role": "Analyst",
        "basic": basic,
        "gross": gross,
        "bank_account": format!("ACC-{}", id),
        "tax_id": format!("TAX-{}", id)
    })
}

fn assert_decimal(value: &Value, expected: &str) {
    let actual = value.as_str().unwrap_or_else(|| panic!("Expected decimal string, got {}", value));
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

fn rule_ids(flags: &Value) -> Vec<&str> {
    flags
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["rule_id"].as_str().unwrap())
        .collect()
}

// =============================================================================
// SECTION 1: Deductions
// =============================================================================

#[tokio::test]
async fn test_below_esi_threshold_low_slab() {
    let (status, result) = post(
        create_router_for_test(),
        "/deductions",
        json!({ "records": [record("emp_a", "10000", "15000")] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let breakdown = &result["calculations"][0]["breakdown"];
    assert_decimal(&breakdown["pf"], "1200");
    assert_decimal(&breakdown["esi"], "113");
    assert_decimal(&breakdown["tax"], "0");
    assert_decimal(&breakdown["professional_tax"], "200");
    assert_decimal(&breakdown["total_deductions"], "1513");
}

#[tokio::test]
async fn test_pf_capped_moderate_slabs() {
    let (status, result) = post(
        create_router_for_test(),
        "/deductions",
        json!({ "records": [record("emp_b", "50000", "60000")] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let breakdown = &result["calculations"][0]["breakdown"];
    assert_decimal(&breakdown["pf"], "1800");
    assert_decimal(&breakdown["employer_pf"], "1800");
    assert_decimal(&breakdown["esi"], "0");
    assert_decimal(&breakdown["tax"], "2250");
    assert_decimal(&breakdown["total_deductions"], "4250");
}

#[tokio::test]
async fn test_esi_applies_at_exact_threshold() {
    let (status, result) = post(
        create_router_for_test(),
        "/deductions",
        json!({ "records": [
            record("at", "10000", "21000"),
            record("above", "10000", "21001")
        ] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 21000 × 0.0075 = 157.5 rounds away from zero
    assert_decimal(&result["calculations"][0]["breakdown"]["esi"], "158");
    assert_decimal(&result["calculations"][1]["breakdown"]["esi"], "0");
}

#[tokio::test]
async fn test_deductions_total_across_records() {
    let (status, result) = post(
        create_router_for_test(),
        "/deductions",
        json!({ "records": [
            record("emp_a", "10000", "15000"),
            record("emp_b", "50000", "60000")
        ] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["calculations"].as_array().unwrap().len(), 2);
    assert_eq!(result["calculations"][0]["record_id"], "emp_a");
    assert_eq!(result["calculations"][1]["record_id"], "emp_b");
    assert_decimal(&result["total_deductions"], "5763");
}

#[tokio::test]
async fn test_audit_trace_names_every_component() {
    let (status, result) = post(
        create_router_for_test(),
        "/deductions",
        json!({ "records": [record("emp_b", "50000", "60000")] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let steps = result["calculations"][0]["audit_trace"]["steps"]
        .as_array()
        .unwrap();
    let ids: Vec<&str> = steps.iter().map(|s| s["rule_id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec!["provident_fund", "state_insurance", "income_tax", "professional_tax"]
    );

    for (index, step) in steps.iter().enumerate() {
        assert_eq!(step["step_number"].as_u64().unwrap(), index as u64 + 1);
        assert!(step["rule_name"].is_string());
        assert!(step["reasoning"].is_string());
    }
}

#[tokio::test]
async fn test_empty_deduction_request_returns_zero_total() {
    let (status, result) = post(
        create_router_for_test(),
        "/deductions",
        json!({ "records": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["calculations"].as_array().unwrap().is_empty());
    assert_decimal(&result["total_deductions"], "0");
}

// =============================================================================
// SECTION 2: Scans
// =============================================================================

#[tokio::test]
async fn test_net_negative_is_critical() {
    let mut flagged = record("emp_c", "1000", "1000");
    flagged["deductions"] = json!("2000");

    let (status, result) = post(
        create_router_for_test(),
        "/scan",
        json!({ "cycle_id": "2026-09", "records": [flagged] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let anomalies = &result["records"][0]["anomalies"];
    assert_eq!(rule_ids(anomalies), vec!["NET_NEGATIVE"]);
    assert_eq!(anomalies[0]["severity"], "critical");
    assert_eq!(result["critical_records"], 1);
}

#[tokio::test]
async fn test_hra_excess_without_minimum_wage() {
    let mut hra_heavy = record("emp_d", "20000", "20000");
    hra_heavy["hra"] = json!("12000");

    let (status, result) = post(
        create_router_for_test(),
        "/scan",
        json!({ "cycle_id": "2026-09", "records": [hra_heavy] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let violations = &result["records"][0]["violations"];
    assert_eq!(rule_ids(violations), vec!["HRA_EXCESS"]);
    assert_eq!(violations[0]["severity"], "warning");
    assert_eq!(result["critical_records"], 0);
}

#[tokio::test]
async fn test_gross_spike_uses_prior_records() {
    let (status, result) = post(
        create_router_for_test(),
        "/scan",
        json!({
            "cycle_id": "2026-09",
            "records": [record("emp_001", "30000", "90000")],
            "prior_records": [record("emp_001", "30000", "40000")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        rule_ids(&result["records"][0]["anomalies"]),
        vec!["GROSS_SPIKE"]
    );
}

#[tokio::test]
async fn test_near_max_gross_is_flagged_not_fatal() {
    let body = json!({
        "cycle_id": "2026-09",
        "records": [
            record("emp_a", "10000", "15000"),
            record("emp_huge", "10000", "79228162514264337593543950334")
        ]
    });

    let (status, result) = post(create_router_for_test(), "/scan", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_decimal(&result["records"][0]["breakdown"]["total_deductions"], "1513");
    assert_eq!(
        rule_ids(&result["records"][1]["anomalies"]),
        vec!["AMOUNT_OUT_OF_RANGE"]
    );
    assert_eq!(result["records"][1]["anomalies"][0]["severity"], "critical");

    // only the critical-flags check fails: 5 of 6
    let (status, report) = post(create_router_for_test(), "/readiness", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["score"], 83);
}

#[tokio::test]
async fn test_scan_preserves_input_order() {
    let records: Vec<Value> = (0..50)
        .map(|i| record(&format!("emp_{:03}", i), "10000", "15000"))
        .collect();

    let (status, result) = post(
        create_router_for_test(),
        "/scan",
        json!({ "cycle_id": "2026-09", "records": records }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = result["records"].as_array().unwrap();
    assert_eq!(entries.len(), 50);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry["record_id"], format!("emp_{:03}", i));
    }
}

// =============================================================================
// SECTION 3: Readiness
// =============================================================================

#[tokio::test]
async fn test_readiness_four_passed_one_warning_one_failed() {
    let mut gappy = record("emp_e", "10000", "15000");
    gappy["attendance_gap_days"] = json!(2);
    gappy["tax_id"] = Value::Null;

    let (status, report) = post(
        create_router_for_test(),
        "/readiness",
        json!({ "cycle_id": "2026-09", "records": [gappy] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["checks"].as_array().unwrap().len(), 6);
    assert_eq!(report["passed"], 4);
    assert_eq!(report["warnings"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["score"], 67);
}

#[tokio::test]
async fn test_readiness_lists_affected_records() {
    let mut no_bank = record("emp_nb", "10000", "15000");
    no_bank["bank_account"] = json!("   ");

    let (status, report) = post(
        create_router_for_test(),
        "/readiness",
        json!({ "cycle_id": "2026-09", "records": [record("emp_ok", "10000", "15000"), no_bank] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let bank_check = report["checks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["affected_count"] == 1)
        .expect("one check should have an affected record");
    assert_eq!(bank_check["status"], "failed");
    assert_eq!(bank_check["affected_record_ids"], json!(["emp_nb"]));
}

// =============================================================================
// SECTION 4: Pay Runs
// =============================================================================

#[tokio::test]
async fn test_pay_run_totals_and_retrieval() {
    let state = create_test_state();

    let (status, created) = post(
        create_router(state.clone()),
        "/pay-runs",
        json!({
            "cycle_id": "2026-09",
            "records": [record("emp_a", "10000", "15000"), record("emp_b", "50000", "60000")]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_decimal(&created["total_gross"], "75000");
    assert_decimal(&created["total_deductions"], "5763");
    assert_decimal(&created["net_payable"], "69237");
    assert_eq!(created["record_count"], 2);
    assert_eq!(created["status"], "initiated");
    assert_eq!(created["readiness_score"], 100);
    assert!(created["batch_id"].is_string());
    assert!(created["created_at"].is_string());

    let (status, fetched) = get(create_router(state), "/pay-runs/2026-09").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_flagged_records_still_aggregate() {
    let mut flagged = record("emp_c", "1000", "1000");
    flagged["deductions"] = json!("2000");

    let (status, created) = post(
        create_router_for_test(),
        "/pay-runs",
        json!({ "cycle_id": "2026-09", "records": [flagged, record("emp_a", "10000", "15000")] }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["record_count"], 2);
    assert!(created["readiness_score"].as_u64().unwrap() < 100);
}

#[tokio::test]
async fn test_empty_pay_run_returns_422() {
    let (status, error) = post(
        create_router_for_test(),
        "/pay-runs",
        json!({ "cycle_id": "2026-09", "records": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "EMPTY_PAY_RUN");
}

#[tokio::test]
async fn test_duplicate_pay_run_returns_409() {
    let state = create_test_state();
    let body = json!({ "cycle_id": "2026-09", "records": [record("emp_a", "10000", "15000")] });

    let (status, first) = post(create_router(state.clone()), "/pay-runs", body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = post(
        create_router(state.clone()),
        "/pay-runs",
        json!({ "cycle_id": "2026-09", "records": [record("emp_b", "50000", "60000")] }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE_PAY_RUN");

    let (_, stored) = get(create_router(state), "/pay-runs/2026-09").await;
    assert_eq!(stored, first);
}

#[tokio::test]
async fn test_unknown_pay_run_returns_404() {
    let (status, error) = get(create_router_for_test(), "/pay-runs/1999-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "PAY_RUN_NOT_FOUND");
}

// =============================================================================
// SECTION 5: Error Cases
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let (status, error) = send(
        create_router_for_test(),
        Request::builder()
            .method("POST")
            .uri("/pay-runs")
            .header("Content-Type", "application/json")
            .body(Body::from("{\"cycle_id\": "))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_records() {
    let (status, error) = post(
        create_router_for_test(),
        "/scan",
        json!({ "cycle_id": "2026-09" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_error_non_numeric_amount() {
    let mut bad = record("emp_x", "10000", "15000");
    bad["gross"] = json!("fifteen thousand");

    let (status, error) = post(
        create_router_for_test(),
        "/deductions",
        json!({ "records": [bad] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_content_type() {
    let (status, error) = send(
        create_router_for_test(),
        Request::builder()
            .method("POST")
            .uri("/deductions")
            .body(Body::from(json!({ "records": [] }).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
}
