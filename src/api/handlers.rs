//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::batch::{BatchSink, InMemoryRecordSource, PayRunService};
use crate::calculation::{DeductionCalculator, sum_total_deductions};
use crate::error::EngineError;
use crate::models::DeductionCalculation;
use crate::pipeline::scan_cycle_with_history;
use crate::validation::CycleValidator;

use super::request::{CycleRequest, DeductionRequest};
use super::response::{ApiError, ApiErrorResponse, DeductionResponse, ScanEntry, ScanResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/deductions", post(deductions_handler))
        .route("/scan", post(scan_handler))
        .route("/readiness", post(readiness_handler))
        .route("/pay-runs", post(create_pay_run_handler))
        .route("/pay-runs/:cycle_id", get(get_pay_run_handler))
        .with_state(state)
}

/// Handler for POST /deductions.
///
/// Computes the deduction breakdown and audit trace for every record.
async fn deductions_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeductionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing deduction request");

    let request = match extract_body(payload, correlation_id) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let computed = run_blocking(correlation_id, move || {
        let calculator = DeductionCalculator::new(state.rules());
        let calculations: Vec<DeductionCalculation> = request
            .records
            .iter()
            .map(|record| calculator.compute_with_trace(record))
            .collect();
        let total_deductions = sum_total_deductions(calculations.iter().map(|c| &c.breakdown));
        (calculations, total_deductions)
    })
    .await;
    let (calculations, total_deductions) = match computed {
        Ok(computed) => computed,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        records = calculations.len(),
        total_deductions = %total_deductions,
        duration_us = start_time.elapsed().as_micros(),
        "Deductions computed"
    );

    json_response(
        StatusCode::OK,
        &DeductionResponse {
            calculations,
            total_deductions,
        },
    )
}

/// Handler for POST /scan.
///
/// Runs anomaly detection and compliance auditing over a cycle.
async fn scan_handler(
    State(state): State<AppState>,
    payload: Result<Json<CycleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing scan request");

    let request = match extract_cycle(payload, correlation_id) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let scanned = run_blocking(correlation_id, move || {
        let scans =
            scan_cycle_with_history(&request.records, &request.prior_records, state.rules());
        let critical_records = scans.iter().filter(|s| s.has_critical_flag()).count();
        ScanResponse {
            cycle_id: request.cycle_id,
            records: scans.into_iter().map(ScanEntry::from).collect(),
            critical_records,
        }
    })
    .await;
    let response = match scanned {
        Ok(response) => response,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        cycle_id = %response.cycle_id,
        records = response.records.len(),
        critical_records = response.critical_records,
        "Scan completed"
    );

    json_response(StatusCode::OK, &response)
}

/// Handler for POST /readiness.
///
/// Scores a cycle against the default check catalog without creating a batch.
async fn readiness_handler(
    State(state): State<AppState>,
    payload: Result<Json<CycleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing readiness request");

    let request = match extract_cycle(payload, correlation_id) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let scored = run_blocking(correlation_id, move || {
        CycleValidator::default().validate_records(
            &request.cycle_id,
            &request.records,
            state.rules(),
        )
    })
    .await;
    let report = match scored {
        Ok(report) => report,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        cycle_id = %report.cycle_id,
        score = report.score.value(),
        "Readiness scored"
    );

    json_response(StatusCode::OK, &report)
}

/// Handler for POST /pay-runs.
///
/// Creates and stores the immutable batch for a cycle.
async fn create_pay_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<CycleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing pay run request");

    let request = match extract_cycle(payload, correlation_id) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let created = run_blocking(correlation_id, move || {
        PayRunService::new(
            InMemoryRecordSource::single(request.cycle_id.clone(), request.records),
            state.batches(),
            state.rules().clone(),
        )
        .with_policy(state.policy())
        .run(&request.cycle_id)
    })
    .await;
    let result = match created {
        Ok(result) => result,
        Err(response) => return response,
    };

    match result {
        Ok(batch) => {
            info!(
                correlation_id = %correlation_id,
                cycle_id = %batch.cycle_id(),
                batch_id = %batch.batch_id(),
                net_payable = %batch.net_payable(),
                "Pay run created"
            );
            json_response(StatusCode::CREATED, &batch)
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for GET /pay-runs/:cycle_id.
async fn get_pay_run_handler(
    State(state): State<AppState>,
    Path(cycle_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.batches().get(&cycle_id) {
        Ok(Some(batch)) => json_response(StatusCode::OK, &batch),
        Ok(None) => {
            info!(correlation_id = %correlation_id, cycle_id = %cycle_id, "Pay run not found");
            json_response(StatusCode::NOT_FOUND, &ApiError::pay_run_not_found(&cycle_id))
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Runs CPU-bound engine work on tokio's blocking pool, off the async workers.
///
/// A task that panics or is cancelled becomes a 500 response.
async fn run_blocking<T, F>(correlation_id: Uuid, work: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Engine task did not complete"
        );
        json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ApiError::internal_error("Request processing did not complete"),
        )
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(err: EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

fn extract_cycle(
    payload: Result<Json<CycleRequest>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<CycleRequest, Response> {
    let request = extract_body(payload, correlation_id)?;
    if let Err(message) = request.validate() {
        warn!(correlation_id = %correlation_id, error = %message, "Invalid cycle request");
        return Err(json_response(
            StatusCode::BAD_REQUEST,
            &ApiError::validation_error(message),
        ));
    }
    Ok(request)
}

/// Unwraps a JSON body, mapping rejections to a 400 response.
fn extract_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(req)) => return Ok(req),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(json_response(StatusCode::BAD_REQUEST, &error))
}
