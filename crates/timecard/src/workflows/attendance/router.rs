use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

use super::domain::AdjustmentSubmission;
use super::repository::{AdjustmentRepository, AttendanceRepository};
use super::service::AttendanceService;
use crate::workflows::audit::ApprovalLog;
use crate::workflows::employee::{EmployeeDirectory, EmployeeId};
use crate::workflows::http::fault_response;
use crate::workflows::schedule::repository::PatternRepository;
use crate::workflows::status::Decision;
use crate::workflows::RequestId;

/// Router exposing clock events and the adjustment workflow.
pub fn attendance_router<A, J, P, D, G>(
    service: Arc<AttendanceService<A, J, P, D, G>>,
) -> Router
where
    A: AttendanceRepository + 'static,
    J: AdjustmentRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    Router::new()
        .route(
            "/api/v1/attendance/clock-in",
            post(clock_in_handler::<A, J, P, D, G>),
        )
        .route(
            "/api/v1/attendance/clock-out",
            post(clock_out_handler::<A, J, P, D, G>),
        )
        .route(
            "/api/v1/attendance/finalize",
            post(finalize_handler::<A, J, P, D, G>),
        )
        .route(
            "/api/v1/attendance/adjustments",
            post(submit_adjustment_handler::<A, J, P, D, G>),
        )
        .route(
            "/api/v1/attendance/adjustments/:request_id/decision",
            post(decide_adjustment_handler::<A, J, P, D, G>),
        )
        .route(
            "/api/v1/attendance/adjustments/:request_id/cancel",
            post(cancel_adjustment_handler::<A, J, P, D, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClockRequest {
    pub(crate) employee_id: String,
    /// Override for the event timestamp; defaults to the server clock.
    #[serde(default)]
    pub(crate) at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FinalizeRequest {
    pub(crate) employee_id: String,
    pub(crate) date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) approver_id: String,
    pub(crate) decision: String,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CancelRequest {
    pub(crate) employee_id: String,
}

fn event_time(at: Option<NaiveDateTime>) -> NaiveDateTime {
    at.unwrap_or_else(|| Local::now().naive_local())
}

pub(crate) fn parse_decision(raw: &str) -> Result<Decision, Response> {
    raw.parse::<Decision>().map_err(|message| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": "invalid_decision", "error": message })),
        )
            .into_response()
    })
}

async fn clock_in_handler<A, J, P, D, G>(
    State(service): State<Arc<AttendanceService<A, J, P, D, G>>>,
    Json(payload): Json<ClockRequest>,
) -> Response
where
    A: AttendanceRepository + 'static,
    J: AdjustmentRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    let employee_id = EmployeeId(payload.employee_id);
    match service.record_clock_in(&employee_id, event_time(payload.at)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn clock_out_handler<A, J, P, D, G>(
    State(service): State<Arc<AttendanceService<A, J, P, D, G>>>,
    Json(payload): Json<ClockRequest>,
) -> Response
where
    A: AttendanceRepository + 'static,
    J: AdjustmentRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    let employee_id = EmployeeId(payload.employee_id);
    match service.record_clock_out(&employee_id, event_time(payload.at)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn finalize_handler<A, J, P, D, G>(
    State(service): State<Arc<AttendanceService<A, J, P, D, G>>>,
    Json(payload): Json<FinalizeRequest>,
) -> Response
where
    A: AttendanceRepository + 'static,
    J: AdjustmentRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    let employee_id = EmployeeId(payload.employee_id);
    match service.finalize(&employee_id, payload.date) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn submit_adjustment_handler<A, J, P, D, G>(
    State(service): State<Arc<AttendanceService<A, J, P, D, G>>>,
    Json(submission): Json<AdjustmentSubmission>,
) -> Response
where
    A: AttendanceRepository + 'static,
    J: AdjustmentRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    match service.submit_adjustment(submission) {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn decide_adjustment_handler<A, J, P, D, G>(
    State(service): State<Arc<AttendanceService<A, J, P, D, G>>>,
    Path(request_id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> Response
where
    A: AttendanceRepository + 'static,
    J: AdjustmentRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    let decision = match parse_decision(&payload.decision) {
        Ok(decision) => decision,
        Err(response) => return response,
    };

    match service.decide_adjustment(
        &RequestId(request_id),
        &EmployeeId(payload.approver_id),
        decision,
        payload.comment,
        Local::now().naive_local(),
    ) {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn cancel_adjustment_handler<A, J, P, D, G>(
    State(service): State<Arc<AttendanceService<A, J, P, D, G>>>,
    Path(request_id): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> Response
where
    A: AttendanceRepository + 'static,
    J: AdjustmentRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    match service.cancel_adjustment(
        &RequestId(request_id),
        &EmployeeId(payload.employee_id),
        Local::now().naive_local(),
    ) {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(err) => fault_response(&err),
    }
}
