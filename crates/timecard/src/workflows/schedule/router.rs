use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;

use super::domain::WorkPatternSubmission;
use super::repository::PatternRepository;
use super::service::WorkPatternService;
use crate::workflows::attendance::repository::AttendanceRepository;
use crate::workflows::attendance::router::parse_decision;
use crate::workflows::audit::ApprovalLog;
use crate::workflows::employee::{EmployeeDirectory, EmployeeId};
use crate::workflows::http::fault_response;
use crate::workflows::RequestId;

/// Router exposing the schedule-override workflow.
pub fn schedule_router<P, A, D, G>(service: Arc<WorkPatternService<P, A, D, G>>) -> Router
where
    P: PatternRepository + 'static,
    A: AttendanceRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    Router::new()
        .route(
            "/api/v1/schedule/patterns",
            post(submit_pattern_handler::<P, A, D, G>),
        )
        .route(
            "/api/v1/schedule/patterns/:request_id/decision",
            post(decide_pattern_handler::<P, A, D, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PatternDecisionRequest {
    pub(crate) approver_id: String,
    pub(crate) decision: String,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

async fn submit_pattern_handler<P, A, D, G>(
    State(service): State<Arc<WorkPatternService<P, A, D, G>>>,
    Json(submission): Json<WorkPatternSubmission>,
) -> Response
where
    P: PatternRepository + 'static,
    A: AttendanceRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    match service.submit(submission) {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn decide_pattern_handler<P, A, D, G>(
    State(service): State<Arc<WorkPatternService<P, A, D, G>>>,
    Path(request_id): Path<String>,
    Json(payload): Json<PatternDecisionRequest>,
) -> Response
where
    P: PatternRepository + 'static,
    A: AttendanceRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    let decision = match parse_decision(&payload.decision) {
        Ok(decision) => decision,
        Err(response) => return response,
    };

    match service.decide(
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
