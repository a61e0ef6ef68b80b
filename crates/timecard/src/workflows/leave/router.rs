use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::{GrantSubmission, LeaveSubmission, LeaveType};
use super::repository::LeaveRepository;
use super::service::LeaveService;
use crate::workflows::attendance::repository::{AdjustmentRepository, AttendanceRepository};
use crate::workflows::attendance::router::parse_decision;
use crate::workflows::audit::ApprovalLog;
use crate::workflows::employee::{EmployeeDirectory, EmployeeId};
use crate::workflows::http::fault_response;
use crate::workflows::schedule::repository::PatternRepository;
use crate::workflows::RequestId;

/// Router exposing grants, balances, and the leave request workflow.
pub fn leave_router<L, J, A, P, D, G>(service: Arc<LeaveService<L, J, A, P, D, G>>) -> Router
where
    L: LeaveRepository + 'static,
    J: AdjustmentRepository + 'static,
    A: AttendanceRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    Router::new()
        .route(
            "/api/v1/leave/requests",
            post(submit_leave_handler::<L, J, A, P, D, G>),
        )
        .route(
            "/api/v1/leave/requests/:request_id/decision",
            post(decide_leave_handler::<L, J, A, P, D, G>),
        )
        .route(
            "/api/v1/leave/requests/:request_id/cancel",
            post(cancel_leave_handler::<L, J, A, P, D, G>),
        )
        .route(
            "/api/v1/leave/grants",
            post(grant_leave_handler::<L, J, A, P, D, G>),
        )
        .route(
            "/api/v1/leave/balances/:employee_id/:leave_type",
            get(balance_handler::<L, J, A, P, D, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaveDecisionRequest {
    pub(crate) approver_id: String,
    pub(crate) decision: String,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaveCancelRequest {
    pub(crate) employee_id: String,
}

async fn submit_leave_handler<L, J, A, P, D, G>(
    State(service): State<Arc<LeaveService<L, J, A, P, D, G>>>,
    Json(submission): Json<LeaveSubmission>,
) -> Response
where
    L: LeaveRepository + 'static,
    J: AdjustmentRepository + 'static,
    A: AttendanceRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    match service.submit_leave(submission, Local::now().naive_local()) {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn decide_leave_handler<L, J, A, P, D, G>(
    State(service): State<Arc<LeaveService<L, J, A, P, D, G>>>,
    Path(request_id): Path<String>,
    Json(payload): Json<LeaveDecisionRequest>,
) -> Response
where
    L: LeaveRepository + 'static,
    J: AdjustmentRepository + 'static,
    A: AttendanceRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    let decision = match parse_decision(&payload.decision) {
        Ok(decision) => decision,
        Err(response) => return response,
    };

    match service.decide_leave(
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

async fn cancel_leave_handler<L, J, A, P, D, G>(
    State(service): State<Arc<LeaveService<L, J, A, P, D, G>>>,
    Path(request_id): Path<String>,
    Json(payload): Json<LeaveCancelRequest>,
) -> Response
where
    L: LeaveRepository + 'static,
    J: AdjustmentRepository + 'static,
    A: AttendanceRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    match service.cancel_leave(
        &RequestId(request_id),
        &EmployeeId(payload.employee_id),
        Local::now().naive_local(),
    ) {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn grant_leave_handler<L, J, A, P, D, G>(
    State(service): State<Arc<LeaveService<L, J, A, P, D, G>>>,
    Json(submission): Json<GrantSubmission>,
) -> Response
where
    L: LeaveRepository + 'static,
    J: AdjustmentRepository + 'static,
    A: AttendanceRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    match service.grant_leave(submission) {
        Ok(grant) => (StatusCode::CREATED, Json(grant)).into_response(),
        Err(err) => fault_response(&err),
    }
}

async fn balance_handler<L, J, A, P, D, G>(
    State(service): State<Arc<LeaveService<L, J, A, P, D, G>>>,
    Path((employee_id, leave_type)): Path<(String, String)>,
) -> Response
where
    L: LeaveRepository + 'static,
    J: AdjustmentRepository + 'static,
    A: AttendanceRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    let leave_type = match leave_type.parse::<LeaveType>() {
        Ok(leave_type) => leave_type,
        Err(message) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "code": "invalid_leave_type", "error": message })),
            )
                .into_response();
        }
    };

    match service.balance_summary(
        &EmployeeId(employee_id),
        leave_type,
        Local::now().date_naive(),
    ) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => fault_response(&err),
    }
}
