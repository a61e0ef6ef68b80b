//! Shared fault-to-HTTP mapping for the workflow routers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::fault::{Fault, FaultKind};

pub(crate) fn fault_response<E>(error: &E) -> Response
where
    E: Fault + std::fmt::Display,
{
    let status = match error.kind() {
        FaultKind::NotFound => StatusCode::NOT_FOUND,
        FaultKind::InvalidState => StatusCode::CONFLICT,
        FaultKind::InvalidInput | FaultKind::RuleViolation => StatusCode::UNPROCESSABLE_ENTITY,
        FaultKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = Json(json!({
        "code": error.code(),
        "kind": error.kind().label(),
        "error": error.to_string(),
    }));
    (status, body).into_response()
}
