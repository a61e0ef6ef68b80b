use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;

use timecard::workflows::attendance::attendance_router;
use timecard::workflows::employee::{EmployeeId, EmployeeProfile};
use timecard::workflows::leave::leave_router;
use timecard::workflows::memory::InMemoryEmployeeDirectory;
use timecard::workflows::schedule::schedule_router;

use crate::infra::{AppState, Engine};
use std::sync::Arc;

pub(crate) fn engine_router(engine: &Engine) -> Router {
    attendance_router(Arc::clone(&engine.attendance_service))
        .merge(schedule_router(Arc::clone(&engine.pattern_service)))
        .merge(leave_router(Arc::clone(&engine.leave_service)))
        .route(
            "/api/v1/employees",
            axum::routing::post(register_employee_endpoint),
        )
        .layer(Extension(Arc::clone(&engine.directory)))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterEmployeeRequest {
    pub(crate) employee_id: String,
    pub(crate) display_name: String,
    #[serde(default = "default_active")]
    pub(crate) active: bool,
}

fn default_active() -> bool {
    true
}

/// Employee rosters live outside the engine; this endpoint feeds the
/// in-memory directory stand-in so a deployment can be exercised end to end.
pub(crate) async fn register_employee_endpoint(
    Extension(directory): Extension<Arc<InMemoryEmployeeDirectory>>,
    Json(payload): Json<RegisterEmployeeRequest>,
) -> impl IntoResponse {
    let profile = EmployeeProfile {
        id: EmployeeId(payload.employee_id),
        display_name: payload.display_name,
        active: payload.active,
    };
    directory.register(profile.clone());
    (StatusCode::CREATED, Json(profile))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
