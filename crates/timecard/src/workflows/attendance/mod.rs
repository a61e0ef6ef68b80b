//! The attendance ledger: clock events, derived metrics, and the
//! adjustment-request workflow.

pub mod domain;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdjustmentRequest, AdjustmentSubmission, AttendanceRecord, AttendanceStatus, LedgerSnapshot,
};
pub use metrics::{ComputedMetrics, MetricsError};
pub use repository::{AdjustmentRepository, AttendanceRepository};
pub use router::attendance_router;
pub use service::{AttendanceError, AttendanceService};
