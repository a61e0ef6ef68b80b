use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;

use timecard::config::ScheduleConfig;
use timecard::workflows::attendance::AttendanceService;
use timecard::workflows::leave::LeaveService;
use timecard::workflows::memory::{
    InMemoryAdjustmentRepository, InMemoryApprovalLog, InMemoryAttendanceRepository,
    InMemoryEmployeeDirectory, InMemoryLeaveRepository, InMemoryPatternRepository,
};
use timecard::workflows::schedule::{ScheduleResolver, WorkPatternService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type MemoryAttendanceService = AttendanceService<
    InMemoryAttendanceRepository,
    InMemoryAdjustmentRepository,
    InMemoryPatternRepository,
    InMemoryEmployeeDirectory,
    InMemoryApprovalLog,
>;

pub(crate) type MemoryPatternService = WorkPatternService<
    InMemoryPatternRepository,
    InMemoryAttendanceRepository,
    InMemoryEmployeeDirectory,
    InMemoryApprovalLog,
>;

pub(crate) type MemoryLeaveService = LeaveService<
    InMemoryLeaveRepository,
    InMemoryAdjustmentRepository,
    InMemoryAttendanceRepository,
    InMemoryPatternRepository,
    InMemoryEmployeeDirectory,
    InMemoryApprovalLog,
>;

/// The wired engine over the in-memory stores: one of everything, shared.
pub(crate) struct Engine {
    pub(crate) attendance_service: Arc<MemoryAttendanceService>,
    pub(crate) pattern_service: Arc<MemoryPatternService>,
    pub(crate) leave_service: Arc<MemoryLeaveService>,
    pub(crate) directory: Arc<InMemoryEmployeeDirectory>,
    pub(crate) audit: Arc<InMemoryApprovalLog>,
}

pub(crate) fn engine(schedule: ScheduleConfig) -> Engine {
    let attendance = Arc::new(InMemoryAttendanceRepository::default());
    let adjustments = Arc::new(InMemoryAdjustmentRepository::default());
    let patterns = Arc::new(InMemoryPatternRepository::default());
    let leave = Arc::new(InMemoryLeaveRepository::default());
    let directory = Arc::new(InMemoryEmployeeDirectory::default());
    let audit = Arc::new(InMemoryApprovalLog::default());

    let resolver = ScheduleResolver::new(Arc::clone(&patterns), Arc::clone(&attendance), schedule);

    let attendance_service = Arc::new(AttendanceService::new(
        Arc::clone(&attendance),
        Arc::clone(&adjustments),
        resolver.clone(),
        Arc::clone(&directory),
        Arc::clone(&audit),
    ));
    let pattern_service = Arc::new(WorkPatternService::new(
        Arc::clone(&patterns),
        Arc::clone(&attendance),
        Arc::clone(&directory),
        Arc::clone(&audit),
    ));
    let leave_service = Arc::new(LeaveService::new(
        Arc::clone(&leave),
        Arc::clone(&adjustments),
        Arc::clone(&attendance),
        resolver,
        Arc::clone(&directory),
        Arc::clone(&audit),
    ));

    Engine {
        attendance_service,
        pattern_service,
        leave_service,
        directory,
        audit,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
