use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::ScheduleConfig;
use crate::workflows::attendance::service::AttendanceService;
use crate::workflows::employee::{EmployeeId, EmployeeProfile};
use crate::workflows::memory::{
    InMemoryAdjustmentRepository, InMemoryApprovalLog, InMemoryAttendanceRepository,
    InMemoryEmployeeDirectory, InMemoryPatternRepository,
};
use crate::workflows::schedule::resolver::ScheduleResolver;

pub(super) type MemoryAttendanceService = AttendanceService<
    InMemoryAttendanceRepository,
    InMemoryAdjustmentRepository,
    InMemoryPatternRepository,
    InMemoryEmployeeDirectory,
    InMemoryApprovalLog,
>;

pub(super) struct Harness {
    pub(super) service: MemoryAttendanceService,
    pub(super) attendance: Arc<InMemoryAttendanceRepository>,
    pub(super) audit: Arc<InMemoryApprovalLog>,
}

pub(super) fn harness() -> Harness {
    let attendance = Arc::new(InMemoryAttendanceRepository::default());
    let adjustments = Arc::new(InMemoryAdjustmentRepository::default());
    let patterns = Arc::new(InMemoryPatternRepository::default());
    let directory = Arc::new(InMemoryEmployeeDirectory::default());
    let audit = Arc::new(InMemoryApprovalLog::default());

    directory.register(EmployeeProfile {
        id: employee(),
        display_name: "Asada Rin".to_string(),
        active: true,
    });
    directory.register(EmployeeProfile {
        id: manager(),
        display_name: "Mori Kenji".to_string(),
        active: true,
    });
    directory.register(EmployeeProfile {
        id: retired(),
        display_name: "Ohno Yuki".to_string(),
        active: false,
    });

    let resolver = ScheduleResolver::new(
        Arc::clone(&patterns),
        Arc::clone(&attendance),
        ScheduleConfig::default(),
    );
    let service = AttendanceService::new(
        Arc::clone(&attendance),
        Arc::clone(&adjustments),
        resolver,
        Arc::clone(&directory),
        Arc::clone(&audit),
    );

    Harness {
        service,
        attendance,
        audit,
    }
}

pub(super) fn employee() -> EmployeeId {
    EmployeeId("emp-001".to_string())
}

pub(super) fn manager() -> EmployeeId {
    EmployeeId("mgr-001".to_string())
}

pub(super) fn retired() -> EmployeeId {
    EmployeeId("emp-retired".to_string())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// A plain business Monday with no holidays nearby.
pub(super) fn workday() -> NaiveDate {
    date(2026, 6, 1)
}

pub(super) fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time"))
}

pub(super) fn at_sec(day: NaiveDate, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, second).expect("valid time"))
}

pub(super) fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}
