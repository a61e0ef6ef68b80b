use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::config::ScheduleConfig;
use crate::workflows::attendance::service::AttendanceService;
use crate::workflows::employee::{EmployeeId, EmployeeProfile};
use crate::workflows::leave::domain::{GrantSubmission, LeaveSubmission, LeaveTimeUnit, LeaveType};
use crate::workflows::leave::service::LeaveService;
use crate::workflows::memory::{
    InMemoryAdjustmentRepository, InMemoryApprovalLog, InMemoryAttendanceRepository,
    InMemoryEmployeeDirectory, InMemoryLeaveRepository, InMemoryPatternRepository,
};
use crate::workflows::schedule::resolver::ScheduleResolver;

pub(super) type MemoryLeaveService = LeaveService<
    InMemoryLeaveRepository,
    InMemoryAdjustmentRepository,
    InMemoryAttendanceRepository,
    InMemoryPatternRepository,
    InMemoryEmployeeDirectory,
    InMemoryApprovalLog,
>;

pub(super) type MemoryAttendanceService = AttendanceService<
    InMemoryAttendanceRepository,
    InMemoryAdjustmentRepository,
    InMemoryPatternRepository,
    InMemoryEmployeeDirectory,
    InMemoryApprovalLog,
>;

pub(super) struct Harness {
    pub(super) service: MemoryLeaveService,
    pub(super) attendance_service: MemoryAttendanceService,
    pub(super) adjustments: Arc<InMemoryAdjustmentRepository>,
    pub(super) directory: Arc<InMemoryEmployeeDirectory>,
}

pub(super) fn harness() -> Harness {
    let leave = Arc::new(InMemoryLeaveRepository::default());
    let adjustments = Arc::new(InMemoryAdjustmentRepository::default());
    let attendance = Arc::new(InMemoryAttendanceRepository::default());
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

    let resolver = ScheduleResolver::new(
        Arc::clone(&patterns),
        Arc::clone(&attendance),
        ScheduleConfig::default(),
    );
    let service = LeaveService::new(
        Arc::clone(&leave),
        Arc::clone(&adjustments),
        Arc::clone(&attendance),
        resolver.clone(),
        Arc::clone(&directory),
        Arc::clone(&audit),
    );
    let attendance_service = AttendanceService::new(
        Arc::clone(&attendance),
        Arc::clone(&adjustments),
        resolver,
        Arc::clone(&directory),
        Arc::clone(&audit),
    );

    Harness {
        service,
        attendance_service,
        adjustments,
        directory,
    }
}

pub(super) fn employee() -> EmployeeId {
    EmployeeId("emp-001".to_string())
}

pub(super) fn manager() -> EmployeeId {
    EmployeeId("mgr-001".to_string())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time"))
}

/// Submission time used throughout: the Friday before the leave week.
pub(super) fn now() -> NaiveDateTime {
    at(date(2026, 5, 29), 9, 0)
}

pub(super) fn paid_grant(days: Decimal) -> GrantSubmission {
    GrantSubmission {
        employee_id: employee(),
        leave_type: LeaveType::Paid,
        days,
        granted_on: date(2026, 4, 1),
        expires_at: None,
        granted_by: manager(),
    }
}

/// Full business week, 2026-06-01 (Mon) through 06-05 (Fri).
pub(super) fn week_submission(leave_type: LeaveType) -> LeaveSubmission {
    LeaveSubmission {
        employee_id: employee(),
        leave_type,
        time_unit: LeaveTimeUnit::FullDay,
        start_date: date(2026, 6, 1),
        end_date: date(2026, 6, 5),
        reason: Some("family trip".to_string()),
    }
}

pub(super) fn half_day_submission(day: NaiveDate) -> LeaveSubmission {
    LeaveSubmission {
        employee_id: employee(),
        leave_type: LeaveType::Paid,
        time_unit: LeaveTimeUnit::HalfAm,
        start_date: day,
        end_date: day,
        reason: Some("clinic appointment".to_string()),
    }
}
