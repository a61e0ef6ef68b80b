use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::config::ScheduleConfig;
use crate::workflows::employee::{EmployeeId, EmployeeProfile};
use crate::workflows::memory::{
    InMemoryApprovalLog, InMemoryAttendanceRepository, InMemoryEmployeeDirectory,
    InMemoryPatternRepository,
};
use crate::workflows::schedule::domain::{WeekdaySet, WorkPatternSubmission};
use crate::workflows::schedule::resolver::ScheduleResolver;
use crate::workflows::schedule::service::WorkPatternService;

pub(super) type MemoryPatternService = WorkPatternService<
    InMemoryPatternRepository,
    InMemoryAttendanceRepository,
    InMemoryEmployeeDirectory,
    InMemoryApprovalLog,
>;

pub(super) struct Harness {
    pub(super) service: MemoryPatternService,
    pub(super) resolver: ScheduleResolver<InMemoryPatternRepository, InMemoryAttendanceRepository>,
    pub(super) attendance: Arc<InMemoryAttendanceRepository>,
    pub(super) audit: Arc<InMemoryApprovalLog>,
}

pub(super) fn harness() -> Harness {
    let patterns = Arc::new(InMemoryPatternRepository::default());
    let attendance = Arc::new(InMemoryAttendanceRepository::default());
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
    let service = WorkPatternService::new(
        Arc::clone(&patterns),
        Arc::clone(&attendance),
        Arc::clone(&directory),
        Arc::clone(&audit),
    );

    Harness {
        service,
        resolver,
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

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(time(hour, minute))
}

/// A short-hours pattern for the first week of June 2026, weekdays only.
pub(super) fn short_week_submission() -> WorkPatternSubmission {
    WorkPatternSubmission {
        employee_id: employee(),
        start_date: date(2026, 6, 1),
        end_date: date(2026, 6, 7),
        start_time: time(10, 0),
        end_time: time(15, 0),
        break_minutes: 0,
        weekdays: WeekdaySet::from_days(&[
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]),
        applies_on_holiday: false,
        reason: "childcare hours".to_string(),
    }
}
