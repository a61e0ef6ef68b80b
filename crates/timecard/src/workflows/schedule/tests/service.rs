use super::common::*;
use crate::workflows::attendance::domain::{AttendanceRecord, AttendanceStatus};
use crate::workflows::attendance::repository::AttendanceRepository;
use crate::workflows::audit::ApprovalTarget;
use crate::workflows::schedule::domain::WeekdaySet;
use crate::workflows::schedule::service::PatternError;
use crate::workflows::status::{Decision, RequestStatus};

#[test]
fn submission_validates_date_and_time_ordering() {
    let harness = harness();

    let mut backwards = short_week_submission();
    backwards.end_date = date(2026, 5, 1);
    assert!(matches!(
        harness.service.submit(backwards),
        Err(PatternError::DateOrder { .. })
    ));

    let mut inverted = short_week_submission();
    inverted.start_time = time(15, 0);
    inverted.end_time = time(10, 0);
    assert!(matches!(
        harness.service.submit(inverted),
        Err(PatternError::TimeOrder { .. })
    ));
}

#[test]
fn submission_requires_an_applicable_day() {
    let harness = harness();
    let mut empty = short_week_submission();
    empty.weekdays = WeekdaySet::none();
    empty.applies_on_holiday = false;
    assert!(matches!(
        harness.service.submit(empty),
        Err(PatternError::NoApplicableDay)
    ));
}

#[test]
fn submission_enforces_the_minimum_break() {
    let harness = harness();
    let mut long_day = short_week_submission();
    long_day.start_time = time(9, 0);
    long_day.end_time = time(19, 0);
    long_day.break_minutes = 30;
    assert!(matches!(
        harness.service.submit(long_day),
        Err(PatternError::InsufficientBreak { required: 60, .. })
    ));
}

#[test]
fn overlapping_active_requests_are_rejected() {
    let harness = harness();
    harness
        .service
        .submit(short_week_submission())
        .expect("first submission accepted");

    let mut second = short_week_submission();
    second.start_date = date(2026, 6, 5);
    second.end_date = date(2026, 6, 12);
    assert!(matches!(
        harness.service.submit(second),
        Err(PatternError::Overlap { .. })
    ));

    let mut disjoint = short_week_submission();
    disjoint.start_date = date(2026, 6, 8);
    disjoint.end_date = date(2026, 6, 12);
    harness
        .service
        .submit(disjoint)
        .expect("disjoint range accepted");
}

#[test]
fn rejection_demands_a_comment_and_leaves_no_trace_on_the_ledger() {
    let harness = harness();
    let request = harness
        .service
        .submit(short_week_submission())
        .expect("submission accepted");

    let err = harness
        .service
        .decide(
            &request.id,
            &manager(),
            Decision::Reject,
            Some("   ".to_string()),
            at(date(2026, 5, 30), 9, 0),
        )
        .expect_err("blank comment refused");
    assert!(matches!(err, PatternError::MissingComment));

    let rejected = harness
        .service
        .decide(
            &request.id,
            &manager(),
            Decision::Reject,
            Some("staffing does not allow it".to_string()),
            at(date(2026, 5, 30), 9, 0),
        )
        .expect("rejection succeeds");
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert!(harness
        .attendance
        .fetch(&employee(), date(2026, 6, 1))
        .expect("fetch succeeds")
        .is_none());
}

#[test]
fn approval_recomputes_covered_records_against_the_new_baseline() {
    let harness = harness();
    let monday = date(2026, 6, 1);

    // Worked 10:00-16:00 under the standard schedule before the change.
    let mut record = AttendanceRecord::empty(employee(), monday);
    record.clock_in = Some(at(monday, 10, 0));
    record.clock_out = Some(at(monday, 16, 0));
    record.break_minutes = 0;
    harness.attendance.upsert(record).expect("upsert succeeds");

    let request = harness
        .service
        .submit(short_week_submission())
        .expect("submission accepted");
    harness
        .service
        .decide(
            &request.id,
            &manager(),
            Decision::Approve,
            None,
            at(date(2026, 5, 30), 9, 0),
        )
        .expect("approval succeeds");

    let recomputed = harness
        .attendance
        .fetch(&employee(), monday)
        .expect("fetch succeeds")
        .expect("record present");
    // New baseline is 300 working minutes (10:00-15:00, no break).
    assert_eq!(recomputed.late_minutes, 0);
    assert_eq!(recomputed.overtime_minutes, 60);
    assert_eq!(recomputed.status, AttendanceStatus::Overtime);

    let entries = harness.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].target, ApprovalTarget::WorkPattern);
}

#[test]
fn approval_forces_non_working_dates_into_holiday() {
    let harness = harness();
    let request = harness
        .service
        .submit(short_week_submission())
        .expect("submission accepted");
    harness
        .service
        .decide(
            &request.id,
            &manager(),
            Decision::Approve,
            None,
            at(date(2026, 5, 30), 9, 0),
        )
        .expect("approval succeeds");

    // The pattern's weekday set excludes Saturday and Sunday.
    let saturday = harness
        .attendance
        .fetch(&employee(), date(2026, 6, 6))
        .expect("fetch succeeds")
        .expect("record created by the recompute pass");
    assert_eq!(saturday.status, AttendanceStatus::Holiday);
    assert_eq!(saturday.break_minutes, 0);
    assert_eq!(saturday.late_minutes, 0);

    let err = harness
        .service
        .decide(
            &request.id,
            &manager(),
            Decision::Approve,
            None,
            at(date(2026, 5, 30), 10, 0),
        )
        .expect_err("second decision refused");
    assert!(matches!(err, PatternError::NotPending(_)));
}
