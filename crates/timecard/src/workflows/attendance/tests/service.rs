use super::common::*;
use crate::workflows::attendance::domain::{AdjustmentSubmission, AttendanceStatus};
use crate::workflows::attendance::repository::AttendanceRepository;
use crate::workflows::attendance::service::AttendanceError;
use crate::workflows::audit::ApprovalTarget;
use crate::workflows::employee::EmployeeGateError;
use crate::workflows::status::{Decision, RequestStatus};

fn submission(break_minutes: Option<i64>) -> AdjustmentSubmission {
    let day = workday();
    AdjustmentSubmission {
        employee_id: employee(),
        date: day,
        clock_in: at(day, 9, 0),
        clock_out: at(day, 18, 0),
        break_minutes,
        reason: "forgot to clock in".to_string(),
    }
}

#[test]
fn clock_in_records_lateness() {
    let harness = harness();
    let day = workday();

    let record = harness
        .service
        .record_clock_in(&employee(), at(day, 9, 20))
        .expect("clock-in succeeds");
    assert_eq!(record.late_minutes, 20);
    assert_eq!(record.status, AttendanceStatus::Late);

    let err = harness
        .service
        .record_clock_in(&employee(), at(day, 9, 30))
        .expect_err("second clock-in refused");
    assert!(matches!(err, AttendanceError::AlreadyClockedIn { .. }));
}

#[test]
fn retired_employees_cannot_clock() {
    let harness = harness();
    let err = harness
        .service
        .record_clock_in(&retired(), at(workday(), 9, 0))
        .expect_err("retired employee refused");
    assert!(matches!(
        err,
        AttendanceError::Employee(EmployeeGateError::Inactive(_))
    ));
}

#[test]
fn clock_out_derives_the_full_metric_set() {
    let harness = harness();
    let day = workday();

    harness
        .service
        .record_clock_in(&employee(), at(day, 9, 0))
        .expect("clock-in succeeds");
    let record = harness
        .service
        .record_clock_out(&employee(), at(day, 19, 0))
        .expect("clock-out succeeds");

    assert_eq!(record.break_minutes, 60);
    assert_eq!(record.overtime_minutes, 60);
    assert_eq!(record.status, AttendanceStatus::Overtime);
}

#[test]
fn overnight_clock_out_closes_the_previous_day() {
    let harness = harness();
    let day = workday();
    let next = date(2026, 6, 2);

    harness
        .service
        .record_clock_in(&employee(), at(day, 22, 0))
        .expect("clock-in succeeds");
    let record = harness
        .service
        .record_clock_out(&employee(), at(next, 6, 0))
        .expect("clock-out succeeds");

    assert_eq!(record.date, day);
    assert!(record.night_shift_minutes > 0);
}

#[test]
fn adjustment_requires_a_working_day() {
    let harness = harness();
    let sunday = date(2026, 6, 7);

    let submission = AdjustmentSubmission {
        employee_id: employee(),
        date: sunday,
        clock_in: at(sunday, 9, 0),
        clock_out: at(sunday, 18, 0),
        break_minutes: Some(60),
        reason: "weekend work".to_string(),
    };
    let err = harness
        .service
        .submit_adjustment(submission)
        .expect_err("holiday date refused");
    assert!(matches!(err, AttendanceError::NonWorkingDay { .. }));
}

#[test]
fn adjustment_rejects_insufficient_break() {
    let harness = harness();
    let err = harness
        .service
        .submit_adjustment(submission(Some(30)))
        .expect_err("thin break refused");
    assert!(matches!(
        err,
        AttendanceError::InsufficientBreak { required: 60, .. }
    ));
}

#[test]
fn one_active_adjustment_per_slot() {
    let harness = harness();
    harness
        .service
        .submit_adjustment(submission(Some(60)))
        .expect("first submission accepted");
    let err = harness
        .service
        .submit_adjustment(submission(Some(60)))
        .expect_err("duplicate refused");
    assert!(matches!(err, AttendanceError::DuplicateRequest { .. }));
}

#[test]
fn approval_overwrites_the_ledger_and_audits() {
    let harness = harness();
    let day = workday();

    let request = harness
        .service
        .submit_adjustment(submission(Some(60)))
        .expect("submission accepted");
    let decided = harness
        .service
        .decide_adjustment(
            &request.id,
            &manager(),
            Decision::Approve,
            None,
            at(day, 20, 0),
        )
        .expect("approval succeeds");
    assert_eq!(decided.status, RequestStatus::Approved);

    let record = harness
        .attendance
        .fetch(&employee(), day)
        .expect("fetch succeeds")
        .expect("record created");
    assert_eq!(record.clock_in, Some(at(day, 9, 0)));
    assert_eq!(record.clock_out, Some(at(day, 18, 0)));
    assert_eq!(record.status, AttendanceStatus::Normal);

    let entries = harness.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].target, ApprovalTarget::Adjustment);
    assert_eq!(entries[0].resulting_status, RequestStatus::Approved);
}

#[test]
fn rejection_demands_a_comment() {
    let harness = harness();
    let day = workday();

    let request = harness
        .service
        .submit_adjustment(submission(Some(60)))
        .expect("submission accepted");
    let err = harness
        .service
        .decide_adjustment(&request.id, &manager(), Decision::Reject, None, at(day, 20, 0))
        .expect_err("blank comment refused");
    assert!(matches!(err, AttendanceError::MissingComment));

    let rejected = harness
        .service
        .decide_adjustment(
            &request.id,
            &manager(),
            Decision::Reject,
            Some("no evidence of presence".to_string()),
            at(day, 20, 0),
        )
        .expect("rejection succeeds");
    assert_eq!(rejected.status, RequestStatus::Rejected);

    let err = harness
        .service
        .cancel_adjustment(&request.id, &employee(), at(day, 21, 0))
        .expect_err("rejected request is terminal");
    assert!(matches!(err, AttendanceError::NotCancellable(_)));
}

#[test]
fn cancelling_an_approved_adjustment_restores_the_snapshot() {
    let harness = harness();
    let day = workday();

    // Prior state comes from real clock events.
    harness
        .service
        .record_clock_in(&employee(), at(day, 9, 30))
        .expect("clock-in succeeds");
    harness
        .service
        .record_clock_out(&employee(), at(day, 18, 0))
        .expect("clock-out succeeds");

    let request = harness
        .service
        .submit_adjustment(submission(Some(60)))
        .expect("submission accepted");
    harness
        .service
        .decide_adjustment(
            &request.id,
            &manager(),
            Decision::Approve,
            None,
            at(day, 20, 0),
        )
        .expect("approval succeeds");

    let cancelled = harness
        .service
        .cancel_adjustment(&request.id, &employee(), at(day, 21, 0))
        .expect("cancellation succeeds");
    assert_eq!(cancelled.status, RequestStatus::Cancelled);

    let record = harness
        .attendance
        .fetch(&employee(), day)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(record.clock_in, Some(at(day, 9, 30)));
    assert_eq!(record.clock_out, Some(at(day, 18, 0)));
    assert_eq!(record.late_minutes, 30);
    assert_eq!(record.status, AttendanceStatus::Late);
}

#[test]
fn cancelling_without_prior_record_clears_the_ledger() {
    let harness = harness();
    let day = workday();

    let request = harness
        .service
        .submit_adjustment(submission(Some(60)))
        .expect("submission accepted");
    harness
        .service
        .decide_adjustment(
            &request.id,
            &manager(),
            Decision::Approve,
            None,
            at(day, 20, 0),
        )
        .expect("approval succeeds");
    harness
        .service
        .cancel_adjustment(&request.id, &employee(), at(day, 21, 0))
        .expect("cancellation succeeds");

    let record = harness
        .attendance
        .fetch(&employee(), day)
        .expect("fetch succeeds")
        .expect("record persists");
    assert_eq!(record.clock_in, None);
    assert_eq!(record.clock_out, None);
    assert_eq!(record.break_minutes, 0);
    assert_eq!(record.status, AttendanceStatus::Absent);
}

#[test]
fn only_the_owner_may_cancel() {
    let harness = harness();
    let day = workday();

    let request = harness
        .service
        .submit_adjustment(submission(Some(60)))
        .expect("submission accepted");
    let err = harness
        .service
        .cancel_adjustment(&request.id, &manager(), at(day, 20, 0))
        .expect_err("other employees cannot cancel");
    assert!(matches!(err, AttendanceError::NotRequestOwner { .. }));
}

#[test]
fn finalized_records_refuse_further_edits() {
    let harness = harness();
    let day = workday();

    harness
        .service
        .record_clock_in(&employee(), at(day, 9, 0))
        .expect("clock-in succeeds");
    harness
        .service
        .record_clock_out(&employee(), at(day, 18, 0))
        .expect("clock-out succeeds");
    harness
        .service
        .finalize(&employee(), day)
        .expect("finalize succeeds");

    let err = harness
        .service
        .submit_adjustment(submission(Some(60)))
        .expect_err("finalized day refused");
    assert!(matches!(err, AttendanceError::Finalized { .. }));
}
