use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::*;
use crate::workflows::attendance::domain::AdjustmentSubmission;
use crate::workflows::attendance::repository::AdjustmentRepository;
use crate::workflows::leave::domain::{GrantSubmission, LeaveType};
use crate::workflows::leave::service::LeaveError;
use crate::workflows::status::{Decision, RequestStatus};

#[test]
fn a_full_week_costs_five_working_days() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(10)))
        .expect("grant succeeds");

    let request = harness
        .service
        .submit_leave(week_submission(LeaveType::Paid), now())
        .expect("submission accepted");
    assert_eq!(request.requested_days, dec!(5));

    let summary = harness
        .service
        .balance_summary(&employee(), LeaveType::Paid, now().date())
        .expect("summary succeeds");
    assert_eq!(summary.remaining, dec!(10));
    assert_eq!(summary.pending, dec!(5));
    assert_eq!(summary.available, dec!(5));
}

#[test]
fn half_days_cost_exactly_half() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(3)))
        .expect("grant succeeds");

    let request = harness
        .service
        .submit_leave(half_day_submission(date(2026, 6, 1)), now())
        .expect("submission accepted");
    assert_eq!(request.requested_days, dec!(0.5));

    harness
        .service
        .decide_leave(&request.id, &manager(), Decision::Approve, None, now())
        .expect("approval succeeds");
    let summary = harness
        .service
        .balance_summary(&employee(), LeaveType::Paid, now().date())
        .expect("summary succeeds");
    assert_eq!(summary.remaining, dec!(2.5));

    harness
        .service
        .cancel_leave(&request.id, &employee(), now())
        .expect("cancellation succeeds");
    let summary = harness
        .service
        .balance_summary(&employee(), LeaveType::Paid, now().date())
        .expect("summary succeeds");
    assert_eq!(summary.remaining, dec!(3));
}

#[test]
fn half_day_requests_need_a_single_working_date() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(5)))
        .expect("grant succeeds");

    let mut spanning = half_day_submission(date(2026, 6, 1));
    spanning.end_date = date(2026, 6, 2);
    assert!(matches!(
        harness.service.submit_leave(spanning, now()),
        Err(LeaveError::HalfDayRange)
    ));

    // 2026-06-07 is a Sunday.
    assert!(matches!(
        harness
            .service
            .submit_leave(half_day_submission(date(2026, 6, 7)), now()),
        Err(LeaveError::NonWorkingDay { .. })
    ));
}

#[test]
fn half_days_are_reserved_for_paid_leave() {
    let harness = harness();
    let mut submission = half_day_submission(date(2026, 6, 1));
    submission.leave_type = LeaveType::Seasonal;
    assert!(matches!(
        harness.service.submit_leave(submission, now()),
        Err(LeaveError::HalfDayUnit { .. })
    ));
}

#[test]
fn paid_leave_requires_a_reason() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(5)))
        .expect("grant succeeds");

    let mut submission = week_submission(LeaveType::Paid);
    submission.reason = Some("  ".to_string());
    assert!(matches!(
        harness.service.submit_leave(submission, now()),
        Err(LeaveError::MissingReason { .. })
    ));
}

#[test]
fn weekend_only_ranges_carry_no_working_days() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(5)))
        .expect("grant succeeds");

    let mut weekend = week_submission(LeaveType::Paid);
    weekend.start_date = date(2026, 6, 6);
    weekend.end_date = date(2026, 6, 7);
    assert!(matches!(
        harness.service.submit_leave(weekend, now()),
        Err(LeaveError::NoWorkingDays { .. })
    ));
}

#[test]
fn overlapping_requests_are_rejected_across_leave_types() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(10)))
        .expect("grant succeeds");
    harness
        .service
        .grant_leave(GrantSubmissionSeasonal::build())
        .expect("seasonal grant succeeds");

    harness
        .service
        .submit_leave(week_submission(LeaveType::Paid), now())
        .expect("first submission accepted");

    let mut overlapping = week_submission(LeaveType::Seasonal);
    overlapping.start_date = date(2026, 6, 4);
    overlapping.end_date = date(2026, 6, 9);
    overlapping.reason = None;
    assert!(matches!(
        harness.service.submit_leave(overlapping, now()),
        Err(LeaveError::Overlap { .. })
    ));
}

#[test]
fn pending_requests_reserve_balance() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(6)))
        .expect("grant succeeds");

    harness
        .service
        .submit_leave(week_submission(LeaveType::Paid), now())
        .expect("first submission accepted");

    // Five of six days are reserved; a second week cannot fit.
    let mut second = week_submission(LeaveType::Paid);
    second.start_date = date(2026, 6, 8);
    second.end_date = date(2026, 6, 12);
    let err = harness
        .service
        .submit_leave(second, now())
        .expect_err("insufficient remainder");
    assert!(matches!(
        err,
        LeaveError::InsufficientBalance { available, requested }
            if available == dec!(1) && requested == dec!(5)
    ));
}

#[test]
fn approval_consumes_and_cancellation_restores() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(10)))
        .expect("grant succeeds");

    let request = harness
        .service
        .submit_leave(week_submission(LeaveType::Paid), now())
        .expect("submission accepted");
    harness
        .service
        .decide_leave(&request.id, &manager(), Decision::Approve, None, now())
        .expect("approval succeeds");

    let summary = harness
        .service
        .balance_summary(&employee(), LeaveType::Paid, now().date())
        .expect("summary succeeds");
    assert_eq!(summary.remaining, dec!(5));
    assert_eq!(summary.pending, Decimal::ZERO);

    harness
        .service
        .cancel_leave(&request.id, &employee(), now())
        .expect("cancellation succeeds");
    let summary = harness
        .service
        .balance_summary(&employee(), LeaveType::Paid, now().date())
        .expect("summary succeeds");
    assert_eq!(summary.remaining, dec!(10));
}

#[test]
fn rejected_requests_are_terminal() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(10)))
        .expect("grant succeeds");

    let request = harness
        .service
        .submit_leave(week_submission(LeaveType::Paid), now())
        .expect("submission accepted");

    assert!(matches!(
        harness
            .service
            .decide_leave(&request.id, &manager(), Decision::Reject, None, now()),
        Err(LeaveError::MissingComment)
    ));

    harness
        .service
        .decide_leave(
            &request.id,
            &manager(),
            Decision::Reject,
            Some("peak season".to_string()),
            now(),
        )
        .expect("rejection succeeds");

    assert!(matches!(
        harness.service.cancel_leave(&request.id, &employee(), now()),
        Err(LeaveError::NotCancellable(_))
    ));
}

#[test]
fn seasonal_leave_needs_an_unexpired_grant() {
    let harness = harness();

    // Grant expired before the request date.
    harness
        .service
        .grant_leave(GrantSubmissionSeasonal::expired())
        .expect("grant succeeds");

    let mut submission = week_submission(LeaveType::Seasonal);
    submission.reason = None;
    let err = harness
        .service
        .submit_leave(submission, now())
        .expect_err("expired grant cannot fund leave");
    assert!(matches!(err, LeaveError::InsufficientBalance { .. }));
}

#[test]
fn leave_preempts_active_adjustments() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(10)))
        .expect("grant succeeds");

    let monday = date(2026, 6, 1);
    let adjustment = harness
        .attendance_service
        .submit_adjustment(AdjustmentSubmission {
            employee_id: employee(),
            date: monday,
            clock_in: at(monday, 9, 0),
            clock_out: at(monday, 18, 0),
            break_minutes: Some(60),
            reason: "badge failure".to_string(),
        })
        .expect("adjustment accepted");

    harness
        .service
        .submit_leave(week_submission(LeaveType::Paid), now())
        .expect("leave accepted");

    let stored = harness
        .adjustments
        .fetch(&adjustment.id)
        .expect("fetch succeeds")
        .expect("request present");
    assert_eq!(stored.status, RequestStatus::Cancelled);
}

#[test]
fn termination_resets_every_balance() {
    let harness = harness();
    harness
        .service
        .grant_leave(paid_grant(dec!(10)))
        .expect("grant succeeds");
    harness
        .service
        .grant_leave(GrantSubmissionSeasonal::build())
        .expect("seasonal grant succeeds");

    harness.directory.deactivate(&employee());
    let balances = harness
        .service
        .reset_balances(&employee())
        .expect("reset succeeds");
    assert_eq!(balances.len(), 2);
    assert!(balances
        .iter()
        .all(|balance| balance.remaining == Decimal::ZERO && balance.total == Decimal::ZERO));
}

#[test]
fn refresh_drops_expired_grants_from_the_total() {
    let harness = harness();
    harness
        .service
        .grant_leave(GrantSubmissionSeasonal::build())
        .expect("active grant succeeds");
    harness
        .service
        .grant_leave(GrantSubmissionSeasonal::expired())
        .expect("expired grant succeeds");

    let summary = harness
        .service
        .balance_summary(&employee(), LeaveType::Seasonal, now().date())
        .expect("summary succeeds");
    // The stored total still carries the expired history.
    assert_eq!(summary.remaining, dec!(3));

    let refreshed = harness
        .service
        .refresh_balance(&employee(), LeaveType::Seasonal, now().date())
        .expect("refresh succeeds");
    assert_eq!(refreshed.total, dec!(3));
    assert_eq!(refreshed.remaining, dec!(3));
}

/// Builders for seasonal grants used across several scenarios.
struct GrantSubmissionSeasonal;

impl GrantSubmissionSeasonal {
    fn build() -> GrantSubmission {
        GrantSubmission {
            employee_id: employee(),
            leave_type: LeaveType::Seasonal,
            days: dec!(3),
            granted_on: date(2026, 5, 1),
            expires_at: Some(date(2026, 9, 30)),
            granted_by: manager(),
        }
    }

    fn expired() -> GrantSubmission {
        GrantSubmission {
            employee_id: employee(),
            leave_type: LeaveType::Seasonal,
            days: dec!(2),
            granted_on: date(2025, 7, 1),
            expires_at: Some(date(2025, 9, 30)),
            granted_by: manager(),
        }
    }
}
