use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use super::balance::{round_days, BalanceSummary, LeaveBalance};
use super::domain::{GrantSubmission, LeaveGrant, LeaveRequest, LeaveSubmission, LeaveType};
use super::repository::LeaveRepository;
use crate::fault::{Fault, FaultKind};
use crate::workflows::attendance::repository::{AdjustmentRepository, AttendanceRepository};
use crate::workflows::attendance::service::{
    non_blank, revert_approved_adjustment, AttendanceError,
};
use crate::workflows::audit::{Approval, ApprovalLog, ApprovalTarget, AuditError};
use crate::workflows::employee::{self, EmployeeDirectory, EmployeeGateError, EmployeeId};
use crate::workflows::schedule::repository::PatternRepository;
use crate::workflows::schedule::resolver::ScheduleResolver;
use crate::workflows::status::{Decision, RequestStatus};
use crate::workflows::{RepositoryError, RequestId};

static LEAVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static GRANT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_leave_id() -> RequestId {
    let id = LEAVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("lv-{id:06}"))
}

fn next_grant_id() -> RequestId {
    let id = GRANT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("grant-{id:06}"))
}

/// Service owning the leave balance ledger, grants, and the leave request
/// workflow.
pub struct LeaveService<L, J, A, P, D, G> {
    leave: Arc<L>,
    adjustments: Arc<J>,
    attendance: Arc<A>,
    resolver: ScheduleResolver<P, A>,
    directory: Arc<D>,
    audit: Arc<G>,
}

impl<L, J, A, P, D, G> LeaveService<L, J, A, P, D, G>
where
    L: LeaveRepository + 'static,
    J: AdjustmentRepository + 'static,
    A: AttendanceRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    pub fn new(
        leave: Arc<L>,
        adjustments: Arc<J>,
        attendance: Arc<A>,
        resolver: ScheduleResolver<P, A>,
        directory: Arc<D>,
        audit: Arc<G>,
    ) -> Self {
        Self {
            leave,
            adjustments,
            attendance,
            resolver,
            directory,
            audit,
        }
    }

    /// Record a grant and feed the balance ledger.
    pub fn grant_leave(&self, submission: GrantSubmission) -> Result<LeaveGrant, LeaveError> {
        employee::require_active(self.directory.as_ref(), &submission.employee_id)?;

        if submission.days == Decimal::ZERO {
            return Err(LeaveError::ZeroGrant);
        }
        if let Some(expiry) = submission.expires_at {
            if expiry < submission.granted_on {
                return Err(LeaveError::ExpiryBeforeGrant {
                    granted_on: submission.granted_on,
                    expires_at: expiry,
                });
            }
        }

        let grant = LeaveGrant {
            id: next_grant_id(),
            employee_id: submission.employee_id.clone(),
            leave_type: submission.leave_type,
            days: round_days(submission.days),
            granted_on: submission.granted_on,
            expires_at: submission.expires_at,
            granted_by: submission.granted_by,
        };
        let stored = self.leave.insert_grant(grant)?;

        let mut balance = self.balance_or_new(&submission.employee_id, submission.leave_type)?;
        balance.add_to_total(stored.days);
        self.leave.save_balance(balance)?;

        info!(grant = %stored.id, days = %stored.days, "leave granted");
        Ok(stored)
    }

    /// Balance figures for one (employee, leave type), creating the balance
    /// lazily on first query.
    pub fn balance_summary(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
        today: NaiveDate,
    ) -> Result<BalanceSummary, LeaveError> {
        let balance = match self.leave.balance(employee_id, leave_type)? {
            Some(balance) => balance,
            None => {
                let fresh = LeaveBalance::new(employee_id.clone(), leave_type);
                self.leave.save_balance(fresh.clone())?;
                fresh
            }
        };

        let remaining = self.effective_remaining(&balance, today)?;
        let pending = self.pending_days(employee_id, leave_type)?;
        Ok(BalanceSummary {
            employee_id: employee_id.clone(),
            leave_type,
            remaining,
            pending,
            available: round_days((remaining - pending).max(Decimal::ZERO)),
        })
    }

    /// File a leave proposal.
    ///
    /// Active adjustment requests inside the range are cancelled before the
    /// proposal is accepted: leave pre-empts time corrections.
    pub fn submit_leave(
        &self,
        submission: LeaveSubmission,
        now: NaiveDateTime,
    ) -> Result<LeaveRequest, LeaveError> {
        employee::require_active(self.directory.as_ref(), &submission.employee_id)?;
        let today = now.date();

        if submission.end_date < submission.start_date {
            return Err(LeaveError::DateOrder {
                start: submission.start_date,
                end: submission.end_date,
            });
        }
        if submission.time_unit.is_half_day() {
            if submission.start_date != submission.end_date {
                return Err(LeaveError::HalfDayRange);
            }
            if !submission.leave_type.allows_half_day() {
                return Err(LeaveError::HalfDayUnit {
                    leave_type: submission.leave_type,
                });
            }
        }
        if submission.leave_type.requires_reason()
            && non_blank(submission.reason.clone()).is_none()
        {
            return Err(LeaveError::MissingReason {
                leave_type: submission.leave_type,
            });
        }

        let requested_days = if submission.time_unit.is_half_day() {
            let schedule = self
                .resolver
                .resolve(&submission.employee_id, submission.start_date)?;
            if !schedule.is_working_day {
                return Err(LeaveError::NonWorkingDay {
                    date: submission.start_date,
                });
            }
            dec!(0.5)
        } else {
            let working_days = self.count_working_days(
                &submission.employee_id,
                submission.start_date,
                submission.end_date,
            )?;
            if working_days == 0 {
                return Err(LeaveError::NoWorkingDays {
                    start: submission.start_date,
                    end: submission.end_date,
                });
            }
            Decimal::from(working_days)
        };

        let active = self.leave.active_requests_for(&submission.employee_id)?;
        if let Some(conflict) = active
            .iter()
            .find(|request| request.overlaps(submission.start_date, submission.end_date))
        {
            return Err(LeaveError::Overlap {
                conflicting: conflict.id.clone(),
            });
        }

        let balance = self.balance_or_new(&submission.employee_id, submission.leave_type)?;
        let remaining = self.effective_remaining(&balance, today)?;
        let pending = self.pending_days(&submission.employee_id, submission.leave_type)?;
        let available = round_days((remaining - pending).max(Decimal::ZERO));
        if available < requested_days {
            return Err(LeaveError::InsufficientBalance {
                available,
                requested: requested_days,
            });
        }
        if submission.leave_type.requires_active_grant() {
            let grants = self
                .leave
                .grants_for(&submission.employee_id, submission.leave_type)?;
            if !grants.iter().any(|grant| grant.active_on(today)) {
                return Err(LeaveError::NoActiveGrant {
                    leave_type: submission.leave_type,
                });
            }
        }

        self.preempt_adjustments(
            &submission.employee_id,
            submission.start_date,
            submission.end_date,
            now,
        )?;

        let request = LeaveRequest {
            id: next_leave_id(),
            employee_id: submission.employee_id,
            leave_type: submission.leave_type,
            time_unit: submission.time_unit,
            start_date: submission.start_date,
            end_date: submission.end_date,
            requested_days,
            reason: submission.reason,
            status: RequestStatus::Pending,
            approver_id: None,
            decided_at: None,
            rejection_comment: None,
        };

        let stored = self.leave.insert_request(request)?;
        info!(request = %stored.id, days = %stored.requested_days, "leave submitted");
        Ok(stored)
    }

    /// Approve or reject a pending leave request.
    pub fn decide_leave(
        &self,
        request_id: &RequestId,
        approver_id: &EmployeeId,
        decision: Decision,
        comment: Option<String>,
        now: NaiveDateTime,
    ) -> Result<LeaveRequest, LeaveError> {
        employee::require_active(self.directory.as_ref(), approver_id)?;

        let mut request = self
            .leave
            .fetch_request(request_id)?
            .ok_or_else(|| LeaveError::RequestNotFound(request_id.clone()))?;
        if request.status != RequestStatus::Pending {
            return Err(LeaveError::NotPending(request_id.clone()));
        }

        match decision {
            Decision::Reject => {
                let comment = non_blank(comment).ok_or(LeaveError::MissingComment)?;
                request.status = RequestStatus::Rejected;
                request.rejection_comment = Some(comment);
            }
            Decision::Approve => {
                let mut balance =
                    self.balance_or_new(&request.employee_id, request.leave_type)?;
                balance.consume(request.requested_days);
                self.leave.save_balance(balance)?;
                request.status = RequestStatus::Approved;
            }
        }

        request.approver_id = Some(approver_id.clone());
        request.decided_at = Some(now);
        self.leave.update_request(request.clone())?;

        self.audit.append(Approval {
            target: ApprovalTarget::Leave,
            target_id: request.id.clone(),
            resulting_status: request.status,
            approver_id: approver_id.clone(),
            comment: request.rejection_comment.clone(),
            decided_at: now,
        })?;

        info!(request = %request.id, status = request.status.label(), "leave decided");
        Ok(request)
    }

    /// Cancel a pending or approved leave request, restoring the balance
    /// when days were already consumed.
    pub fn cancel_leave(
        &self,
        request_id: &RequestId,
        requester_id: &EmployeeId,
        now: NaiveDateTime,
    ) -> Result<LeaveRequest, LeaveError> {
        let mut request = self
            .leave
            .fetch_request(request_id)?
            .ok_or_else(|| LeaveError::RequestNotFound(request_id.clone()))?;
        if request.employee_id != *requester_id {
            return Err(LeaveError::NotRequestOwner {
                request: request_id.clone(),
                employee: requester_id.clone(),
            });
        }

        match request.status {
            RequestStatus::Rejected | RequestStatus::Cancelled => {
                return Err(LeaveError::NotCancellable(request_id.clone()));
            }
            RequestStatus::Approved => {
                let mut balance =
                    self.balance_or_new(&request.employee_id, request.leave_type)?;
                balance.restore(request.requested_days);
                self.leave.save_balance(balance)?;
            }
            RequestStatus::Pending => {}
        }

        request.status = RequestStatus::Cancelled;
        self.leave.update_request(request.clone())?;

        self.audit.append(Approval {
            target: ApprovalTarget::Leave,
            target_id: request.id.clone(),
            resulting_status: RequestStatus::Cancelled,
            approver_id: requester_id.clone(),
            comment: None,
            decided_at: now,
        })?;

        info!(request = %request.id, "leave cancelled");
        Ok(request)
    }

    /// Zero every balance the employee holds; applied on termination.
    pub fn reset_balances(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveBalance>, LeaveError> {
        let mut balances = self.leave.balances_for(employee_id)?;
        for balance in &mut balances {
            balance.reset();
            self.leave.save_balance(balance.clone())?;
        }
        info!(employee = %employee_id, "leave balances reset");
        Ok(balances)
    }

    /// Cleanup pass: recompute a balance's total from the grants that are
    /// still active, dropping expired history from the figure.
    pub fn refresh_balance(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
        today: NaiveDate,
    ) -> Result<LeaveBalance, LeaveError> {
        let grants = self.leave.grants_for(employee_id, leave_type)?;
        let active_total: Decimal = grants
            .iter()
            .filter(|grant| grant.active_on(today))
            .map(|grant| grant.days)
            .sum();

        let mut balance = self.balance_or_new(employee_id, leave_type)?;
        balance.set_total(active_total);
        self.leave.save_balance(balance.clone())?;
        Ok(balance)
    }

    fn balance_or_new(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<LeaveBalance, LeaveError> {
        Ok(self
            .leave
            .balance(employee_id, leave_type)?
            .unwrap_or_else(|| LeaveBalance::new(employee_id.clone(), leave_type)))
    }

    /// Remaining days usable for validation. Perpetual types trust the
    /// ledger; seasonal/special types only count unexpired grants.
    fn effective_remaining(
        &self,
        balance: &LeaveBalance,
        today: NaiveDate,
    ) -> Result<Decimal, LeaveError> {
        if !balance.leave_type.requires_active_grant() {
            return Ok(balance.remaining);
        }

        let grants = self
            .leave
            .grants_for(&balance.employee_id, balance.leave_type)?;
        let active_total: Decimal = grants
            .iter()
            .filter(|grant| grant.active_on(today))
            .map(|grant| grant.days)
            .sum();
        Ok(round_days(
            (active_total - balance.used).max(Decimal::ZERO),
        ))
    }

    fn pending_days(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<Decimal, LeaveError> {
        let pending = self.leave.pending_requests_for(employee_id, leave_type)?;
        Ok(round_days(
            pending
                .iter()
                .map(|request| request.requested_days)
                .sum(),
        ))
    }

    fn count_working_days(
        &self,
        employee_id: &EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, LeaveError> {
        let mut count = 0;
        let mut date = start;
        while date <= end {
            if self.resolver.resolve(employee_id, date)?.is_working_day {
                count += 1;
            }
            date += Duration::days(1);
        }
        Ok(count)
    }

    /// Cancel every active adjustment request inside the leave range,
    /// reversing ledger effects of approved ones.
    fn preempt_adjustments(
        &self,
        employee_id: &EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<(), LeaveError> {
        let active = self.adjustments.active_in_range(employee_id, start, end)?;
        for mut adjustment in active {
            if adjustment.status == RequestStatus::Approved {
                revert_approved_adjustment(
                    self.attendance.as_ref(),
                    &self.resolver,
                    &adjustment,
                )?;
            }
            adjustment.status = RequestStatus::Cancelled;
            self.adjustments.update(adjustment.clone())?;
            self.audit.append(Approval {
                target: ApprovalTarget::Adjustment,
                target_id: adjustment.id.clone(),
                resulting_status: RequestStatus::Cancelled,
                approver_id: employee_id.clone(),
                comment: None,
                decided_at: now,
            })?;
            info!(request = %adjustment.id, "adjustment pre-empted by leave request");
        }
        Ok(())
    }
}

/// Error raised by the leave workflow.
#[derive(Debug, thiserror::Error)]
pub enum LeaveError {
    #[error("leave request {0} not found")]
    RequestNotFound(RequestId),
    #[error("a grant of zero days has no effect")]
    ZeroGrant,
    #[error("grant expiry {expires_at} precedes grant date {granted_on}")]
    ExpiryBeforeGrant {
        granted_on: NaiveDate,
        expires_at: NaiveDate,
    },
    #[error("end date {end} precedes start date {start}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
    #[error("half-day requests must cover a single date")]
    HalfDayRange,
    #[error("{leave_type} leave cannot be taken in half-day units")]
    HalfDayUnit { leave_type: LeaveType },
    #[error("{leave_type} leave requires a reason")]
    MissingReason { leave_type: LeaveType },
    #[error("{date} is not a working day")]
    NonWorkingDay { date: NaiveDate },
    #[error("no working days between {start} and {end}")]
    NoWorkingDays { start: NaiveDate, end: NaiveDate },
    #[error("date range overlaps active request {conflicting}")]
    Overlap { conflicting: RequestId },
    #[error("no unexpired grant exists for {leave_type} leave")]
    NoActiveGrant { leave_type: LeaveType },
    #[error("requested {requested} days but only {available} available")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },
    #[error("request {0} is not pending")]
    NotPending(RequestId),
    #[error("request {0} cannot be cancelled from its current state")]
    NotCancellable(RequestId),
    #[error("request {request} does not belong to employee {employee}")]
    NotRequestOwner {
        request: RequestId,
        employee: EmployeeId,
    },
    #[error("rejection requires a comment")]
    MissingComment,
    #[error(transparent)]
    Employee(#[from] EmployeeGateError),
    #[error(transparent)]
    Attendance(#[from] AttendanceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl Fault for LeaveError {
    fn kind(&self) -> FaultKind {
        match self {
            LeaveError::RequestNotFound(_) => FaultKind::NotFound,
            LeaveError::NotPending(_)
            | LeaveError::NotCancellable(_)
            | LeaveError::NotRequestOwner { .. } => FaultKind::InvalidState,
            LeaveError::ZeroGrant
            | LeaveError::ExpiryBeforeGrant { .. }
            | LeaveError::DateOrder { .. }
            | LeaveError::HalfDayRange
            | LeaveError::HalfDayUnit { .. }
            | LeaveError::MissingReason { .. }
            | LeaveError::MissingComment => FaultKind::InvalidInput,
            LeaveError::NonWorkingDay { .. }
            | LeaveError::NoWorkingDays { .. }
            | LeaveError::Overlap { .. }
            | LeaveError::NoActiveGrant { .. }
            | LeaveError::InsufficientBalance { .. } => FaultKind::RuleViolation,
            LeaveError::Employee(err) => err.kind(),
            LeaveError::Attendance(err) => err.kind(),
            LeaveError::Repository(err) => err.kind(),
            LeaveError::Audit(err) => err.kind(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            LeaveError::RequestNotFound(_) => "leave_not_found",
            LeaveError::ZeroGrant => "zero_grant",
            LeaveError::ExpiryBeforeGrant { .. } => "expiry_before_grant",
            LeaveError::DateOrder { .. } => "date_order",
            LeaveError::HalfDayRange => "half_day_range",
            LeaveError::HalfDayUnit { .. } => "half_day_unit",
            LeaveError::MissingReason { .. } => "missing_reason",
            LeaveError::NonWorkingDay { .. } => "non_working_day",
            LeaveError::NoWorkingDays { .. } => "no_working_days",
            LeaveError::Overlap { .. } => "leave_overlap",
            LeaveError::NoActiveGrant { .. } => "no_active_grant",
            LeaveError::InsufficientBalance { .. } => "insufficient_balance",
            LeaveError::NotPending(_) => "request_not_pending",
            LeaveError::NotCancellable(_) => "request_not_cancellable",
            LeaveError::NotRequestOwner { .. } => "request_not_owned",
            LeaveError::MissingComment => "missing_comment",
            LeaveError::Employee(err) => err.code(),
            LeaveError::Attendance(err) => err.code(),
            LeaveError::Repository(err) => err.code(),
            LeaveError::Audit(err) => err.code(),
        }
    }
}
