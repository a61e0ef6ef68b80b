use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::info;

use super::domain::{
    AdjustmentRequest, AdjustmentSubmission, AttendanceRecord, AttendanceStatus,
};
use super::metrics::{self, MetricsError};
use super::repository::{AdjustmentRepository, AttendanceRepository};
use crate::fault::{Fault, FaultKind};
use crate::workflows::audit::{Approval, ApprovalLog, ApprovalTarget, AuditError};
use crate::workflows::employee::{self, EmployeeDirectory, EmployeeGateError, EmployeeId};
use crate::workflows::schedule::repository::PatternRepository;
use crate::workflows::schedule::resolver::ScheduleResolver;
use crate::workflows::status::{Decision, RequestStatus};
use crate::workflows::{RepositoryError, RequestId};

static ADJUSTMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_adjustment_id() -> RequestId {
    let id = ADJUSTMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("adj-{id:06}"))
}

/// Service owning the attendance ledger: clock events, finalization, and
/// the adjustment-request workflow.
pub struct AttendanceService<A, J, P, D, G> {
    attendance: Arc<A>,
    adjustments: Arc<J>,
    resolver: ScheduleResolver<P, A>,
    directory: Arc<D>,
    audit: Arc<G>,
}

impl<A, J, P, D, G> AttendanceService<A, J, P, D, G>
where
    A: AttendanceRepository + 'static,
    J: AdjustmentRepository + 'static,
    P: PatternRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    pub fn new(
        attendance: Arc<A>,
        adjustments: Arc<J>,
        resolver: ScheduleResolver<P, A>,
        directory: Arc<D>,
        audit: Arc<G>,
    ) -> Self {
        Self {
            attendance,
            adjustments,
            resolver,
            directory,
            audit,
        }
    }

    /// Register a clock-in, creating the day's ledger record lazily.
    ///
    /// Lateness is computed against the resolved schedule; no working-day
    /// check applies because actual presence overrides the nominal calendar.
    pub fn record_clock_in(
        &self,
        employee_id: &EmployeeId,
        now: NaiveDateTime,
    ) -> Result<AttendanceRecord, AttendanceError> {
        employee::require_active(self.directory.as_ref(), employee_id)?;

        let date = now.date();
        let mut record = self
            .attendance
            .fetch(employee_id, date)?
            .unwrap_or_else(|| AttendanceRecord::empty(employee_id.clone(), date));

        if record.finalized {
            return Err(AttendanceError::Finalized { date });
        }
        if record.clock_in.is_some() {
            return Err(AttendanceError::AlreadyClockedIn { date });
        }

        let schedule = self.resolver.resolve(employee_id, date)?;
        record.clock_in = Some(now);
        record.late_minutes = metrics::late_minutes(schedule.start_on(date), now);
        record.status = if record.late_minutes > 0 {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Normal
        };

        self.attendance.upsert(record.clone())?;
        info!(employee = %employee_id, %date, late = record.late_minutes, "clock-in recorded");
        Ok(record)
    }

    /// Register a clock-out and derive the day's full metric set.
    ///
    /// An open record from the previous day is accepted so overnight shifts
    /// close against the day they started.
    pub fn record_clock_out(
        &self,
        employee_id: &EmployeeId,
        now: NaiveDateTime,
    ) -> Result<AttendanceRecord, AttendanceError> {
        employee::require_active(self.directory.as_ref(), employee_id)?;

        let mut record = self
            .open_record(employee_id, now.date())?
            .ok_or(AttendanceError::NotClockedIn { date: now.date() })?;

        if record.finalized {
            return Err(AttendanceError::Finalized { date: record.date });
        }
        let clock_in = record
            .clock_in
            .ok_or(AttendanceError::NotClockedIn { date: record.date })?;

        let schedule = self.resolver.resolve(employee_id, record.date)?;
        let computed = metrics::compute(record.date, clock_in, now, None, &schedule)?;

        record.clock_out = Some(now);
        record.break_minutes = computed.break_minutes;
        record.late_minutes = computed.late_minutes;
        record.early_leave_minutes = computed.early_leave_minutes;
        record.overtime_minutes = computed.overtime_minutes;
        record.night_shift_minutes = computed.night_shift_minutes;
        record.status = metrics::classify(&computed);

        self.attendance.upsert(record.clone())?;
        info!(
            employee = %employee_id,
            date = %record.date,
            status = record.status.label(),
            "clock-out recorded"
        );
        Ok(record)
    }

    /// Mark a day's record as closed for edits.
    pub fn finalize(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let mut record = self
            .attendance
            .fetch(employee_id, date)?
            .ok_or(AttendanceError::RecordNotFound { date })?;
        record.finalized = true;
        self.attendance.upsert(record.clone())?;
        Ok(record)
    }

    /// File a correction proposal for one date's clock data.
    pub fn submit_adjustment(
        &self,
        submission: AdjustmentSubmission,
    ) -> Result<AdjustmentRequest, AttendanceError> {
        employee::require_active(self.directory.as_ref(), &submission.employee_id)?;

        if submission.clock_out < submission.clock_in {
            return Err(MetricsError::ClockOrder {
                clock_in: submission.clock_in,
                clock_out: submission.clock_out,
            }
            .into());
        }
        if submission.clock_in.date() != submission.date {
            return Err(AttendanceError::ClockOutsideDate {
                date: submission.date,
            });
        }

        let elapsed = (submission.clock_out - submission.clock_in).num_minutes();
        if let Some(break_minutes) = submission.break_minutes {
            if break_minutes < 0 {
                return Err(AttendanceError::NegativeBreak);
            }
            if break_minutes > elapsed {
                return Err(AttendanceError::BreakExceedsShift {
                    break_minutes,
                    elapsed,
                });
            }
            let required = metrics::minimum_break_for(elapsed);
            if break_minutes < required {
                return Err(AttendanceError::InsufficientBreak {
                    break_minutes,
                    required,
                });
            }
        }

        let record = self
            .attendance
            .fetch(&submission.employee_id, submission.date)?;
        if record.as_ref().is_some_and(|r| r.finalized) {
            return Err(AttendanceError::Finalized {
                date: submission.date,
            });
        }

        let active = self
            .adjustments
            .active_for_date(&submission.employee_id, submission.date)?;
        if !active.is_empty() {
            return Err(AttendanceError::DuplicateRequest {
                date: submission.date,
            });
        }

        let schedule = self
            .resolver
            .resolve(&submission.employee_id, submission.date)?;
        if !schedule.is_working_day {
            return Err(AttendanceError::NonWorkingDay {
                date: submission.date,
            });
        }

        let request = AdjustmentRequest {
            id: next_adjustment_id(),
            employee_id: submission.employee_id,
            date: submission.date,
            proposed_clock_in: submission.clock_in,
            proposed_clock_out: submission.clock_out,
            proposed_break_minutes: submission.break_minutes,
            reason: submission.reason,
            status: RequestStatus::Pending,
            prior: record.as_ref().map(AttendanceRecord::snapshot),
            approver_id: None,
            decided_at: None,
            rejection_comment: None,
        };

        let stored = self.adjustments.insert(request)?;
        info!(request = %stored.id, date = %stored.date, "adjustment submitted");
        Ok(stored)
    }

    /// Approve or reject a pending adjustment.
    ///
    /// Approval re-captures the ledger snapshot immediately before
    /// overwriting it, so a later cancellation reverses exactly.
    pub fn decide_adjustment(
        &self,
        request_id: &RequestId,
        approver_id: &EmployeeId,
        decision: Decision,
        comment: Option<String>,
        now: NaiveDateTime,
    ) -> Result<AdjustmentRequest, AttendanceError> {
        employee::require_active(self.directory.as_ref(), approver_id)?;

        let mut request = self
            .adjustments
            .fetch(request_id)?
            .ok_or_else(|| AttendanceError::RequestNotFound(request_id.clone()))?;
        if request.status != RequestStatus::Pending {
            return Err(AttendanceError::NotPending(request_id.clone()));
        }

        match decision {
            Decision::Reject => {
                let comment = non_blank(comment).ok_or(AttendanceError::MissingComment)?;
                request.status = RequestStatus::Rejected;
                request.rejection_comment = Some(comment);
            }
            Decision::Approve => {
                let mut record = self
                    .attendance
                    .fetch(&request.employee_id, request.date)?
                    .unwrap_or_else(|| {
                        AttendanceRecord::empty(request.employee_id.clone(), request.date)
                    });
                if record.finalized {
                    return Err(AttendanceError::Finalized { date: request.date });
                }

                request.prior = record.has_clock_data().then(|| record.snapshot());

                let schedule = self.resolver.resolve(&request.employee_id, request.date)?;
                let computed = metrics::compute(
                    request.date,
                    request.proposed_clock_in,
                    request.proposed_clock_out,
                    request.proposed_break_minutes,
                    &schedule,
                )?;

                record.clock_in = Some(request.proposed_clock_in);
                record.clock_out = Some(request.proposed_clock_out);
                record.break_minutes = computed.break_minutes;
                record.late_minutes = computed.late_minutes;
                record.early_leave_minutes = computed.early_leave_minutes;
                record.overtime_minutes = computed.overtime_minutes;
                record.night_shift_minutes = computed.night_shift_minutes;
                record.status = metrics::classify(&computed);

                self.attendance.upsert(record)?;
                request.status = RequestStatus::Approved;
            }
        }

        request.approver_id = Some(approver_id.clone());
        request.decided_at = Some(now);
        self.adjustments.update(request.clone())?;

        self.audit.append(Approval {
            target: ApprovalTarget::Adjustment,
            target_id: request.id.clone(),
            resulting_status: request.status,
            approver_id: approver_id.clone(),
            comment: request.rejection_comment.clone(),
            decided_at: now,
        })?;

        info!(request = %request.id, status = request.status.label(), "adjustment decided");
        Ok(request)
    }

    /// Cancel a pending or approved adjustment.
    ///
    /// Cancelling an approved request reverses the ledger to the snapshot
    /// taken at approval; a pending cancellation touches nothing.
    pub fn cancel_adjustment(
        &self,
        request_id: &RequestId,
        requester_id: &EmployeeId,
        now: NaiveDateTime,
    ) -> Result<AdjustmentRequest, AttendanceError> {
        let mut request = self
            .adjustments
            .fetch(request_id)?
            .ok_or_else(|| AttendanceError::RequestNotFound(request_id.clone()))?;
        if request.employee_id != *requester_id {
            return Err(AttendanceError::NotRequestOwner {
                request: request_id.clone(),
                employee: requester_id.clone(),
            });
        }

        match request.status {
            RequestStatus::Rejected | RequestStatus::Cancelled => {
                return Err(AttendanceError::NotCancellable(request_id.clone()));
            }
            RequestStatus::Approved => {
                revert_approved_adjustment(self.attendance.as_ref(), &self.resolver, &request)?;
            }
            RequestStatus::Pending => {}
        }

        request.status = RequestStatus::Cancelled;
        self.adjustments.update(request.clone())?;

        self.audit.append(Approval {
            target: ApprovalTarget::Adjustment,
            target_id: request.id.clone(),
            resulting_status: RequestStatus::Cancelled,
            approver_id: requester_id.clone(),
            comment: None,
            decided_at: now,
        })?;

        info!(request = %request.id, "adjustment cancelled");
        Ok(request)
    }

    /// The record a clock-out should close: today's, or yesterday's when it
    /// is still open (overnight shift).
    fn open_record(
        &self,
        employee_id: &EmployeeId,
        today: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AttendanceError> {
        if let Some(record) = self.attendance.fetch(employee_id, today)? {
            if record.clock_in.is_some() && record.clock_out.is_none() {
                return Ok(Some(record));
            }
            if record.clock_out.is_some() {
                return Err(AttendanceError::AlreadyClockedOut { date: today });
            }
        }

        let yesterday = today - Duration::days(1);
        if let Some(record) = self.attendance.fetch(employee_id, yesterday)? {
            if record.clock_in.is_some() && record.clock_out.is_none() {
                return Ok(Some(record));
            }
        }

        Ok(None)
    }
}

/// Reverse an approved adjustment: restore the snapshot exactly, or clear
/// the clock fields when no record pre-existed the approval.
pub(crate) fn revert_approved_adjustment<A, P>(
    attendance: &A,
    resolver: &ScheduleResolver<P, A>,
    request: &AdjustmentRequest,
) -> Result<(), AttendanceError>
where
    A: AttendanceRepository,
    P: PatternRepository,
{
    let mut record = attendance
        .fetch(&request.employee_id, request.date)?
        .unwrap_or_else(|| AttendanceRecord::empty(request.employee_id.clone(), request.date));

    match request.prior {
        Some(snapshot) => {
            record.clock_in = snapshot.clock_in;
            record.clock_out = snapshot.clock_out;
            rebuild_derived(&mut record, resolver, Some(snapshot.break_minutes))?;
            record.break_minutes = snapshot.break_minutes;
        }
        None => {
            record.clock_in = None;
            record.clock_out = None;
            record.break_minutes = 0;
            record.clear_metrics();
            record.status = AttendanceStatus::Absent;
        }
    }

    attendance.upsert(record)?;
    Ok(())
}

/// Recompute the derived fields from whatever clock data the record holds.
fn rebuild_derived<A, P>(
    record: &mut AttendanceRecord,
    resolver: &ScheduleResolver<P, A>,
    explicit_break: Option<i64>,
) -> Result<(), AttendanceError>
where
    A: AttendanceRepository,
    P: PatternRepository,
{
    let schedule = resolver.resolve(&record.employee_id, record.date)?;
    match (record.clock_in, record.clock_out) {
        (Some(clock_in), Some(clock_out)) => {
            let computed =
                metrics::compute(record.date, clock_in, clock_out, explicit_break, &schedule)?;
            record.break_minutes = computed.break_minutes;
            record.late_minutes = computed.late_minutes;
            record.early_leave_minutes = computed.early_leave_minutes;
            record.overtime_minutes = computed.overtime_minutes;
            record.night_shift_minutes = computed.night_shift_minutes;
            record.status = metrics::classify(&computed);
        }
        (Some(clock_in), None) => {
            record.clear_metrics();
            record.late_minutes = metrics::late_minutes(schedule.start_on(record.date), clock_in);
            record.status = if record.late_minutes > 0 {
                AttendanceStatus::Late
            } else {
                AttendanceStatus::Normal
            };
        }
        _ => {
            record.clear_metrics();
            record.status = AttendanceStatus::Absent;
        }
    }
    Ok(())
}

pub(crate) fn non_blank(comment: Option<String>) -> Option<String> {
    comment.and_then(|text| {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Error raised by the attendance service.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("adjustment request {0} not found")]
    RequestNotFound(RequestId),
    #[error("no attendance record exists for {date}")]
    RecordNotFound { date: NaiveDate },
    #[error("attendance for {date} is finalized")]
    Finalized { date: NaiveDate },
    #[error("already clocked in on {date}")]
    AlreadyClockedIn { date: NaiveDate },
    #[error("already clocked out on {date}")]
    AlreadyClockedOut { date: NaiveDate },
    #[error("no open clock-in to close on {date}")]
    NotClockedIn { date: NaiveDate },
    #[error("clock times must fall on {date}")]
    ClockOutsideDate { date: NaiveDate },
    #[error("break minutes must not be negative")]
    NegativeBreak,
    #[error("break of {break_minutes} minutes exceeds the {elapsed} minute shift")]
    BreakExceedsShift { break_minutes: i64, elapsed: i64 },
    #[error("break of {break_minutes} minutes is below the required {required}")]
    InsufficientBreak { break_minutes: i64, required: i64 },
    #[error("an active adjustment request already exists for {date}")]
    DuplicateRequest { date: NaiveDate },
    #[error("{date} is not a working day")]
    NonWorkingDay { date: NaiveDate },
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
    Metrics(#[from] MetricsError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl Fault for AttendanceError {
    fn kind(&self) -> FaultKind {
        match self {
            AttendanceError::RequestNotFound(_) | AttendanceError::RecordNotFound { .. } => {
                FaultKind::NotFound
            }
            AttendanceError::Finalized { .. }
            | AttendanceError::AlreadyClockedIn { .. }
            | AttendanceError::AlreadyClockedOut { .. }
            | AttendanceError::NotClockedIn { .. }
            | AttendanceError::NotPending(_)
            | AttendanceError::NotCancellable(_)
            | AttendanceError::NotRequestOwner { .. } => FaultKind::InvalidState,
            AttendanceError::ClockOutsideDate { .. }
            | AttendanceError::NegativeBreak
            | AttendanceError::MissingComment => FaultKind::InvalidInput,
            AttendanceError::BreakExceedsShift { .. }
            | AttendanceError::InsufficientBreak { .. }
            | AttendanceError::DuplicateRequest { .. }
            | AttendanceError::NonWorkingDay { .. } => FaultKind::RuleViolation,
            AttendanceError::Employee(err) => err.kind(),
            AttendanceError::Metrics(err) => err.kind(),
            AttendanceError::Repository(err) => err.kind(),
            AttendanceError::Audit(err) => err.kind(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AttendanceError::RequestNotFound(_) => "adjustment_not_found",
            AttendanceError::RecordNotFound { .. } => "attendance_not_found",
            AttendanceError::Finalized { .. } => "attendance_finalized",
            AttendanceError::AlreadyClockedIn { .. } => "already_clocked_in",
            AttendanceError::AlreadyClockedOut { .. } => "already_clocked_out",
            AttendanceError::NotClockedIn { .. } => "not_clocked_in",
            AttendanceError::ClockOutsideDate { .. } => "clock_outside_date",
            AttendanceError::NegativeBreak => "negative_break",
            AttendanceError::BreakExceedsShift { .. } => "break_exceeds_shift",
            AttendanceError::InsufficientBreak { .. } => "insufficient_break",
            AttendanceError::DuplicateRequest { .. } => "duplicate_adjustment",
            AttendanceError::NonWorkingDay { .. } => "non_working_day",
            AttendanceError::NotPending(_) => "request_not_pending",
            AttendanceError::NotCancellable(_) => "request_not_cancellable",
            AttendanceError::NotRequestOwner { .. } => "request_not_owned",
            AttendanceError::MissingComment => "missing_comment",
            AttendanceError::Employee(err) => err.code(),
            AttendanceError::Metrics(err) => err.code(),
            AttendanceError::Repository(err) => err.code(),
            AttendanceError::Audit(err) => err.code(),
        }
    }
}
