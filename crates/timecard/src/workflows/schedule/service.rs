use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use tracing::info;

use super::domain::{span_minutes, WorkPatternChangeRequest, WorkPatternSubmission};
use super::repository::PatternRepository;
use crate::fault::{Fault, FaultKind};
use crate::workflows::attendance::domain::{AttendanceRecord, AttendanceStatus};
use crate::workflows::attendance::metrics::{self, MetricsError};
use crate::workflows::attendance::repository::AttendanceRepository;
use crate::workflows::attendance::service::non_blank;
use crate::workflows::audit::{Approval, ApprovalLog, ApprovalTarget, AuditError};
use crate::workflows::employee::{self, EmployeeDirectory, EmployeeGateError, EmployeeId};
use crate::workflows::status::{Decision, RequestStatus};
use crate::workflows::{RepositoryError, RequestId};

static PATTERN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_pattern_id() -> RequestId {
    let id = PATTERN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("wp-{id:06}"))
}

/// Service owning the schedule-override approval workflow.
pub struct WorkPatternService<P, A, D, G> {
    patterns: Arc<P>,
    attendance: Arc<A>,
    directory: Arc<D>,
    audit: Arc<G>,
}

impl<P, A, D, G> WorkPatternService<P, A, D, G>
where
    P: PatternRepository + 'static,
    A: AttendanceRepository + 'static,
    D: EmployeeDirectory + 'static,
    G: ApprovalLog + 'static,
{
    pub fn new(patterns: Arc<P>, attendance: Arc<A>, directory: Arc<D>, audit: Arc<G>) -> Self {
        Self {
            patterns,
            attendance,
            directory,
            audit,
        }
    }

    /// File a schedule-override proposal for a date range.
    pub fn submit(
        &self,
        submission: WorkPatternSubmission,
    ) -> Result<WorkPatternChangeRequest, PatternError> {
        employee::require_active(self.directory.as_ref(), &submission.employee_id)?;

        if submission.end_date < submission.start_date {
            return Err(PatternError::DateOrder {
                start: submission.start_date,
                end: submission.end_date,
            });
        }
        if submission.end_time <= submission.start_time {
            return Err(PatternError::TimeOrder {
                start: submission.start_time,
                end: submission.end_time,
            });
        }
        if !submission.weekdays.any() && !submission.applies_on_holiday {
            return Err(PatternError::NoApplicableDay);
        }
        if submission.break_minutes < 0 {
            return Err(PatternError::NegativeBreak);
        }

        let span = span_minutes(submission.start_time, submission.end_time);
        if submission.break_minutes >= span {
            return Err(PatternError::BreakExceedsSpan {
                break_minutes: submission.break_minutes,
                span,
            });
        }
        let required = metrics::minimum_break_for(span);
        if submission.break_minutes < required {
            return Err(PatternError::InsufficientBreak {
                break_minutes: submission.break_minutes,
                required,
            });
        }

        let active = self.patterns.active_for_employee(&submission.employee_id)?;
        if let Some(conflict) = active
            .iter()
            .find(|request| request.overlaps(submission.start_date, submission.end_date))
        {
            return Err(PatternError::Overlap {
                conflicting: conflict.id.clone(),
            });
        }

        let request = WorkPatternChangeRequest {
            id: next_pattern_id(),
            employee_id: submission.employee_id,
            start_date: submission.start_date,
            end_date: submission.end_date,
            start_time: submission.start_time,
            end_time: submission.end_time,
            break_minutes: submission.break_minutes,
            working_minutes: span - submission.break_minutes,
            weekdays: submission.weekdays,
            applies_on_holiday: submission.applies_on_holiday,
            reason: submission.reason,
            status: RequestStatus::Pending,
            approver_id: None,
            decided_at: None,
            rejection_comment: None,
        };

        let stored = self.patterns.insert(request)?;
        info!(request = %stored.id, "work pattern change submitted");
        Ok(stored)
    }

    /// Approve or reject a pending schedule-override request.
    ///
    /// Approval walks every date in the range: working dates with clock
    /// data are recomputed against the new baseline, non-working dates are
    /// forced into a holiday classification.
    pub fn decide(
        &self,
        request_id: &RequestId,
        approver_id: &EmployeeId,
        decision: Decision,
        comment: Option<String>,
        now: NaiveDateTime,
    ) -> Result<WorkPatternChangeRequest, PatternError> {
        employee::require_active(self.directory.as_ref(), approver_id)?;

        let mut request = self
            .patterns
            .fetch(request_id)?
            .ok_or_else(|| PatternError::RequestNotFound(request_id.clone()))?;
        if request.status != RequestStatus::Pending {
            return Err(PatternError::NotPending(request_id.clone()));
        }

        match decision {
            Decision::Reject => {
                let comment = non_blank(comment).ok_or(PatternError::MissingComment)?;
                request.status = RequestStatus::Rejected;
                request.rejection_comment = Some(comment);
            }
            Decision::Approve => {
                request.status = RequestStatus::Approved;
            }
        }

        request.approver_id = Some(approver_id.clone());
        request.decided_at = Some(now);
        self.patterns.update(request.clone())?;

        if request.status == RequestStatus::Approved {
            self.recompute_range(&request)?;
        }

        self.audit.append(Approval {
            target: ApprovalTarget::WorkPattern,
            target_id: request.id.clone(),
            resulting_status: request.status,
            approver_id: approver_id.clone(),
            comment: request.rejection_comment.clone(),
            decided_at: now,
        })?;

        info!(request = %request.id, status = request.status.label(), "work pattern change decided");
        Ok(request)
    }

    /// Re-derive every ledger record inside the pattern's date range.
    fn recompute_range(&self, request: &WorkPatternChangeRequest) -> Result<(), PatternError> {
        let mut date = request.start_date;
        while date <= request.end_date {
            let working = request.applies_on(date);
            let existing = self.attendance.fetch(&request.employee_id, date)?;

            if working {
                if let Some(mut record) = existing {
                    if record.has_clock_data() {
                        let schedule = request.as_schedule(true);
                        match (record.clock_in, record.clock_out) {
                            (Some(clock_in), Some(clock_out)) => {
                                let computed = metrics::compute(
                                    date,
                                    clock_in,
                                    clock_out,
                                    Some(record.break_minutes),
                                    &schedule,
                                )?;
                                record.break_minutes = computed.break_minutes;
                                record.late_minutes = computed.late_minutes;
                                record.early_leave_minutes = computed.early_leave_minutes;
                                record.overtime_minutes = computed.overtime_minutes;
                                record.night_shift_minutes = computed.night_shift_minutes;
                                record.status = metrics::classify(&computed);
                            }
                            (Some(clock_in), None) => {
                                record.clear_metrics();
                                record.late_minutes =
                                    metrics::late_minutes(schedule.start_on(date), clock_in);
                                record.status = if record.late_minutes > 0 {
                                    AttendanceStatus::Late
                                } else {
                                    AttendanceStatus::Normal
                                };
                            }
                            _ => {}
                        }
                        self.attendance.upsert(record)?;
                    }
                }
            } else {
                let mut record = existing.unwrap_or_else(|| {
                    AttendanceRecord::empty(request.employee_id.clone(), date)
                });
                record.clear_metrics();
                record.status = AttendanceStatus::Holiday;
                if !record.has_clock_data() {
                    record.break_minutes = 0;
                }
                self.attendance.upsert(record)?;
            }

            date += Duration::days(1);
        }
        Ok(())
    }
}

/// Error raised by the work-pattern workflow.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("work pattern request {0} not found")]
    RequestNotFound(RequestId),
    #[error("end date {end} precedes start date {start}")]
    DateOrder {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    #[error("end time {end} must be after start time {start}")]
    TimeOrder {
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },
    #[error("at least one weekday or the holiday flag must be set")]
    NoApplicableDay,
    #[error("break minutes must not be negative")]
    NegativeBreak,
    #[error("break of {break_minutes} minutes consumes the whole {span} minute span")]
    BreakExceedsSpan { break_minutes: i64, span: i64 },
    #[error("break of {break_minutes} minutes is below the required {required}")]
    InsufficientBreak { break_minutes: i64, required: i64 },
    #[error("date range overlaps active request {conflicting}")]
    Overlap { conflicting: RequestId },
    #[error("request {0} is not pending")]
    NotPending(RequestId),
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

impl Fault for PatternError {
    fn kind(&self) -> FaultKind {
        match self {
            PatternError::RequestNotFound(_) => FaultKind::NotFound,
            PatternError::NotPending(_) => FaultKind::InvalidState,
            PatternError::DateOrder { .. }
            | PatternError::TimeOrder { .. }
            | PatternError::NoApplicableDay
            | PatternError::NegativeBreak
            | PatternError::MissingComment => FaultKind::InvalidInput,
            PatternError::BreakExceedsSpan { .. }
            | PatternError::InsufficientBreak { .. }
            | PatternError::Overlap { .. } => FaultKind::RuleViolation,
            PatternError::Employee(err) => err.kind(),
            PatternError::Metrics(err) => err.kind(),
            PatternError::Repository(err) => err.kind(),
            PatternError::Audit(err) => err.kind(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            PatternError::RequestNotFound(_) => "pattern_not_found",
            PatternError::DateOrder { .. } => "date_order",
            PatternError::TimeOrder { .. } => "time_order",
            PatternError::NoApplicableDay => "no_applicable_day",
            PatternError::NegativeBreak => "negative_break",
            PatternError::BreakExceedsSpan { .. } => "break_exceeds_span",
            PatternError::InsufficientBreak { .. } => "insufficient_break",
            PatternError::Overlap { .. } => "pattern_overlap",
            PatternError::NotPending(_) => "request_not_pending",
            PatternError::MissingComment => "missing_comment",
            PatternError::Employee(err) => err.code(),
            PatternError::Metrics(err) => err.code(),
            PatternError::Repository(err) => err.code(),
            PatternError::Audit(err) => err.code(),
        }
    }
}
