use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::workflows::employee::EmployeeId;
use crate::workflows::status::RequestStatus;
use crate::workflows::RequestId;

/// Daily outcome classification stored on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Normal,
    Late,
    EarlyLeave,
    LateAndEarlyLeave,
    Overtime,
    NightShift,
    Absent,
    Holiday,
}

impl AttendanceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Normal => "normal",
            AttendanceStatus::Late => "late",
            AttendanceStatus::EarlyLeave => "early_leave",
            AttendanceStatus::LateAndEarlyLeave => "late_and_early_leave",
            AttendanceStatus::Overtime => "overtime",
            AttendanceStatus::NightShift => "night_shift",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Holiday => "holiday",
        }
    }
}

/// The mutable ledger record for one employee on one date.
///
/// Created lazily on the first clock event or on workflow approval; never
/// deleted. Correction history lives on the adjustment requests, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub clock_in: Option<NaiveDateTime>,
    pub clock_out: Option<NaiveDateTime>,
    pub break_minutes: i64,
    pub late_minutes: i64,
    pub early_leave_minutes: i64,
    pub overtime_minutes: i64,
    pub night_shift_minutes: i64,
    pub status: AttendanceStatus,
    /// Once set, clock events and adjustments against this date are refused.
    pub finalized: bool,
}

impl AttendanceRecord {
    pub fn empty(employee_id: EmployeeId, date: NaiveDate) -> Self {
        Self {
            employee_id,
            date,
            clock_in: None,
            clock_out: None,
            break_minutes: 0,
            late_minutes: 0,
            early_leave_minutes: 0,
            overtime_minutes: 0,
            night_shift_minutes: 0,
            status: AttendanceStatus::Absent,
            finalized: false,
        }
    }

    pub fn has_clock_data(&self) -> bool {
        self.clock_in.is_some() || self.clock_out.is_some()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            break_minutes: self.break_minutes,
        }
    }

    /// Zero every derived minute field.
    pub fn clear_metrics(&mut self) {
        self.late_minutes = 0;
        self.early_leave_minutes = 0;
        self.overtime_minutes = 0;
        self.night_shift_minutes = 0;
    }
}

/// Clock values captured before an adjustment touches the ledger, used to
/// reverse an approved adjustment exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub clock_in: Option<NaiveDateTime>,
    pub clock_out: Option<NaiveDateTime>,
    pub break_minutes: i64,
}

/// Inbound fields for a time-correction proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentSubmission {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub clock_in: NaiveDateTime,
    pub clock_out: NaiveDateTime,
    pub break_minutes: Option<i64>,
    pub reason: String,
}

/// A correction proposal for a single date's clock data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    pub id: RequestId,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub proposed_clock_in: NaiveDateTime,
    pub proposed_clock_out: NaiveDateTime,
    pub proposed_break_minutes: Option<i64>,
    pub reason: String,
    pub status: RequestStatus,
    /// Ledger values at submission time; `None` when no record existed yet.
    pub prior: Option<LedgerSnapshot>,
    pub approver_id: Option<EmployeeId>,
    pub decided_at: Option<NaiveDateTime>,
    pub rejection_comment: Option<String>,
}
