use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflows::employee::EmployeeId;
use crate::workflows::status::RequestStatus;
use crate::workflows::RequestId;

/// The leave categories the ledger tracks, one independent balance each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Statutory paid leave; carries a perpetual balance.
    Paid,
    /// Seasonal allowance granted for a window (e.g. summer days).
    Seasonal,
    /// Special-occasion leave granted case by case.
    Special,
}

impl LeaveType {
    pub const fn label(self) -> &'static str {
        match self {
            LeaveType::Paid => "paid",
            LeaveType::Seasonal => "seasonal",
            LeaveType::Special => "special",
        }
    }

    /// Only paid leave may be taken in half-day units.
    pub const fn allows_half_day(self) -> bool {
        matches!(self, LeaveType::Paid)
    }

    /// Paid leave requests must state a reason.
    pub const fn requires_reason(self) -> bool {
        matches!(self, LeaveType::Paid)
    }

    /// Non-perpetual types need at least one unexpired grant to draw from.
    pub const fn requires_active_grant(self) -> bool {
        !matches!(self, LeaveType::Paid)
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for LeaveType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "paid" | "annual" => Ok(LeaveType::Paid),
            "seasonal" | "summer" => Ok(LeaveType::Seasonal),
            "special" => Ok(LeaveType::Special),
            _ => Err(format!("unrecognized leave type: {raw}")),
        }
    }
}

/// Granularity of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveTimeUnit {
    FullDay,
    HalfAm,
    HalfPm,
}

impl LeaveTimeUnit {
    pub const fn label(self) -> &'static str {
        match self {
            LeaveTimeUnit::FullDay => "full_day",
            LeaveTimeUnit::HalfAm => "half_am",
            LeaveTimeUnit::HalfPm => "half_pm",
        }
    }

    pub const fn is_half_day(self) -> bool {
        matches!(self, LeaveTimeUnit::HalfAm | LeaveTimeUnit::HalfPm)
    }
}

impl std::str::FromStr for LeaveTimeUnit {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full_day" | "full" => Ok(LeaveTimeUnit::FullDay),
            "half_am" | "am" => Ok(LeaveTimeUnit::HalfAm),
            "half_pm" | "pm" => Ok(LeaveTimeUnit::HalfPm),
            _ => Err(format!("unrecognized leave time unit: {raw}")),
        }
    }
}

/// Inbound fields for a leave grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantSubmission {
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    /// May be negative for corrective grants.
    pub days: Decimal,
    pub granted_on: NaiveDate,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
    pub granted_by: EmployeeId,
}

/// An immutable addition to an employee's balance, optionally expiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveGrant {
    pub id: RequestId,
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub days: Decimal,
    pub granted_on: NaiveDate,
    pub expires_at: Option<NaiveDate>,
    pub granted_by: EmployeeId,
}

impl LeaveGrant {
    /// Whether the grant still counts toward the active balance.
    pub fn active_on(&self, today: NaiveDate) -> bool {
        self.expires_at.map_or(true, |expiry| expiry >= today)
    }
}

/// Inbound fields for a leave proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveSubmission {
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub time_unit: LeaveTimeUnit,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A leave proposal travelling through the approval workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: RequestId,
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub time_unit: LeaveTimeUnit,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Computed at submission, never supplied by the caller.
    pub requested_days: Decimal,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub approver_id: Option<EmployeeId>,
    pub decided_at: Option<NaiveDateTime>,
    pub rejection_comment: Option<String>,
}

impl LeaveRequest {
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}
