//! Append-only audit trail of approval decisions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::employee::EmployeeId;
use super::status::RequestStatus;
use super::RequestId;

/// Which workflow a decision belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalTarget {
    Adjustment,
    Leave,
    WorkPattern,
}

impl ApprovalTarget {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalTarget::Adjustment => "adjustment",
            ApprovalTarget::Leave => "leave",
            ApprovalTarget::WorkPattern => "work_pattern",
        }
    }
}

/// One decision, written once per transition and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub target: ApprovalTarget,
    pub target_id: RequestId,
    pub resulting_status: RequestStatus,
    pub approver_id: EmployeeId,
    pub comment: Option<String>,
    pub decided_at: NaiveDateTime,
}

/// Sink for audit entries (database table, event stream, ...).
pub trait ApprovalLog: Send + Sync {
    fn append(&self, approval: Approval) -> Result<(), AuditError>;
}

/// Audit dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

impl crate::fault::Fault for AuditError {
    fn kind(&self) -> crate::fault::FaultKind {
        crate::fault::FaultKind::Internal
    }

    fn code(&self) -> &'static str {
        "audit_unavailable"
    }
}
