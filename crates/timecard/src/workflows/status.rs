//! Request lifecycle status shared by all three approval workflows.

use serde::{Deserialize, Serialize};

/// High level status tracked by every request workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and approved requests reserve their slot.
    pub const fn is_active(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Approved)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Cancelled)
    }
}

/// Alias table consulted before strict label matching. Upstream systems have
/// historically sent abbreviated and localized status strings; the accepted
/// set is kept here as one reviewable constant.
pub const STATUS_ALIASES: &[(&str, RequestStatus)] = &[
    ("approve", RequestStatus::Approved),
    ("承認", RequestStatus::Approved),
    ("reject", RequestStatus::Rejected),
    ("denied", RequestStatus::Rejected),
    ("却下", RequestStatus::Rejected),
    ("cancel", RequestStatus::Cancelled),
    ("canceled", RequestStatus::Cancelled),
    ("取消", RequestStatus::Cancelled),
    ("キャンセル", RequestStatus::Cancelled),
    ("申請中", RequestStatus::Pending),
];

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_lowercase();

        if let Some((_, status)) = STATUS_ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
        {
            return Ok(*status);
        }

        [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ]
        .into_iter()
        .find(|status| status.label() == normalized)
        .ok_or_else(|| format!("unrecognized request status: {raw}"))
    }
}

/// The two terminal verdicts an approver can hand down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.parse::<RequestStatus>() {
            Ok(RequestStatus::Approved) => Ok(Decision::Approve),
            Ok(RequestStatus::Rejected) => Ok(Decision::Reject),
            _ => Err(format!("unrecognized decision: {raw}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_before_strict_labels() {
        assert_eq!("CANCEL".parse::<RequestStatus>(), Ok(RequestStatus::Cancelled));
        assert_eq!("取消".parse::<RequestStatus>(), Ok(RequestStatus::Cancelled));
        assert_eq!(
            "キャンセル".parse::<RequestStatus>(),
            Ok(RequestStatus::Cancelled)
        );
        assert_eq!("approved".parse::<RequestStatus>(), Ok(RequestStatus::Approved));
        assert!("resolved".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn decisions_reuse_the_alias_table() {
        assert_eq!("承認".parse::<Decision>(), Ok(Decision::Approve));
        assert_eq!("reject".parse::<Decision>(), Ok(Decision::Reject));
        assert!("pending".parse::<Decision>().is_err());
    }

    #[test]
    fn active_states_cover_pending_and_approved() {
        assert!(RequestStatus::Pending.is_active());
        assert!(RequestStatus::Approved.is_active());
        assert!(!RequestStatus::Rejected.is_active());
        assert!(RequestStatus::Cancelled.is_terminal());
    }
}
