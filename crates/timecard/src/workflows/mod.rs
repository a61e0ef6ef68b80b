//! Workflow areas of the engine and the plumbing they share.

pub mod attendance;
pub mod audit;
pub mod employee;
pub(crate) mod http;
pub mod leave;
pub mod memory;
pub mod schedule;
pub mod status;

use serde::{Deserialize, Serialize};

use crate::fault::{Fault, FaultKind};

/// Identifier wrapper for workflow requests and grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error enumeration for repository failures.
///
/// Writes touching the same ledger or balance key must be serialized by the
/// backing store; the duplicate-request validations in the services are
/// read-then-write sequences and rely on that serialization.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl Fault for RepositoryError {
    fn kind(&self) -> FaultKind {
        match self {
            RepositoryError::Conflict => FaultKind::RuleViolation,
            RepositoryError::NotFound => FaultKind::NotFound,
            RepositoryError::Unavailable(_) => FaultKind::Internal,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RepositoryError::Conflict => "storage_conflict",
            RepositoryError::NotFound => "storage_not_found",
            RepositoryError::Unavailable(_) => "storage_unavailable",
        }
    }
}
