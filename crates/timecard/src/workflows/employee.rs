//! Employee identity collaborator.
//!
//! Credential handling and account management live outside the engine; the
//! workflows only need to know whether an employee exists and is active.

use serde::{Deserialize, Serialize};

use super::RepositoryError;

/// Identifier wrapper for employees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory snapshot of one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub id: EmployeeId,
    pub display_name: String,
    pub active: bool,
}

/// Lookup seam to whatever system owns the employee roster.
pub trait EmployeeDirectory: Send + Sync {
    fn find(&self, id: &EmployeeId) -> Result<Option<EmployeeProfile>, RepositoryError>;
}

/// Fetch a profile and demand that it is active.
pub(crate) fn require_active<D: EmployeeDirectory>(
    directory: &D,
    id: &EmployeeId,
) -> Result<EmployeeProfile, EmployeeGateError> {
    match directory.find(id)? {
        Some(profile) if profile.active => Ok(profile),
        Some(_) => Err(EmployeeGateError::Inactive(id.clone())),
        None => Err(EmployeeGateError::NotFound(id.clone())),
    }
}

/// Failures raised by the active-employee gate shared by every workflow.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeGateError {
    #[error("employee {0} not found")]
    NotFound(EmployeeId),
    #[error("employee {0} is retired or inactive")]
    Inactive(EmployeeId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl crate::fault::Fault for EmployeeGateError {
    fn kind(&self) -> crate::fault::FaultKind {
        match self {
            EmployeeGateError::NotFound(_) => crate::fault::FaultKind::NotFound,
            EmployeeGateError::Inactive(_) => crate::fault::FaultKind::InvalidState,
            EmployeeGateError::Repository(err) => err.kind(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            EmployeeGateError::NotFound(_) => "employee_not_found",
            EmployeeGateError::Inactive(_) => "employee_inactive",
            EmployeeGateError::Repository(err) => err.code(),
        }
    }
}
