//! Leave accounting: the per-type balance ledger, grants, and the leave
//! request workflow.

pub mod balance;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use balance::{BalanceSummary, LeaveBalance};
pub use domain::{GrantSubmission, LeaveGrant, LeaveRequest, LeaveSubmission, LeaveTimeUnit, LeaveType};
pub use repository::LeaveRepository;
pub use router::leave_router;
pub use service::{LeaveError, LeaveService};
