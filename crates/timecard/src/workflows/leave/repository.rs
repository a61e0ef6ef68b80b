use super::balance::LeaveBalance;
use super::domain::{LeaveGrant, LeaveRequest, LeaveType};
use crate::workflows::employee::EmployeeId;
use crate::workflows::{RepositoryError, RequestId};

/// Storage abstraction for balances, grants, and leave requests.
///
/// Balance writes must be serialized per (employee, leave type) key by the
/// backing store; availability reads may run uncoordinated.
pub trait LeaveRepository: Send + Sync {
    fn balance(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<Option<LeaveBalance>, RepositoryError>;

    fn save_balance(&self, balance: LeaveBalance) -> Result<(), RepositoryError>;

    fn balances_for(&self, employee_id: &EmployeeId) -> Result<Vec<LeaveBalance>, RepositoryError>;

    fn insert_grant(&self, grant: LeaveGrant) -> Result<LeaveGrant, RepositoryError>;

    fn grants_for(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<Vec<LeaveGrant>, RepositoryError>;

    fn insert_request(&self, request: LeaveRequest) -> Result<LeaveRequest, RepositoryError>;

    fn update_request(&self, request: LeaveRequest) -> Result<(), RepositoryError>;

    fn fetch_request(&self, id: &RequestId) -> Result<Option<LeaveRequest>, RepositoryError>;

    /// All PENDING or APPROVED requests for the employee, any leave type.
    fn active_requests_for(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, RepositoryError>;

    /// PENDING requests for one (employee, leave type).
    fn pending_requests_for(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<Vec<LeaveRequest>, RepositoryError>;
}
