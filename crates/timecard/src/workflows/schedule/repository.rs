use chrono::NaiveDate;

use super::domain::WorkPatternChangeRequest;
use crate::workflows::employee::EmployeeId;
use crate::workflows::{RepositoryError, RequestId};

/// Storage abstraction for schedule-override requests.
pub trait PatternRepository: Send + Sync {
    fn insert(
        &self,
        request: WorkPatternChangeRequest,
    ) -> Result<WorkPatternChangeRequest, RepositoryError>;

    fn update(&self, request: WorkPatternChangeRequest) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &RequestId) -> Result<Option<WorkPatternChangeRequest>, RepositoryError>;

    /// All PENDING or APPROVED requests for the employee.
    fn active_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<WorkPatternChangeRequest>, RepositoryError>;

    /// The APPROVED request whose date range contains `date`, if any.
    fn approved_covering(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<WorkPatternChangeRequest>, RepositoryError>;
}
