use chrono::NaiveDate;

use super::domain::{AdjustmentRequest, AttendanceRecord};
use crate::workflows::employee::EmployeeId;
use crate::workflows::{RepositoryError, RequestId};

/// Storage abstraction for the attendance ledger.
///
/// `upsert` must be serialized per (employee, date) key by the backing
/// store; the workflows read, validate, and write back in one unit of work.
pub trait AttendanceRepository: Send + Sync {
    fn upsert(&self, record: AttendanceRecord) -> Result<(), RepositoryError>;

    fn fetch(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepositoryError>;
}

/// Storage abstraction for adjustment requests.
pub trait AdjustmentRepository: Send + Sync {
    fn insert(&self, request: AdjustmentRequest) -> Result<AdjustmentRequest, RepositoryError>;

    fn update(&self, request: AdjustmentRequest) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &RequestId) -> Result<Option<AdjustmentRequest>, RepositoryError>;

    /// PENDING or APPROVED requests for one (employee, date) slot.
    fn active_for_date(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Vec<AdjustmentRequest>, RepositoryError>;

    /// PENDING or APPROVED requests whose date falls inside [start, end].
    fn active_in_range(
        &self,
        employee_id: &EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AdjustmentRequest>, RepositoryError>;
}
