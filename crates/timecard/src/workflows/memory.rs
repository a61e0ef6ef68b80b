//! In-memory repository implementations.
//!
//! These back the test suites, the demo command, and the default server
//! wiring. Every store is a mutex-guarded map, which gives the per-key
//! write serialization the workflows rely on within one process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use super::attendance::domain::{AdjustmentRequest, AttendanceRecord};
use super::attendance::repository::{AdjustmentRepository, AttendanceRepository};
use super::audit::{Approval, ApprovalLog, AuditError};
use super::employee::{EmployeeDirectory, EmployeeId, EmployeeProfile};
use super::leave::balance::LeaveBalance;
use super::leave::domain::{LeaveGrant, LeaveRequest, LeaveType};
use super::leave::repository::LeaveRepository;
use super::schedule::domain::WorkPatternChangeRequest;
use super::schedule::repository::PatternRepository;
use super::status::RequestStatus;
use super::{RepositoryError, RequestId};

#[derive(Default, Clone)]
pub struct InMemoryAttendanceRepository {
    records: Arc<Mutex<HashMap<(EmployeeId, NaiveDate), AttendanceRecord>>>,
}

impl AttendanceRepository for InMemoryAttendanceRepository {
    fn upsert(&self, record: AttendanceRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("attendance mutex poisoned");
        guard.insert((record.employee_id.clone(), record.date), record);
        Ok(())
    }

    fn fetch(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("attendance mutex poisoned");
        Ok(guard.get(&(employee_id.clone(), date)).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryAdjustmentRepository {
    requests: Arc<Mutex<HashMap<RequestId, AdjustmentRequest>>>,
}

impl AdjustmentRepository for InMemoryAdjustmentRepository {
    fn insert(&self, request: AdjustmentRequest) -> Result<AdjustmentRequest, RepositoryError> {
        let mut guard = self.requests.lock().expect("adjustment mutex poisoned");
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: AdjustmentRequest) -> Result<(), RepositoryError> {
        let mut guard = self.requests.lock().expect("adjustment mutex poisoned");
        if guard.contains_key(&request.id) {
            guard.insert(request.id.clone(), request);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<AdjustmentRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("adjustment mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_for_date(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Vec<AdjustmentRequest>, RepositoryError> {
        self.active_in_range(employee_id, date, date)
    }

    fn active_in_range(
        &self,
        employee_id: &EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AdjustmentRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("adjustment mutex poisoned");
        Ok(guard
            .values()
            .filter(|request| {
                request.employee_id == *employee_id
                    && request.status.is_active()
                    && start <= request.date
                    && request.date <= end
            })
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryPatternRepository {
    requests: Arc<Mutex<HashMap<RequestId, WorkPatternChangeRequest>>>,
}

impl PatternRepository for InMemoryPatternRepository {
    fn insert(
        &self,
        request: WorkPatternChangeRequest,
    ) -> Result<WorkPatternChangeRequest, RepositoryError> {
        let mut guard = self.requests.lock().expect("pattern mutex poisoned");
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: WorkPatternChangeRequest) -> Result<(), RepositoryError> {
        let mut guard = self.requests.lock().expect("pattern mutex poisoned");
        if guard.contains_key(&request.id) {
            guard.insert(request.id.clone(), request);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<WorkPatternChangeRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("pattern mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<WorkPatternChangeRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("pattern mutex poisoned");
        Ok(guard
            .values()
            .filter(|request| request.employee_id == *employee_id && request.status.is_active())
            .cloned()
            .collect())
    }

    fn approved_covering(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<WorkPatternChangeRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("pattern mutex poisoned");
        Ok(guard
            .values()
            .find(|request| {
                request.employee_id == *employee_id
                    && request.status == RequestStatus::Approved
                    && request.covers(date)
            })
            .cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryLeaveRepository {
    balances: Arc<Mutex<HashMap<(EmployeeId, LeaveType), LeaveBalance>>>,
    grants: Arc<Mutex<Vec<LeaveGrant>>>,
    requests: Arc<Mutex<HashMap<RequestId, LeaveRequest>>>,
}

impl LeaveRepository for InMemoryLeaveRepository {
    fn balance(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<Option<LeaveBalance>, RepositoryError> {
        let guard = self.balances.lock().expect("balance mutex poisoned");
        Ok(guard.get(&(employee_id.clone(), leave_type)).cloned())
    }

    fn save_balance(&self, balance: LeaveBalance) -> Result<(), RepositoryError> {
        let mut guard = self.balances.lock().expect("balance mutex poisoned");
        guard.insert((balance.employee_id.clone(), balance.leave_type), balance);
        Ok(())
    }

    fn balances_for(&self, employee_id: &EmployeeId) -> Result<Vec<LeaveBalance>, RepositoryError> {
        let guard = self.balances.lock().expect("balance mutex poisoned");
        Ok(guard
            .values()
            .filter(|balance| balance.employee_id == *employee_id)
            .cloned()
            .collect())
    }

    fn insert_grant(&self, grant: LeaveGrant) -> Result<LeaveGrant, RepositoryError> {
        let mut guard = self.grants.lock().expect("grant mutex poisoned");
        guard.push(grant.clone());
        Ok(grant)
    }

    fn grants_for(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<Vec<LeaveGrant>, RepositoryError> {
        let guard = self.grants.lock().expect("grant mutex poisoned");
        Ok(guard
            .iter()
            .filter(|grant| grant.employee_id == *employee_id && grant.leave_type == leave_type)
            .cloned()
            .collect())
    }

    fn insert_request(&self, request: LeaveRequest) -> Result<LeaveRequest, RepositoryError> {
        let mut guard = self.requests.lock().expect("leave request mutex poisoned");
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn update_request(&self, request: LeaveRequest) -> Result<(), RepositoryError> {
        let mut guard = self.requests.lock().expect("leave request mutex poisoned");
        if guard.contains_key(&request.id) {
            guard.insert(request.id.clone(), request);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_request(&self, id: &RequestId) -> Result<Option<LeaveRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("leave request mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_requests_for(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("leave request mutex poisoned");
        Ok(guard
            .values()
            .filter(|request| request.employee_id == *employee_id && request.status.is_active())
            .cloned()
            .collect())
    }

    fn pending_requests_for(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<Vec<LeaveRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("leave request mutex poisoned");
        Ok(guard
            .values()
            .filter(|request| {
                request.employee_id == *employee_id
                    && request.leave_type == leave_type
                    && request.status == RequestStatus::Pending
            })
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryEmployeeDirectory {
    profiles: Arc<Mutex<HashMap<EmployeeId, EmployeeProfile>>>,
}

impl InMemoryEmployeeDirectory {
    pub fn register(&self, profile: EmployeeProfile) {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        guard.insert(profile.id.clone(), profile);
    }

    pub fn deactivate(&self, id: &EmployeeId) {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        if let Some(profile) = guard.get_mut(id) {
            profile.active = false;
        }
    }
}

impl EmployeeDirectory for InMemoryEmployeeDirectory {
    fn find(&self, id: &EmployeeId) -> Result<Option<EmployeeProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryApprovalLog {
    entries: Arc<Mutex<Vec<Approval>>>,
}

impl InMemoryApprovalLog {
    pub fn entries(&self) -> Vec<Approval> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl ApprovalLog for InMemoryApprovalLog {
    fn append(&self, approval: Approval) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(approval);
        Ok(())
    }
}
