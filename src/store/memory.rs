//! In-memory store used by the unit tests. Mirrors the uniqueness and
//! closed-row guards of the MySQL implementation.

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::attendance::{AttendanceRecord, NewAttendance};
use crate::model::employee::Employee;
use crate::model::leave::{LeaveRequest, LeaveStatus};
use crate::store::{Store, StoreError};

#[derive(Default)]
struct Inner {
    attendance: Vec<AttendanceRecord>,
    leaves: Vec<LeaveRequest>,
    employees: Vec<Employee>,
    next_id: u64,
    /// When set, every write fails with a database error. Lets job tests
    /// exercise per-item failure isolation.
    fail_writes: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: Vec<Employee>) -> Self {
        let store = Self::new();
        store.lock().employees = employees;
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn push_leave(&self, leave: LeaveRequest) {
        self.lock().leaves.push(leave);
    }

    pub fn push_attendance(&self, record: AttendanceRecord) {
        self.lock().attendance.push(record);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn attendance_snapshot(&self) -> Vec<AttendanceRecord> {
        self.lock().attendance.clone()
    }
}

fn write_failure() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

impl Store for MemoryStore {
    async fn attendance_for_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self
            .lock()
            .attendance
            .iter()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    async fn insert_attendance(
        &self,
        new: NewAttendance,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(write_failure());
        }
        if inner
            .attendance
            .iter()
            .any(|r| r.employee_id == new.employee_id && r.date == new.date)
        {
            return Err(StoreError::Duplicate);
        }

        inner.next_id += 1;
        let record = AttendanceRecord {
            id: inner.next_id,
            employee_id: new.employee_id,
            date: new.date,
            check_in: new.check_in,
            check_out: None,
            status: new.status,
            late_time: new.late_time,
            total_worked: None,
            latitude: new.latitude,
            longitude: new.longitude,
        };
        inner.attendance.push(record.clone());
        Ok(record)
    }

    async fn close_attendance(
        &self,
        id: u64,
        check_out: DateTime<Utc>,
        total_worked: &str,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(write_failure());
        }
        let record = inner
            .attendance
            .iter_mut()
            .find(|r| r.id == id && r.check_out.is_none())
            .ok_or(StoreError::RowNotFound)?;

        record.check_out = Some(check_out);
        record.total_worked = Some(total_worked.to_string());
        Ok(record.clone())
    }

    async fn attendance_in_window(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut records: Vec<_> = self
            .lock()
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= from && r.date <= to)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    async fn open_attendance_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self
            .lock()
            .attendance
            .iter()
            .filter(|r| r.date == date && r.check_in.is_some() && r.check_out.is_none())
            .cloned()
            .collect())
    }

    async fn approved_leave_covering(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self
            .lock()
            .leaves
            .iter()
            .find(|l| {
                l.employee_id == employee_id
                    && l.status == LeaveStatus::Approved
                    && l.covers(date)
            })
            .cloned())
    }

    async fn leaves_overlapping(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let mut leaves: Vec<_> = self
            .lock()
            .leaves
            .iter()
            .filter(|l| l.employee_id == employee_id && l.start_date <= to && l.end_date >= from)
            .cloned()
            .collect();
        leaves.sort_by_key(|l| l.start_date);
        Ok(leaves)
    }

    async fn active_employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self
            .lock()
            .employees
            .iter()
            .filter(|e| e.status == "active" && e.role_id != 1)
            .cloned()
            .collect())
    }
}
