pub mod mysql;

#[cfg(test)]
pub mod memory;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::model::attendance::{AttendanceRecord, NewAttendance};
use crate::model::employee::Employee;
use crate::model::leave::LeaveRequest;

pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-key violation; for attendance this means the insert lost the
    /// (employee, date) race and the surviving record should be re-read.
    #[error("duplicate key")]
    Duplicate,

    /// The targeted row is gone or no longer in the expected state.
    #[error("row not found or already updated")]
    RowNotFound,

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            // MySQL reports unique-key violations under SQLSTATE 23000.
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(e)
    }
}

/// Record-store contract consumed by the resolver, the calendar aggregator and
/// the scheduled jobs. One production implementation ([`MySqlStore`]) and one
/// in-memory implementation for tests.
pub trait Store {
    async fn attendance_for_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Inserts a new day record. Returns [`StoreError::Duplicate`] when a
    /// record for the same (employee, date) already exists; uniqueness is
    /// enforced by the storage layer, not by check-then-insert.
    async fn insert_attendance(
        &self,
        new: NewAttendance,
    ) -> Result<AttendanceRecord, StoreError>;

    /// Closes an open record. No-op guard: only applies when `check_out` is
    /// still unset, otherwise [`StoreError::RowNotFound`].
    async fn close_attendance(
        &self,
        id: u64,
        check_out: DateTime<Utc>,
        total_worked: &str,
    ) -> Result<AttendanceRecord, StoreError>;

    async fn attendance_in_window(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Records on `date` with a check-in but no check-out, for the end-of-day
    /// forced-checkout job.
    async fn open_attendance_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn approved_leave_covering(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<LeaveRequest>, StoreError>;

    async fn leaves_overlapping(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveRequest>, StoreError>;

    /// Active, non-administrative employees, for the daily reporting job.
    async fn active_employees(&self) -> Result<Vec<Employee>, StoreError>;
}
