use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use crate::model::attendance::{AttendanceRecord, NewAttendance};
use crate::model::employee::Employee;
use crate::model::holiday::Holiday;
use crate::model::leave::LeaveRequest;
use crate::store::{Store, StoreError};

const ATTENDANCE_COLS: &str =
    "id, employee_id, date, check_in, check_out, status, late_time, total_worked, latitude, longitude";

const LEAVE_COLS: &str = "id, employee_id, leave_type, start_date, end_date, reason, status, \
     level1_status, level2_status, rejection_reason, created_at";

const EMPLOYEE_COLS: &str =
    "id, employee_code, first_name, last_name, email, role_id, hire_date, status";

/// SQLx-backed record store. Each call is one bounded statement on the pool;
/// no transaction spans more than a single row, so batch jobs can be aborted
/// between items without corrupting state.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn attendance_by_id(&self, id: u64) -> Result<AttendanceRecord, StoreError> {
        let sql = format!("SELECT {ATTENDANCE_COLS} FROM attendance WHERE id = ?");
        sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::RowNotFound)
    }

    /// Full holiday calendar as date -> title, for the time policy.
    pub async fn load_holidays(&self) -> Result<BTreeMap<NaiveDate, String>, StoreError> {
        let holidays =
            sqlx::query_as::<_, Holiday>("SELECT id, date, kind, title FROM holidays")
                .fetch_all(&self.pool)
                .await?;

        Ok(holidays.into_iter().map(|h| (h.date, h.title)).collect())
    }
}

impl Store for MySqlStore {
    async fn attendance_for_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let sql =
            format!("SELECT {ATTENDANCE_COLS} FROM attendance WHERE employee_id = ? AND date = ?");
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_attendance(
        &self,
        new: NewAttendance,
    ) -> Result<AttendanceRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
                (employee_id, date, check_in, status, late_time, latitude, longitude)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.date)
        .bind(new.check_in)
        .bind(new.status)
        .bind(&new.late_time)
        .bind(new.latitude)
        .bind(new.longitude)
        .execute(&self.pool)
        .await?;

        self.attendance_by_id(result.last_insert_id()).await
    }

    async fn close_attendance(
        &self,
        id: u64,
        check_out: DateTime<Utc>,
        total_worked: &str,
    ) -> Result<AttendanceRecord, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_out = ?, total_worked = ?
            WHERE id = ? AND check_out IS NULL
            "#,
        )
        .bind(check_out)
        .bind(total_worked)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound);
        }

        self.attendance_by_id(id).await
    }

    async fn attendance_in_window(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLS} FROM attendance \
             WHERE employee_id = ? AND date BETWEEN ? AND ? ORDER BY date"
        );
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn open_attendance_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLS} FROM attendance \
             WHERE date = ? AND check_in IS NOT NULL AND check_out IS NULL"
        );
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn approved_leave_covering(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        let sql = format!(
            "SELECT {LEAVE_COLS} FROM leave_requests \
             WHERE employee_id = ? AND status = 'approved' \
             AND start_date <= ? AND end_date >= ? LIMIT 1"
        );
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .bind(date)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn leaves_overlapping(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = format!(
            "SELECT {LEAVE_COLS} FROM leave_requests \
             WHERE employee_id = ? AND start_date <= ? AND end_date >= ? \
             ORDER BY start_date"
        );
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .bind(to)
            .bind(from)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn active_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLS} FROM employees \
             WHERE status = 'active' AND role_id <> 1 ORDER BY id"
        );
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }
}
