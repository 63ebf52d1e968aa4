use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Day classification for one employee. Exactly one applies per employee per
/// day in the merged timeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    WeeklyOff,
    OnLeave,
    PendingLeave,
    LeaveRejected,
    Holiday,
}

impl AttendanceStatus {
    /// Human label used by the calendar and the daily report.
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::WeeklyOff => "Weekly Off",
            AttendanceStatus::OnLeave => "On Leave",
            AttendanceStatus::PendingLeave => "Leave Pending",
            AttendanceStatus::LeaveRejected => "Leave Rejected",
            AttendanceStatus::Holiday => "Holiday",
        }
    }
}

/// One attendance row. At most one exists per (employee, date); the store
/// enforces this with a unique key, not a check-then-insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    /// Civil date in the configured timezone.
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    /// Minutes past the official start, formatted "{h}h {m}m".
    #[schema(example = "0h 5m")]
    pub late_time: String,
    /// Set on check-out, formatted "{h}h {m}m".
    #[schema(example = "8h 25m", nullable = true)]
    pub total_worked: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AttendanceRecord {
    pub fn is_closed(&self) -> bool {
        self.check_out.is_some()
    }
}

/// Insert payload produced by the resolver; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub late_time: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
