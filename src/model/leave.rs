use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
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
pub enum LeaveType {
    Sick,
    Casual,
    Unpaid,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
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
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// A leave request over an inclusive, closed date range. Approved and
/// rejected requests are immutable; the update statements guard on the
/// pending status.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-03", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    /// Approval chain: first-level manager decision.
    pub level1_status: LeaveStatus,
    /// Approval chain: second-level manager decision.
    pub level2_status: LeaveStatus,
    pub rejection_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
