use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::AttendanceStatus;

/// Derived per-day event in the merged timeline. Never persisted; built fresh
/// by the calendar aggregator for each query window.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CalendarEvent {
    #[schema(example = "2026-03-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "On Leave")]
    pub title: String,
    pub status: AttendanceStatus,
}
