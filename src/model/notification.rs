use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored per-employee notification, the delivery channel of the daily
/// reporting job.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Notification {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "Daily attendance")]
    pub title: String,
    #[schema(example = "John Doe, your status for 2026-03-02 is: Present")]
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}
