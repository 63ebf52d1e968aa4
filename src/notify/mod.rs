use sqlx::MySqlPool;
use thiserror::Error;

use crate::model::employee::Employee;

#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Fire-and-forget notification sender; one call per recipient, failures are
/// isolated by the caller.
pub trait Notifier {
    async fn send(
        &self,
        employee: &Employee,
        title: &str,
        body: &str,
    ) -> Result<(), NotifyError>;
}

/// Stores notifications per employee; the employee-facing API reads them back
/// as an inbox.
#[derive(Clone)]
pub struct DbNotifier {
    pool: MySqlPool,
}

impl DbNotifier {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl Notifier for DbNotifier {
    async fn send(
        &self,
        employee: &Employee,
        title: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        sqlx::query("INSERT INTO notifications (employee_id, title, body) VALUES (?, ?, ?)")
            .bind(employee.id)
            .bind(title)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(|e| NotifyError(e.to_string()))?;
        Ok(())
    }
}
