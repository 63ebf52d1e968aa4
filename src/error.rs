use actix_web::{HttpResponse, http::StatusCode};
use thiserror::Error;

use crate::store::StoreError;

/// Error taxonomy for the attendance core. Handlers return the specific kind;
/// batch jobs catch per-item failures and only report counts.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or malformed input, e.g. a required position that was not sent.
    #[error("{0}")]
    Validation(String),

    /// The record the operation needs does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The operation was already applied (double check-out, lost insert race).
    #[error("{0}")]
    Conflict(String),

    /// Input was well-formed but rejected by policy (e.g. out of office range).
    #[error("{0}")]
    Policy(String),

    /// Transient persistence failure; safe for the caller to retry.
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl actix_web::ResponseError for CoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::Policy(_) => StatusCode::FORBIDDEN,
            CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Do not leak driver details for storage failures.
        let message = match self {
            CoreError::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": message
        }))
    }
}
