use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

use crate::api::AppService;
use crate::auth::AuthUser;

/// Dashboard analytics (HR/Admin): headcount present today, pending leave
/// requests and active employees.
#[utoipa::path(
    get,
    path = "/api/dashboard/analytics",
    responses(
        (status = 200, description = "Aggregate counts", body = Object, example = json!({
            "present_today": 42,
            "pending_leaves": 3,
            "active_employees": 57
        })),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn analytics(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    service: web::Data<AppService>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let policy = service.policy().current();
    let today = policy.civil_date(chrono::Utc::now());

    let present_today = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE date = ? AND status IN ('present', 'late')",
    )
    .bind(today)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "failed to count present employees");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let pending_leaves = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "failed to count pending leaves");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let active_employees = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM employees WHERE status = 'active' AND role_id <> 1",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "failed to count active employees");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "present_today": present_today,
        "pending_leaves": pending_leaves,
        "active_employees": active_employees
    })))
}
