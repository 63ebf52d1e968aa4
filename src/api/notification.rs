use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

use crate::auth::AuthUser;
use crate::model::notification::Notification;

/// Logged-in employee's notification inbox, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses((status = 200, description = "Own notifications", body = [Notification])),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn my_notifications(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT id, employee_id, title, body, created_at FROM notifications \
         WHERE employee_id = ? ORDER BY created_at DESC LIMIT 100",
    )
    .bind(auth.employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = auth.employee_id, "failed to fetch notifications");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(notifications))
}
