use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::model::holiday::{Holiday, HolidayKind};
use crate::policy::PolicyHandle;
use crate::store::MySqlStore;

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "2026-12-25", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "custom")]
    pub kind: HolidayKind,
    #[schema(example = "Christmas Day")]
    pub title: String,
}

/// Reload the holiday calendar into the shared time policy after a change.
/// The swap is atomic; in-flight requests keep the policy they started with.
async fn refresh_policy(store: &MySqlStore, policy: &PolicyHandle) {
    match store.load_holidays().await {
        Ok(holidays) => policy.replace_holidays(holidays),
        Err(e) => tracing::warn!(error = %e, "holiday change saved but policy reload failed"),
    }
}

/// List holidays
#[utoipa::path(
    get,
    path = "/api/holiday",
    responses((status = 200, description = "All configured holidays", body = [Holiday])),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn list_holidays(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let holidays =
        sqlx::query_as::<_, Holiday>("SELECT id, date, kind, title FROM holidays ORDER BY date")
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to fetch holidays");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    Ok(HttpResponse::Ok().json(holidays))
}

/// Add a holiday (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/holiday",
    request_body(content = CreateHoliday, content_type = "application/json"),
    responses(
        (status = 201, description = "Holiday added"),
        (status = 409, description = "A holiday already exists on that date"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn create_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    store: web::Data<MySqlStore>,
    policy: web::Data<PolicyHandle>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query("INSERT INTO holidays (date, kind, title) VALUES (?, ?, ?)")
        .bind(payload.date)
        .bind(payload.kind)
        .bind(&payload.title)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            refresh_policy(&store, &policy).await;
            Ok(HttpResponse::Created().json(serde_json::json!({
                "message": "Holiday added successfully"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(serde_json::json!({
                        "message": "A holiday already exists on that date"
                    })));
                }
            }
            tracing::error!(error = %e, "failed to add holiday");
            Err(actix_web::error::ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Delete a holiday (HR/Admin)
#[utoipa::path(
    delete,
    path = "/api/holiday/{holiday_id}",
    params(("holiday_id" = u64, Path, description = "Holiday to delete")),
    responses(
        (status = 200, description = "Holiday deleted"),
        (status = 404, description = "Holiday not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn delete_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    store: web::Data<MySqlStore>,
    policy: web::Data<PolicyHandle>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let holiday_id = path.into_inner();

    let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
        .bind(holiday_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, holiday_id, "failed to delete holiday");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Holiday not found"
        })));
    }

    refresh_policy(&store, &policy).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Holiday deleted successfully"
    })))
}
