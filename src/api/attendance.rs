use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::AppService;
use crate::auth::AuthUser;
use crate::core::service::CheckInOutcome;
use crate::model::attendance::AttendanceRecord;
use crate::policy::GeoPoint;

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = 23.8103)]
    pub latitude: Option<f64>,
    #[schema(example = 90.4125)]
    pub longitude: Option<f64>,
}

impl CheckInRequest {
    fn position(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

#[derive(Deserialize, IntoParams)]
pub struct CalendarQuery {
    /// Window start (inclusive)
    pub from: NaiveDate,
    /// Window end (inclusive)
    pub to: NaiveDate,
    /// Another employee's calendar; requires HR/Admin
    pub employee_id: Option<u64>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body(content = CheckInRequest, content_type = "application/json"),
    responses(
        (status = 201, description = "Attendance marked", body = AttendanceRecord),
        (status = 200, description = "Already marked or on leave"),
        (status = 400, description = "Missing or invalid location"),
        (status = 403, description = "Outside office range"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    service: web::Data<AppService>,
    payload: Option<web::Json<CheckInRequest>>,
) -> actix_web::Result<impl Responder> {
    let position = payload.as_ref().and_then(|p| p.position());
    let outcome = service.check_in(auth.employee_id, position).await?;

    Ok(match outcome {
        CheckInOutcome::Created { record } => HttpResponse::Created().json(serde_json::json!({
            "message": "Attendance marked successfully.",
            "attendance": record
        })),
        CheckInOutcome::WeeklyOff { record } => HttpResponse::Created().json(serde_json::json!({
            "message": "Weekly off recorded for today.",
            "attendance": record
        })),
        CheckInOutcome::AlreadyMarked { record } => HttpResponse::Ok().json(serde_json::json!({
            "message": "Attendance already marked for today.",
            "attendance": record
        })),
        CheckInOutcome::OnLeave { leave } => HttpResponse::Ok().json(serde_json::json!({
            "message": "Employee is on leave today.",
            "status": "on-leave",
            "leave": leave
        })),
    })
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/attendance/check-out",
    responses(
        (status = 200, description = "Checked out", body = AttendanceRecord),
        (status = 404, description = "No check-in record found for today"),
        (status = 409, description = "Already checked out today"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    service: web::Data<AppService>,
) -> actix_web::Result<impl Responder> {
    let record = service.check_out(auth.employee_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully",
        "attendance": record
    })))
}

/// Merged per-day calendar for a date window
#[utoipa::path(
    get,
    path = "/api/attendance/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "One event per date, ascending"),
        (status = 400, description = "Invalid window"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn calendar(
    auth: AuthUser,
    service: web::Data<AppService>,
    query: web::Query<CalendarQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match query.employee_id {
        Some(other) if other != auth.employee_id => {
            auth.require_hr_or_admin()?;
            other
        }
        _ => auth.employee_id,
    };

    let events = service.timeline(employee_id, query.from, query.to).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// Logged-in employee's record for today
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's record", body = AttendanceRecord),
        (status = 404, description = "No attendance found for today")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    service: web::Data<AppService>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let policy = service.policy().current();
    let date = policy.civil_date(chrono::Utc::now());

    let record = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, employee_id, date, check_in, check_out, status, late_time, total_worked, \
         latitude, longitude FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(auth.employee_id)
    .bind(date)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "failed to fetch today's attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match record {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No attendance found for today."
        }))),
    }
}
