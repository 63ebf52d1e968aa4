use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::{self, AuthUser};
use crate::model::employee::Employee;

const EMPLOYEE_COLS: &str =
    "id, employee_code, first_name, last_name, email, role_id, hire_date, status";

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "WT-0001")]
    pub employee_code: String,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
    /// 1 = admin, 2 = hr, 3 = employee
    #[schema(example = 3)]
    pub role_id: u8,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatus {
    #[schema(example = "inactive")]
    pub status: String,
}

/// Create employee (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/employee",
    request_body(content = CreateEmployee, content_type = "application/json"),
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 409, description = "Employee code or email already exists"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let password_hash = auth::hash_password(&payload.password)?;

    let result = sqlx::query(
        r#"
        INSERT INTO employees
            (employee_code, first_name, last_name, email, password_hash, role_id, hire_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.employee_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(payload.role_id)
    .bind(payload.hire_date)
    .execute(pool.get_ref())
    .await;

    let id = match result {
        Ok(r) => r.last_insert_id(),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(serde_json::json!({
                        "message": "Employee code or email already exists"
                    })));
                }
            }
            tracing::error!(error = %e, "failed to create employee");
            return Err(actix_web::error::ErrorInternalServerError("Internal Server Error"));
        }
    };

    let sql = format!("SELECT {EMPLOYEE_COLS} FROM employees WHERE id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch created employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(employee))
}

/// List employees (HR/Admin), alphabetical by first name
#[utoipa::path(
    get,
    path = "/api/employee",
    responses(
        (status = 200, description = "All employees", body = [Employee]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let sql = format!("SELECT {EMPLOYEE_COLS} FROM employees ORDER BY first_name");
    let employees = sqlx::query_as::<_, Employee>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to list employees");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Employee details; employees can fetch themselves, others need HR/Admin
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee to fetch")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    if employee_id != auth.employee_id {
        auth.require_hr_or_admin()?;
    }

    let sql = format!("SELECT {EMPLOYEE_COLS} FROM employees WHERE id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match employee {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        }))),
    }
}

/// Activate/deactivate an employee (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/employee/{employee_id}/status",
    params(("employee_id" = u64, Path, description = "Employee to update")),
    request_body(content = UpdateStatus, content_type = "application/json"),
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Employee not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateStatus>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let employee_id = path.into_inner();

    if !matches!(payload.status.as_str(), "active" | "inactive") {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "status must be 'active' or 'inactive'"
        })));
    }

    let result = sqlx::query("UPDATE employees SET status = ? WHERE id = ?")
        .bind(&payload.status)
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "failed to update employee status");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Status updated" })))
}
