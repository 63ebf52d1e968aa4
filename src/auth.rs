//! Minimal JWT carrier for the API: login issues an access token, the
//! `AuthUser` extractor validates it on protected routes. Session design
//! beyond this is out of scope.

use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest, HttpResponse, Responder, dev::Payload, web, web::Data};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::Argon2;
use futures::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub employee_id: u64,
    pub sub: String,
    pub role: u8,
    pub exp: usize,
    pub jti: String,
}

fn unix_now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or(0)
}

pub fn generate_access_token(
    employee_id: u64,
    email: &str,
    role: u8,
    secret: &str,
    ttl: usize,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        employee_id,
        sub: email.to_string(),
        role,
        exp: unix_now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

pub fn hash_password(password: &str) -> Result<String, actix_web::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| actix_web::error::ErrorInternalServerError("Failed to hash password"))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Authenticated caller identity extracted from the bearer token.
pub struct AuthUser {
    pub employee_id: u64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let claims = match verify_token(token, &config.jwt_secret) {
            Ok(c) => c,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid or expired token"))),
        };

        let role = match Role::from_id(claims.role) {
            Some(r) => r,
            None => return ready(Err(ErrorUnauthorized("Invalid role"))),
        };

        ready(Ok(AuthUser {
            employee_id: claims.employee_id,
            email: claims.sub,
            role,
        }))
    }
}

impl AuthUser {
    pub fn require_hr_or_admin(&self) -> actix_web::Result<()> {
        if matches!(self.role, Role::Admin | Role::Hr) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("HR/Admin only"))
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: u64,
    email: String,
    password_hash: String,
    role_id: u8,
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Object, example = json!({
            "token": "eyJ..."
        })),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> actix_web::Result<impl Responder> {
    let row = sqlx::query_as::<_, CredentialRow>(
        "SELECT id, email, password_hash, role_id FROM employees \
         WHERE email = ? AND status = 'active'",
    )
    .bind(&payload.email)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "login lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(row) = row else {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
            "message": "Invalid credentials"
        })));
    };

    if !verify_password(&payload.password, &row.password_hash) {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
            "message": "Invalid credentials"
        })));
    }

    let token = generate_access_token(
        row.id,
        &row.email,
        row.role_id,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "token generation failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "token": token })))
}
