//! Simple bearer token authentication for the operator endpoints.
//!
//! Development: accepts the fixed operator login, returns a static-prefix
//! token. Production: replace with JWT + the session layer the dashboard
//! already runs (jsonwebtoken + OAuth2).

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hard-coded token prefix for development. Production: use JWT.
const DEV_TOKEN_PREFIX: &str = "ads_dev_";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Validate an operator login and return a bearer token.
pub fn authenticate(req: &LoginRequest) -> Result<LoginResponse, String> {
    // Development: accept admin/admin or any user with the shared passphrase.
    if (req.username == "admin" && req.password == "admin") || req.password == "adserve2026" {
        Ok(LoginResponse {
            token: generate_token(),
            user: req.username.clone(),
            expires_at: Utc::now() + Duration::hours(24),
        })
    } else {
        Err("Invalid credentials".to_string())
    }
}

/// Generate a random bearer token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!(
        "{}{}",
        DEV_TOKEN_PREFIX,
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>()
    )
}

/// Axum middleware guarding the admin router. Rejects before any handler
/// (and therefore before the store) is touched. The login endpoint is the
/// one admin path that stays open.
pub async fn require_operator(req: Request, next: Next) -> Response {
    if req.uri().path().ends_with("/auth/login") {
        return next.run(req).await;
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) if value.starts_with("Bearer ") => {
            let token = &value[7..];
            if token.starts_with(DEV_TOKEN_PREFIX) && token.len() > DEV_TOKEN_PREFIX.len() {
                next.run(req).await
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "invalid_token".to_string(),
                        message: "Invalid or expired bearer token".to_string(),
                    }),
                )
                    .into_response()
            }
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "missing_auth".to_string(),
                message: "Authorization header with Bearer token required".to_string(),
            }),
        )
            .into_response(),
    }
}
