//! Registration, email verification, login and password reset.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{self, Claims, Role};
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    req.validate()?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Validation("User already exists".into()));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let token = auth::opaque_token();
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, verification_token) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(req.role.unwrap_or(Role::User))
    .bind(&token)
    .execute(&state.db)
    .await?;

    state.mailer.send_verification(&req.email, &token);
    Ok((StatusCode::CREATED, Json(json!({"message": "Check your email to verify account"}))))
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

/// Responds with the `{code, message}` contract the frontend keys on, so
/// failures here bypass the generic error body.
pub async fn verify_email(State(state): State<AppState>, Query(q): Query<VerifyQuery>) -> Response {
    match try_verify(&state, q.token).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(%err, "email verification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"code": "SERVER_ERROR", "message": "Internal server error"})),
            )
                .into_response()
        }
    }
}

async fn try_verify(state: &AppState, token: Option<String>) -> Result<Response, sqlx::Error> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "NO_TOKEN", "message": "Verification token is required"})),
        )
            .into_response());
    };

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE verification_token = $1")
        .bind(&token)
        .fetch_optional(&state.db)
        .await?;

    let Some(user) = user else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "INVALID_TOKEN", "message": "Invalid or expired verification token"})),
        )
            .into_response());
    };

    if user.is_verified {
        return Ok((
            StatusCode::OK,
            Json(json!({"code": "ALREADY_VERIFIED", "message": "Email already verified"})),
        )
            .into_response());
    }

    sqlx::query("UPDATE users SET is_verified = TRUE, verification_token = NULL WHERE id = $1")
        .bind(user.id)
        .execute(&state.db)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({"code": "SUCCESS", "message": "Email verified successfully"})),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    // Same response for unknown, unverified and wrong-password callers.
    let invalid = || ApiError::Validation("Invalid credentials or email not verified".into());
    let user = user.ok_or_else(invalid)?;
    if !user.is_verified {
        return Err(invalid());
    }
    if !auth::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Validation("Invalid credentials".into()));
    }

    let token = auth::issue_token(&Claims::new(user.id, user.role), &state.config.jwt_secret)
        .map_err(|err| ApiError::Internal(anyhow::anyhow!(err)))?;
    Ok(Json(json!({"token": token})))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| ApiError::Validation("User not found".into()))?;

    let token = auth::opaque_token();
    sqlx::query("UPDATE users SET reset_token = $2, reset_token_expires = $3 WHERE id = $1")
        .bind(user.id)
        .bind(&token)
        .bind(Utc::now() + Duration::hours(1))
        .execute(&state.db)
        .await?;

    state.mailer.send_password_reset(&user.email, &token);
    Ok(Json(json!({"message": "Password reset link sent"})))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    req.validate()?;

    let user: Option<User> = sqlx::query_as(
        "SELECT * FROM users WHERE reset_token = $1 AND reset_token_expires > NOW()",
    )
    .bind(&req.token)
    .fetch_optional(&state.db)
    .await?;
    let user = user.ok_or_else(|| ApiError::Validation("Invalid or expired token".into()))?;

    let password_hash = auth::hash_password(&req.new_password)?;
    sqlx::query(
        "UPDATE users SET password_hash = $2, reset_token = NULL, reset_token_expires = NULL \
         WHERE id = $1",
    )
    .bind(user.id)
    .bind(&password_hash)
    .execute(&state.db)
    .await?;

    Ok(Json(json!({"message": "Password reset successfully"})))
}
