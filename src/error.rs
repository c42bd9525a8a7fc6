//! HTTP error taxonomy: validation 400, not-found 404, auth 401/403,
//! availability 400 naming the item, everything unexpected 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::{catalog::AvailabilityError, order::OrderEntryError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Pizza cannot be created due to insufficient stock of: {}", .0.join(", "))]
    UnavailableIngredients(Vec<String>),

    #[error("Internal server error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::UnavailableIngredients(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &self {
            ApiError::UnavailableIngredients(items) => json!({
                "error": "Pizza cannot be created due to insufficient stock of:",
                "unavailableItems": items,
            }),
            ApiError::Database(err) => {
                tracing::error!(%err, "database error");
                json!({"error": "Internal server error"})
            }
            ApiError::Internal(err) => {
                tracing::error!(%err, "internal error");
                json!({"error": "Internal server error"})
            }
            other => json!({"error": other.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<AvailabilityError> for ApiError {
    fn from(err: AvailabilityError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<OrderEntryError> for ApiError {
    fn from(err: OrderEntryError) -> Self {
        ApiError::Validation(err.to_string())
    }
}
