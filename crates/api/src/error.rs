//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tenantkit_shared::StoreError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),

    // Resource errors
    #[error("Resource not found")]
    NotFound,
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),
    #[error("User not found")]
    UserNotFound,
    #[error("Resource already exists")]
    Conflict(String),

    // Feature gating
    #[error("Feature disabled: {0}")]
    FeatureDisabled(&'static str),

    // Internal errors
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Validation
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            // Resources
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            ApiError::TenantNotFound(subdomain) if subdomain.is_empty() => {
                (StatusCode::NOT_FOUND, "TENANT_NOT_FOUND", "Tenant not found".to_string())
            }
            ApiError::TenantNotFound(subdomain) => (
                StatusCode::NOT_FOUND,
                "TENANT_NOT_FOUND",
                format!("No tenant found with subdomain: {}", subdomain),
            ),
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND", self.to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),

            ApiError::FeatureDisabled(_) => (StatusCode::NOT_FOUND, "FEATURE_DISABLED", self.to_string()),

            // Internal
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", "Database error".to_string()),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", self.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TenantNotFound => ApiError::TenantNotFound(String::new()),
            StoreError::UserNotFound => ApiError::UserNotFound,
            StoreError::AuthorNotInTenant => ApiError::Validation(err.to_string()),
            StoreError::SubdomainTaken(_)
            | StoreError::SlugTaken(_)
            | StoreError::UserAlreadyExists { .. } => ApiError::Conflict(err.to_string()),
            StoreError::Database(msg) => {
                tracing::error!("Store error: {}", msg);
                ApiError::Database(msg)
            }
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
