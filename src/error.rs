use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// One violated input field, reported alongside its siblings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("email already registered")]
    DuplicateAccount,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    TokenExpired,
    #[error("forbidden")]
    Forbidden,
    #[error("storage failure")]
    Storage(#[from] sqlx::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateAccount | ApiError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingToken | ApiError::InvalidToken | ApiError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::DuplicateAccount => json!({ "message": "Email already registered" }),
            ApiError::InvalidCredentials => json!({ "message": "Invalid credentials" }),
            ApiError::MissingToken => json!({ "message": "Missing Authorization header" }),
            ApiError::InvalidToken => json!({ "message": "Invalid token" }),
            ApiError::TokenExpired => json!({ "message": "Token expired" }),
            ApiError::Forbidden => json!({ "message": "Not allowed to access this job" }),
            // Internal detail stays in the logs, never in the response
            ApiError::Storage(e) => {
                error!(error = %e, "storage failure");
                json!({ "message": "Server error" })
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                json!({ "message": "Server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
