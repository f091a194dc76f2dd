//! API error types with IntoResponse
//!
//! Errors are converted to JSON envelopes with appropriate status codes:
//! `{"success": false, "error": <code>, "message": <text>}`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Malformed query string or JSON body (400)
    BadRequest { message: String },

    /// `action` names nothing on this endpoint (400)
    UnknownAction { endpoint: &'static str, action: String },

    /// Action exists but not for this method (405)
    MethodNotAllowed {
        action: String,
        method: String,
        allow: &'static str,
    },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique constraint hit (409)
    Conflict { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } | Self::UnknownAction { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::BadRequest { .. } => "bad_request",
            Self::UnknownAction { .. } => "unknown_action",
            Self::MethodNotAllowed { .. } => "method_not_allowed",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Database(_) => "internal_error",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { message } => message.clone(),
            Self::UnknownAction { endpoint, action } => {
                format!("unknown action '{}' for /api/{}", action, endpoint)
            }
            Self::MethodNotAllowed { action, method, allow } => {
                format!("action '{}' does not accept {} (allowed: {})", action, method, allow)
            }
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::Conflict { message } => message.clone(),
            Self::Database(_) => "an internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Database(e) = &self {
            // Log the actual error, return generic message
            tracing::error!(error = %e, "database error");
        }

        let status = self.status();
        let body = Json(json!({
            "success": false,
            "error": self.code(),
            "message": self.message(),
        }));

        match self {
            Self::MethodNotAllowed { allow, .. } => {
                (status, [(header::ALLOW, allow)], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { message } => Self::Conflict { message },
            _ => Self::Database(e),
        }
    }
}
