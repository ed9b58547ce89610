/// Error handling for the API server
///
/// Unified error type mapping the domain taxonomy to HTTP responses.
/// Handlers return `ApiResult<T>`, which converts automatically:
///
/// - `Unauthenticated` → 401
/// - `Forbidden` → 403
/// - `NotFound` → 404
/// - `ExternalServiceError` → 502
/// - everything else → 500 (details logged, not exposed)
///
/// The one deliberate exception is `getItem`: not-found and forbidden are
/// swallowed to a null body there instead of an error status, so the UI
/// renders a uniform not-found state (handled in the route, not here).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// No valid identity context (401)
    Unauthenticated(String),

    /// Authenticated but lacks rights (403)
    Forbidden(String),

    /// Referenced item/tag absent (404)
    NotFound(String),

    /// Duplicate where uniqueness is required (409)
    Conflict(String),

    /// Request validation failed (422)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// External search API failure (502)
    ExternalServiceError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "forbidden", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ExternalServiceError(msg) => {
                write!(f, "External service error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", msg, None)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ExternalServiceError(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert domain errors to API errors
impl From<jotdeck_shared::Error> for ApiError {
    fn from(err: jotdeck_shared::Error) -> Self {
        match err {
            jotdeck_shared::Error::Unauthenticated(msg) => ApiError::Unauthenticated(msg),
            jotdeck_shared::Error::NotFound(msg) => ApiError::NotFound(msg),
            jotdeck_shared::Error::Forbidden(msg) => ApiError::Forbidden(msg),
            jotdeck_shared::Error::ExternalService(msg) => ApiError::ExternalServiceError(msg),
            jotdeck_shared::Error::Database(e) => e.into(),
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Foreign-key failures are caller mistakes (unknown tag or
                // user id), not server faults
                if db_err.is_foreign_key_violation() {
                    return ApiError::BadRequest("Referenced record does not exist".to_string());
                }
                if let Some(constraint) = db_err.constraint() {
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert validator errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| ValidationErrorDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Forbidden("not the creator".to_string());
        assert_eq!(err.to_string(), "Forbidden: not the creator");

        let err = ApiError::NotFound("item missing".to_string());
        assert_eq!(err.to_string(), "Not found: item missing");
    }

    #[test]
    fn test_domain_error_mapping() {
        let api: ApiError = jotdeck_shared::Error::Forbidden("x".to_string()).into();
        assert!(matches!(api, ApiError::Forbidden(_)));

        let api: ApiError = jotdeck_shared::Error::NotFound("x".to_string()).into();
        assert!(matches!(api, ApiError::NotFound(_)));

        let api: ApiError = jotdeck_shared::Error::ExternalService("down".to_string()).into();
        assert!(matches!(api, ApiError::ExternalServiceError(_)));
    }
}
