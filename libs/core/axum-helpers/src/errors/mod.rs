pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error body returned by every endpoint.
///
/// - `code`: integer error code for logging/monitoring (e.g. 1001)
/// - `error`: machine-readable identifier (e.g. "VALIDATION_ERROR")
/// - `message`: human-readable message
/// - `details`: optional structured details, such as per-field validation errors
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "The given data was invalid",
///   "details": {
///     "rating_from": [{ "code": "range", "message": null, "params": { "min": 0.0, "max": 5.0, "value": 6.0 } }]
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// A dependency is down; the value lists the state of each check.
    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(serde_json::Value),
}

impl AppError {
    /// Status code and error code this error renders as.
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, db_error_code(e)),
            AppError::ValidationError(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::ValidationError)
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidQuery),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match self {
            AppError::Database(e) => {
                tracing::error!(error_code = code.code(), error = ?e, "Database error");
                ErrorResponse::new(code, code.default_message())
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = code.code(), "Validation error: {}", e);
                ErrorResponse::new(code, code.default_message())
                    .with_details(validation_details(&e))
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = code.code(), "Bad request: {}", msg);
                ErrorResponse::new(code, msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = code.code(), "Not found: {}", msg);
                ErrorResponse::new(code, msg)
            }
            AppError::ServiceUnavailable(checks) => {
                tracing::warn!(error_code = code.code(), %checks, "Service unavailable");
                ErrorResponse::new(code, code.default_message()).with_details(checks)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// `{ field: [ {code, message, params}, ... ] }`
pub fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    serde_json::to_value(errors).unwrap_or(serde_json::Value::Null)
}

/// Picks an error code for a SeaORM error. Every database failure is a 500;
/// the code only tells operators where it happened.
fn db_error_code(error: &DbErr) -> ErrorCode {
    match error {
        DbErr::ConnectionAcquire(_) => ErrorCode::DatabasePoolTimeout,
        DbErr::Conn(_) => ErrorCode::DatabaseConnection,
        DbErr::Exec(_) | DbErr::Query(_) => ErrorCode::DatabaseQuery,
        DbErr::Type(_) | DbErr::Json(_) | DbErr::TryIntoErr { .. } => ErrorCode::DatabaseDecode,
        DbErr::Migration(_) => ErrorCode::MigrationError,
        _ => ErrorCode::DatabaseError,
    }
}

/// Builds a bare error response for a status and code.
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    error_code: ErrorCode,
) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use validator::ValidationError;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_is_422_with_field_details() {
        let mut errors = ValidationErrors::new();
        errors.add("price_to", ValidationError::new("gte"));

        let (status, body) = render(AppError::ValidationError(errors)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], 1001);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["price_to"][0]["code"], "gte");
    }

    #[tokio::test]
    async fn test_database_error_hides_internals() {
        let err = AppError::Database(DbErr::Custom(
            "relation \"products\" does not exist".into(),
        ));

        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An internal server error occurred");
        assert!(body.get("details").is_none());
        assert!(!body.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn test_bad_request_keeps_message() {
        let (status, body) = render(AppError::BadRequest("unexpected key".into())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_QUERY");
        assert_eq!(body["message"], "unexpected key");
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let (status, body) = render(AppError::NotFound("no such route".into())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 1004);
        assert_eq!(body["message"], "no such route");
    }

    #[tokio::test]
    async fn test_service_unavailable_reports_checks() {
        let checks = serde_json::json!({ "status": "not ready", "database": "disconnected" });

        let (status, body) = render(AppError::ServiceUnavailable(checks.clone())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
        assert_eq!(body["details"], checks);
    }

    #[test]
    fn test_db_error_codes() {
        assert_eq!(
            db_error_code(&DbErr::Migration("boom".into())),
            ErrorCode::MigrationError
        );
        assert_eq!(
            db_error_code(&DbErr::Type("bad numeric".into())),
            ErrorCode::DatabaseDecode
        );
        assert_eq!(
            db_error_code(&DbErr::RecordNotFound("x".into())),
            ErrorCode::DatabaseError
        );
    }

    #[test]
    fn test_error_response_shape() {
        let body =
            serde_json::to_value(ErrorResponse::new(ErrorCode::NotFound, "missing")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "code": 1004, "error": "NOT_FOUND", "message": "missing" })
        );
    }
}
