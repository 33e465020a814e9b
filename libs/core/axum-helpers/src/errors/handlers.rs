use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{AppError, ErrorCode, error_response};

/// Router fallback for unmatched paths.
pub async fn not_found() -> Response {
    AppError::NotFound("The requested resource was not found".to_string()).into_response()
}

/// Fallback for a known path called with an unsupported method.
pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed.default_message(),
        ErrorCode::MethodNotAllowed,
    )
}
