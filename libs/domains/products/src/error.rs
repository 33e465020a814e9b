use axum::extract::rejection::QueryRejection;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    /// One or more search parameters are invalid, including an unknown `category_id`
    #[error("Invalid search parameters: {0}")]
    Validation(#[from] ValidationErrors),

    /// The query string itself could not be decoded
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<QueryRejection> for ProductError {
    fn from(rejection: QueryRejection) -> Self {
        ProductError::InvalidQuery(rejection.body_text())
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::InvalidQuery(msg) => AppError::BadRequest(msg),
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
