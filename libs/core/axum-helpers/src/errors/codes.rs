//! Type-safe error codes for API responses.
//!
//! Each code carries:
//! - a string identifier for clients (e.g. `"VALIDATION_ERROR"`)
//! - an integer for logs and dashboards (e.g. `1001`)
//! - a default human-readable message
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "The given data was invalid");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// One or more request fields failed validation
    ValidationError,

    /// The query string could not be decoded
    InvalidQuery,

    /// No route or resource matched the request
    NotFound,

    /// The route exists but not for this HTTP method
    MethodNotAllowed,

    /// A dependency needed to serve the request is down
    ServiceUnavailable,

    // Database errors (2000-2999)
    /// Could not open a connection to the database
    DatabaseConnection,

    /// No pooled connection became available in time
    DatabasePoolTimeout,

    /// A statement failed while executing
    DatabaseQuery,

    /// A row could not be mapped onto its model
    DatabaseDecode,

    /// Any other database failure
    DatabaseError,

    // Migration errors (3000-3999)
    MigrationError,
}

impl ErrorCode {
    /// String representation returned to clients in the `error` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseConnection => "DATABASE_CONNECTION",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
            Self::DatabaseQuery => "DATABASE_QUERY",
            Self::DatabaseDecode => "DATABASE_DECODE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::MigrationError => "MIGRATION_ERROR",
        }
    }

    /// Integer code for logging and monitoring.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidQuery => 1002,
            Self::NotFound => 1004,
            Self::MethodNotAllowed => 1010,
            Self::ServiceUnavailable => 1011,

            Self::DatabaseConnection => 2001,
            Self::DatabaseQuery => 2003,
            Self::DatabaseDecode => 2010,
            Self::DatabasePoolTimeout => 2013,
            Self::DatabaseError => 2099,

            Self::MigrationError => 3001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "The given data was invalid",
            Self::InvalidQuery => "The query string could not be parsed",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseConnection
            | Self::DatabasePoolTimeout
            | Self::DatabaseQuery
            | Self::DatabaseDecode
            | Self::DatabaseError => "An internal server error occurred",
            Self::MigrationError => "Database migration error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 11] = [
        ErrorCode::ValidationError,
        ErrorCode::InvalidQuery,
        ErrorCode::NotFound,
        ErrorCode::MethodNotAllowed,
        ErrorCode::ServiceUnavailable,
        ErrorCode::DatabaseConnection,
        ErrorCode::DatabasePoolTimeout,
        ErrorCode::DatabaseQuery,
        ErrorCode::DatabaseDecode,
        ErrorCode::DatabaseError,
        ErrorCode::MigrationError,
    ];

    #[test]
    fn test_codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code for {code}");
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for code in ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_database_codes_share_generic_message() {
        let database = [
            ErrorCode::DatabaseConnection,
            ErrorCode::DatabasePoolTimeout,
            ErrorCode::DatabaseQuery,
            ErrorCode::DatabaseDecode,
            ErrorCode::DatabaseError,
        ];
        for code in database {
            assert_eq!(code.default_message(), "An internal server error occurred");
            assert!((2000..3000).contains(&code.code()), "{code}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::InvalidQuery.to_string(), "INVALID_QUERY");
    }
}
