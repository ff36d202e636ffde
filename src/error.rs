use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::error::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// Application error types
///
/// The `Display` output of every variant is the underlying message verbatim, so
/// callers see exactly what the database driver (or the config loader) reported.
#[derive(Error, Debug)]
pub enum AppError {
    /// Query ran but matched nothing
    #[error("{0}")]
    NotFound(String),

    /// Missing or malformed request parameters
    #[error("{0}")]
    Validation(String),

    /// Could not reach or authenticate against the database
    #[error("{0}")]
    Connectivity(String),

    /// The database rejected the query (unknown index, bad stage, invalid argument)
    #[error("{0}")]
    MalformedQuery(String),

    /// BSON/JSON encoding or decoding failed
    #[error("{0}")]
    Serialization(String),

    /// Configuration errors
    #[error("{0}")]
    Configuration(String),

    /// Internal server errors
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Connectivity(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedQuery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Connectivity(_) => "CONNECTIVITY_ERROR",
            AppError::MalformedQuery(_) => "MALFORMED_QUERY",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        // Handlers log failures together with the request parameters
        tracing::debug!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "detail": message,
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Classify driver errors by kind
impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        // The kind carries the driver/server message without labels and source
        let message = err.kind.to_string();
        match err.kind.as_ref() {
            ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::Authentication { .. }
            | ErrorKind::InvalidTlsConfig { .. } => AppError::Connectivity(message),
            ErrorKind::Command(_) | ErrorKind::InvalidArgument { .. } => {
                AppError::MalformedQuery(message)
            }
            ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                AppError::Serialization(message)
            }
            _ => AppError::Internal(message),
        }
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::Validation(err.body_text())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
