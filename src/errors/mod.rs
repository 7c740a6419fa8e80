//! Error handling module for teamclock.
//!
//! Provides the centralized error type and the JSON error envelope printed by the
//! command front end.

use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const IMPORT_ERROR: &str = "IMPORT_ERROR";
    pub const PERSISTENCE_ERROR: &str = "PERSISTENCE_ERROR";
    pub const CORRUPT_DATA: &str = "CORRUPT_DATA";
    pub const GEOCODE_ERROR: &str = "GEOCODE_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Teammate or group not found
    NotFound(String),
    /// Caller-side validation failed
    Validation(String),
    /// Import payload could not be decoded
    Import(String),
    /// Reading or writing a persisted artifact failed
    Persistence(String),
    /// A persisted artifact exists but does not decode
    Corrupt(String),
    /// External place-name resolution failed
    Geocode(String),
    /// Malformed command input
    BadRequest(String),
    /// Anything else
    Internal(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Import(_) => codes::IMPORT_ERROR,
            AppError::Persistence(_) => codes::PERSISTENCE_ERROR,
            AppError::Corrupt(_) => codes::CORRUPT_DATA,
            AppError::Geocode(_) => codes::GEOCODE_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Import(msg)
            | AppError::Persistence(msg)
            | AppError::Corrupt(msg)
            | AppError::Geocode(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Process exit code used by the command front end.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::NotFound(_) => 3,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Import(_) => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        AppError::Persistence(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Corrupt(format!("JSON error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope() {
        let err = AppError::Import("not a teammate list".to_string());
        let body = serde_json::to_value(ErrorResponse::new(&err)).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "IMPORT_ERROR");
        assert_eq!(body["error"]["message"], "not a teammate list");
        assert_eq!(err.to_string(), "IMPORT_ERROR: not a teammate list");
    }

    #[test]
    fn test_json_error_maps_to_corrupt() {
        let err: AppError = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert_eq!(err.error_code(), codes::CORRUPT_DATA);
    }
}
