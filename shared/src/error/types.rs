//! Error types

use super::codes::ErrorCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type for the floor engine, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create an invalid date error for an unparseable `YYYY-MM-DD` string
    pub fn invalid_date(value: impl Into<String>) -> Self {
        let v = value.into();
        Self::with_message(
            ErrorCode::InvalidReservationDate,
            format!("Invalid date format: {}", v),
        )
        .with_detail("value", v)
    }

    /// Create an invalid time error for an unparseable `HH:MM` string
    pub fn invalid_time(value: impl Into<String>) -> Self {
        let v = value.into();
        Self::with_message(
            ErrorCode::InvalidReservationTime,
            format!("Invalid time format: {}", v),
        )
        .with_detail("value", v)
    }

    /// Create an error for a reservation whose end is not after its start
    pub fn invalid_range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidReservationRange)
            .with_detail("start_time", start.into())
            .with_detail("end_time", end.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
