//! Unified error codes for the floor engine
//!
//! Error codes are organized by range:
//! - 4xxx: Reservation errors
//! - 7xxx: Table / layout errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// numbers for any consumer of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 4xxx: Reservation ====================
    /// Reservation date string cannot be parsed
    InvalidReservationDate = 4002,
    /// Reservation time string cannot be parsed
    InvalidReservationTime = 4003,
    /// Reservation does not end after it starts
    InvalidReservationRange = 4004,

    // ==================== 7xxx: Table ====================
    /// Layout snapshot is invalid
    InvalidLayout = 7002,

    // ==================== 9xxx: System ====================
    /// Configuration error
    ConfigError = 9002,
    /// Snapshot file could not be read
    SnapshotReadFailed = 9003,
    /// Snapshot file could not be decoded
    SnapshotDecodeFailed = 9004,
}

impl ErrorCode {
    /// Numeric value of this code
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // Reservation
            ErrorCode::InvalidReservationDate => "Reservation date is invalid",
            ErrorCode::InvalidReservationTime => "Reservation time is invalid",
            ErrorCode::InvalidReservationRange => "Reservation does not end after it starts",

            // Table
            ErrorCode::InvalidLayout => "Table layout is invalid",

            // System
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SnapshotReadFailed => "Failed to read floor snapshot",
            ErrorCode::SnapshotDecodeFailed => "Failed to decode floor snapshot",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // Reservation
            4002 => Ok(ErrorCode::InvalidReservationDate),
            4003 => Ok(ErrorCode::InvalidReservationTime),
            4004 => Ok(ErrorCode::InvalidReservationRange),

            // Table
            7002 => Ok(ErrorCode::InvalidLayout),

            // System
            9002 => Ok(ErrorCode::ConfigError),
            9003 => Ok(ErrorCode::SnapshotReadFailed),
            9004 => Ok(ErrorCode::SnapshotDecodeFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
