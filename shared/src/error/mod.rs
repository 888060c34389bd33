//! Unified error system for the floor engine
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 4xxx: Reservation errors
//! - 7xxx: Table errors
//! - 9xxx: System errors
//!
//! Index queries never return errors: a missing date is an empty result.
//! Errors only surface at the fallible edges (time parsing, configuration,
//! snapshot loading) or as logged omissions of malformed reservations.
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::InvalidLayout);
//! let err = AppError::invalid_time("7pm").with_detail("reservation", "abc");
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
