//! Shared types for the floor engine
//!
//! Data model (tables, reservations, clusters), the unified error system,
//! and wall-clock helpers used across the workspace.

pub mod error;
pub mod models;
pub mod time;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use models::{
    Acceptance, Cluster, GridRect, Reservation, ReservationCategory, ReservationStatus,
    ReservationType, Table,
};
pub use serde::{Deserialize, Serialize};
