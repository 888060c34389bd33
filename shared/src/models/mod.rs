//! Data models
//!
//! Snapshots handed to the floor engine by the layout and reservation
//! collaborators, plus the clusters the engine produces.
//! Table IDs are `i64`; reservation and cluster IDs are UUIDs.

pub mod cluster;
pub mod reservation;
pub mod table;

// Re-exports
pub use cluster::*;
pub use reservation::*;
pub use table::*;
