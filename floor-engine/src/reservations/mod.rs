//! Reservation indexing
//!
//! - [`ReservationDateIndex`]: date buckets inside a preload window
//! - [`MinuteIndex`]: per-date minute → active reservations lookup
//! - queries: `active_at`, `late_at`, `nearing_end_at`, `first_upcoming`

mod date_index;
mod minute_index;
mod queries;

pub use date_index::{ReservationDateIndex, Thresholds};
pub use minute_index::MinuteIndex;
