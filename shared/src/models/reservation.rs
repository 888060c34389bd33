//! Reservation Model
//!
//! Only the fields the floor engine reads. The reservation-management side
//! owns the full record; the engine indexes and groups but never mutates it.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::time;

/// Meal service window (餐段)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationCategory {
    Lunch,
    Dinner,
    /// Closed window between services, no bookings are taken
    NoBookingZone,
}

impl ReservationCategory {
    /// Service window `(start, end)` for the category, `None` for the closed window
    ///
    /// Lunch runs 12:00–15:00, dinner 18:00–23:45.
    pub fn service_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match self {
            Self::Lunch => Some((
                NaiveTime::from_hms_opt(12, 0, 0)?,
                NaiveTime::from_hms_opt(15, 0, 0)?,
            )),
            Self::Dinner => Some((
                NaiveTime::from_hms_opt(18, 0, 0)?,
                NaiveTime::from_hms_opt(23, 45, 0)?,
            )),
            Self::NoBookingZone => None,
        }
    }

    /// Classify a wall-clock time into the service it belongs to
    pub fn for_time(at: NaiveTime) -> Self {
        for category in [Self::Lunch, Self::Dinner] {
            if let Some((start, end)) = category.service_window()
                && at >= start
                && at <= end
            {
                return category;
            }
        }
        Self::NoBookingZone
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::NoBookingZone => "no_booking_zone",
        }
    }
}

impl std::fmt::Display for ReservationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    NoShow,
    ShowedUp,
    Canceled,
    Pending,
    Late,
    ToHandle,
    Deleted,
    Na,
}

impl ReservationStatus {
    /// Statuses that can no longer become late
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ShowedUp | Self::Canceled | Self::NoShow | Self::Deleted
        )
    }

    /// Statuses that no longer occupy a table
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Canceled | Self::Deleted)
    }
}

/// How the reservation entered the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationType {
    WalkIn,
    InAdvance,
    WaitingList,
    Na,
}

/// Whether the restaurant confirmed the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    Confirmed,
    ToConfirm,
    Na,
}

/// Reservation entity (预订)
///
/// `date_string` is `YYYY-MM-DD`; `start_time` / `end_time` are `HH:MM` on
/// that date. The parsed accessors return `None` for malformed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number_of_persons: i32,
    pub date_string: String,
    pub category: ReservationCategory,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_acceptance")]
    pub acceptance: Acceptance,
    pub status: ReservationStatus,
    #[serde(default = "default_reservation_type")]
    pub reservation_type: ReservationType,
    /// IDs of the tables this reservation occupies
    #[serde(default)]
    pub tables: Vec<i64>,
}

fn default_acceptance() -> Acceptance {
    Acceptance::Confirmed
}

fn default_reservation_type() -> ReservationType {
    ReservationType::InAdvance
}

impl Reservation {
    /// Calendar date of the reservation
    pub fn date(&self) -> Option<NaiveDate> {
        time::parse_date(&self.date_string).ok()
    }

    /// Start instant on the reservation date
    pub fn start_at(&self) -> Option<NaiveDateTime> {
        let date = self.date()?;
        let start = time::parse_time(&self.start_time).ok()?;
        Some(time::combine(date, start))
    }

    /// End instant on the reservation date
    pub fn end_at(&self) -> Option<NaiveDateTime> {
        let date = self.date()?;
        let end = time::parse_time(&self.end_time).ok()?;
        Some(time::combine(date, end))
    }

    /// `[start, end)` when both ends parse
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.start_at()?, self.end_at()?))
    }

    /// Parsed `[start, end)`, rejecting any part that is unusable
    ///
    /// Unlike [`time_range`](Self::time_range) this says why: a bad date, a
    /// bad time, or an end that is not after the start.
    pub fn checked_range(&self) -> AppResult<(NaiveDateTime, NaiveDateTime)> {
        let date = time::parse_date(&self.date_string)?;
        let start = time::combine(date, time::parse_time(&self.start_time)?);
        let end = time::combine(date, time::parse_time(&self.end_time)?);
        if end <= start {
            return Err(AppError::invalid_range(&self.start_time, &self.end_time));
        }
        Ok((start, end))
    }

    /// Half-open containment: `start <= at < end`
    pub fn is_active_at(&self, at: NaiveDateTime) -> bool {
        self.time_range()
            .is_some_and(|(start, end)| start <= at && at < end)
    }

    pub fn occupies(&self, table_id: i64) -> bool {
        self.tables.contains(&table_id)
    }

    pub fn is_waiting_list(&self) -> bool {
        self.reservation_type == ReservationType::WaitingList
    }

    /// Entries kept out of the working set (source `validateCache` rule)
    pub fn is_purgeable(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Canceled | ReservationStatus::Deleted | ReservationStatus::ToHandle
        ) || self.is_waiting_list()
    }
}
