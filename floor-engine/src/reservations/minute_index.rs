//! Minute activity index
//!
//! Per-date map from a minute-aligned instant to the reservations active at
//! that minute. Stores positions into the date's bucket, so it is only valid
//! for the bucket it was built from and is always rebuilt wholesale when the
//! bucket changes.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use shared::Reservation;
use shared::time;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinuteIndex {
    slots: HashMap<NaiveDateTime, Vec<usize>>,
    skipped: usize,
}

impl MinuteIndex {
    /// Build the index for one date bucket
    ///
    /// A reservation lands under every minute `m` with `start <= m < end`.
    /// Reservations with an unparseable date or time, or an end that is not
    /// after the start, are skipped and logged.
    pub fn build(date: NaiveDate, bucket: &[Reservation]) -> Self {
        let mut slots: HashMap<NaiveDateTime, Vec<usize>> = HashMap::new();
        let mut skipped = 0usize;

        for (pos, reservation) in bucket.iter().enumerate() {
            let (start, end) = match reservation.checked_range() {
                Ok(range) => range,
                Err(e) => {
                    tracing::warn!(
                        reservation_id = %reservation.id,
                        start_time = %reservation.start_time,
                        end_time = %reservation.end_time,
                        code = %e.code,
                        error = %e,
                        "Reservation excluded from minute index"
                    );
                    skipped += 1;
                    continue;
                }
            };

            let mut minute = time::ceil_to_minute(start);
            while minute < end {
                slots.entry(minute).or_default().push(pos);
                minute += Duration::minutes(1);
            }
        }

        tracing::debug!(
            date = %date,
            reservations = bucket.len(),
            minutes = slots.len(),
            skipped,
            "Rebuilt minute index"
        );

        Self { slots, skipped }
    }

    /// Bucket positions active at `minute` (must already be minute-aligned)
    pub fn at(&self, minute: NaiveDateTime) -> &[usize] {
        self.slots.get(&minute).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reservations left out because their times were unusable
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of populated minutes
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Acceptance, ReservationCategory, ReservationStatus, ReservationType};
    use uuid::Uuid;

    fn reservation(start: &str, end: &str) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            name: String::new(),
            number_of_persons: 2,
            date_string: "2025-03-14".to_string(),
            category: ReservationCategory::Dinner,
            start_time: start.to_string(),
            end_time: end.to_string(),
            acceptance: Acceptance::Confirmed,
            status: ReservationStatus::Pending,
            reservation_type: ReservationType::InAdvance,
            tables: vec![1],
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn minute(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_covers_every_minute_of_interval() {
        let bucket = vec![reservation("19:00", "21:00")];
        let index = MinuteIndex::build(date(), &bucket);

        assert_eq!(index.len(), 120);
        assert_eq!(index.at(minute(19, 0)), &[0]);
        assert_eq!(index.at(minute(20, 59)), &[0]);
        assert!(index.at(minute(21, 0)).is_empty());
        assert!(index.at(minute(18, 59)).is_empty());
    }

    #[test]
    fn test_overlapping_reservations_share_minutes() {
        let bucket = vec![reservation("19:00", "20:00"), reservation("19:30", "20:30")];
        let index = MinuteIndex::build(date(), &bucket);

        assert_eq!(index.at(minute(19, 15)), &[0]);
        assert_eq!(index.at(minute(19, 45)), &[0, 1]);
        assert_eq!(index.at(minute(20, 15)), &[1]);
    }

    #[test]
    fn test_malformed_reservation_is_skipped() {
        let bucket = vec![reservation("7pm", "21:00"), reservation("19:00", "19:02")];
        let index = MinuteIndex::build(date(), &bucket);

        assert_eq!(index.len(), 2);
        assert_eq!(index.at(minute(19, 1)), &[1]);
        assert_eq!(index.skipped(), 1);
    }

    #[test]
    fn test_inverted_and_empty_intervals_are_skipped() {
        let bucket = vec![
            reservation("21:00", "19:00"),
            reservation("20:00", "20:00"),
            reservation("19:00", "19:30"),
        ];
        let index = MinuteIndex::build(date(), &bucket);

        assert_eq!(index.skipped(), 2);
        assert_eq!(index.len(), 30);
        assert_eq!(index.at(minute(19, 10)), &[2]);
        assert!(index.at(minute(20, 0)).is_empty());
    }
}
