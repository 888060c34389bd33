//! Date-keyed reservation store
//!
//! Keeps one bucket per calendar date inside the preload window and a
//! [`MinuteIndex`] per bucket. Dates outside the window are absent, not empty.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use shared::Reservation;
use shared::time;
use uuid::Uuid;

use super::minute_index::MinuteIndex;

/// Time thresholds for the late / ending-soon queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// A reservation is late once `now > start + late_grace`
    pub late_grace: Duration,
    /// A reservation is ending soon once `end - now <= ending_soon`
    pub ending_soon: Duration,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            late_grace: Duration::minutes(15),
            ending_soon: Duration::minutes(30),
        }
    }
}

/// Reservation date index (预订日期索引)
///
/// Single-writer: every mutation rebuilds the affected date's minute index
/// before returning, so a query issued right after observes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDateIndex {
    pub(super) buckets: BTreeMap<NaiveDate, Vec<Reservation>>,
    pub(super) minutes: HashMap<NaiveDate, MinuteIndex>,
    window: BTreeSet<NaiveDate>,
    pub(super) thresholds: Thresholds,
}

impl ReservationDateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    // =========================================================================
    // Preload window
    // =========================================================================

    /// Slide the preload window to `[around - window_days, around + window_days]`
    ///
    /// Dates leaving the window are evicted; dates entering it are populated
    /// from `source` by exact `date_string` match. Calling twice with the same
    /// arguments leaves the index unchanged.
    pub fn preload(&mut self, around: NaiveDate, window_days: u32, source: &[Reservation]) {
        let next_window = date_window(around, window_days);

        let leaving: Vec<NaiveDate> = self.window.difference(&next_window).copied().collect();
        for date in &leaving {
            self.buckets.remove(date);
            self.minutes.remove(date);
        }

        let entering: Vec<NaiveDate> = next_window.difference(&self.window).copied().collect();
        for date in &entering {
            self.populate_date(*date, source);
        }

        self.window = next_window;

        tracing::info!(
            around = %around,
            window_days,
            evicted = leaving.len(),
            populated = entering.len(),
            source = source.len(),
            "Preloaded reservation window"
        );
    }

    /// Rebuild every resident date from `source`, keeping the current window
    pub fn refresh(&mut self, source: &[Reservation]) {
        let dates: Vec<NaiveDate> = self.window.iter().copied().collect();
        for date in &dates {
            self.populate_date(*date, source);
        }
        tracing::info!(dates = dates.len(), "Refreshed reservation window");
    }

    fn populate_date(&mut self, date: NaiveDate, source: &[Reservation]) {
        let key = time::format_date(date);
        let bucket: Vec<Reservation> = source
            .iter()
            .filter(|r| r.date_string == key)
            .cloned()
            .collect();
        self.buckets.insert(date, bucket);
        self.rebuild(date);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert or replace a reservation by id
    ///
    /// Returns `false` when the reservation's date is unparseable or falls
    /// outside the preload window. Any copy held under a different date is
    /// dropped first, so a reservation moved out of the window or given a
    /// broken date stops occupying its old slot even though the new copy is
    /// not cached.
    pub fn upsert(&mut self, reservation: Reservation) -> bool {
        let target = reservation.date().filter(|d| self.window.contains(d));

        let stale: Vec<NaiveDate> = self
            .buckets
            .iter()
            .filter(|(d, bucket)| Some(**d) != target && bucket.iter().any(|r| r.id == reservation.id))
            .map(|(d, _)| *d)
            .collect();
        for previous in stale {
            self.remove(reservation.id, previous);
        }

        let Some(date) = target else {
            match reservation.date() {
                None => tracing::warn!(
                    reservation_id = %reservation.id,
                    date_string = %reservation.date_string,
                    "Skipping reservation with invalid date"
                ),
                Some(date) => tracing::debug!(
                    reservation_id = %reservation.id,
                    date = %date,
                    "Reservation outside preload window, not cached"
                ),
            }
            return false;
        };

        let id = reservation.id;
        let bucket = self.buckets.entry(date).or_default();
        match bucket.iter().position(|r| r.id == id) {
            Some(pos) => {
                bucket[pos] = reservation;
                tracing::debug!(reservation_id = %id, date = %date, "Updated reservation");
            }
            None => {
                bucket.push(reservation);
                tracing::debug!(reservation_id = %id, date = %date, "Added reservation");
            }
        }

        self.rebuild(date);
        true
    }

    /// Remove a reservation from a date bucket; `false` if it was not there
    pub fn remove(&mut self, reservation_id: Uuid, date: NaiveDate) -> bool {
        let Some(bucket) = self.buckets.get_mut(&date) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|r| r.id != reservation_id);
        if bucket.len() == before {
            return false;
        }

        tracing::debug!(reservation_id = %reservation_id, date = %date, "Removed reservation");
        self.rebuild(date);
        true
    }

    /// Drop canceled, deleted, to-handle and waiting-list entries
    ///
    /// Returns how many reservations were removed.
    pub fn purge_removed(&mut self) -> usize {
        let mut removed = 0;
        let mut touched = Vec::new();

        for (date, bucket) in self.buckets.iter_mut() {
            let before = bucket.len();
            bucket.retain(|r| !r.is_purgeable());
            if bucket.len() != before {
                removed += before - bucket.len();
                touched.push(*date);
            }
        }

        for date in touched {
            self.rebuild(date);
        }

        if removed > 0 {
            tracing::info!(removed, "Purged inactive reservations from index");
        }
        removed
    }

    /// Forget one date's bucket; the date stays in the window and reads empty
    pub fn clear_date(&mut self, date: NaiveDate) {
        self.buckets.remove(&date);
        self.minutes.remove(&date);
        tracing::debug!(date = %date, "Cleared reservation bucket");
    }

    /// Drop every bucket and the window
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.minutes.clear();
        self.window.clear();
        tracing::info!("Cleared reservation index");
    }

    fn rebuild(&mut self, date: NaiveDate) {
        let index = self
            .buckets
            .get(&date)
            .map(|bucket| MinuteIndex::build(date, bucket))
            .unwrap_or_default();
        self.minutes.insert(date, index);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Reservations cached for a date, empty when the date is not resident
    pub fn reservations_on(&self, date: NaiveDate) -> &[Reservation] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, reservation_id: Uuid) -> Option<&Reservation> {
        self.buckets
            .values()
            .flatten()
            .find(|r| r.id == reservation_id)
    }

    /// Dates that currently hold a bucket
    pub fn cached_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    pub fn window(&self) -> &BTreeSet<NaiveDate> {
        &self.window
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Total reservations across all resident dates
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Symmetric, inclusive date window around `around`
fn date_window(around: NaiveDate, window_days: u32) -> BTreeSet<NaiveDate> {
    let span = i64::from(window_days);
    (-span..=span)
        .filter_map(|offset| around.checked_add_signed(Duration::days(offset)))
        .collect()
}
