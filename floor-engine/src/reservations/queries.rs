//! Read-only queries over the date index
//!
//! None of these fail: a date that is not resident simply yields nothing.

use chrono::{NaiveDate, NaiveDateTime};
use shared::time;
use shared::{Acceptance, Reservation, ReservationCategory};

use super::date_index::ReservationDateIndex;

impl ReservationDateIndex {
    /// Reservations whose `[start, end)` contains `at`, seconds truncated
    pub fn active_at(&self, date: NaiveDate, at: NaiveDateTime) -> Vec<&Reservation> {
        let minute = time::truncate_to_minute(at);
        match (self.minutes.get(&date), self.buckets.get(&date)) {
            (Some(index), Some(bucket)) => index
                .at(minute)
                .iter()
                .filter_map(|&pos| bucket.get(pos))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Non-terminal reservations more than the late grace past their start
    ///
    /// Scans every resident date. Ordered by start, then id.
    pub fn late_at(&self, at: NaiveDateTime) -> Vec<&Reservation> {
        let grace = self.thresholds.late_grace;
        let mut late: Vec<(NaiveDateTime, &Reservation)> = self
            .buckets
            .values()
            .flatten()
            .filter(|r| !r.status.is_terminal())
            .filter_map(|r| r.start_at().map(|start| (start, r)))
            .filter(|(start, _)| at > *start + grace)
            .collect();
        late.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.id.cmp(&b.1.id)));

        tracing::debug!(at = %at, count = late.len(), "Late reservations");
        late.into_iter().map(|(_, r)| r).collect()
    }

    /// Started reservations with `0 < end - at <= ending_soon`
    ///
    /// Scans every resident date, skipping canceled and deleted entries.
    /// Ordered by end, then id.
    pub fn nearing_end_at(&self, at: NaiveDateTime) -> Vec<&Reservation> {
        let horizon = self.thresholds.ending_soon;
        let mut ending: Vec<(NaiveDateTime, &Reservation)> = self
            .buckets
            .values()
            .flatten()
            .filter(|r| !r.status.is_removed())
            .filter_map(|r| r.time_range().map(|range| (range, r)))
            .filter(|((start, end), _)| {
                let remaining = *end - at;
                *start <= at && remaining > chrono::Duration::zero() && remaining <= horizon
            })
            .map(|((_, end), r)| (end, r))
            .collect();
        ending.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.id.cmp(&b.1.id)));

        tracing::debug!(at = %at, count = ending.len(), "Reservations nearing end");
        ending.into_iter().map(|(_, r)| r).collect()
    }

    /// Earliest reservation still to come on a table within a service window
    ///
    /// Candidates occupy `table_id` on `date`, start strictly after `at`
    /// (minute-truncated) and inside the category window
    /// (`window_start < start <= window_end`), have not ended, are confirmed,
    /// and are neither purged statuses nor waiting-list entries. Ties on start
    /// are broken by reservation id.
    pub fn first_upcoming(
        &self,
        table_id: i64,
        date: NaiveDate,
        at: NaiveDateTime,
        category: ReservationCategory,
    ) -> Option<&Reservation> {
        let Some((window_start, window_end)) = category.service_window() else {
            tracing::debug!(category = %category, "No service window for category");
            return None;
        };
        let now = time::truncate_to_minute(at);
        let window_start = time::combine(date, window_start);
        let window_end = time::combine(date, window_end);

        let upcoming = self
            .reservations_on(date)
            .iter()
            .filter(|r| r.occupies(table_id))
            .filter(|r| !r.is_purgeable() && r.acceptance == Acceptance::Confirmed)
            .filter_map(|r| r.time_range().map(|(start, end)| (start, end, r)))
            .filter(|(start, end, _)| {
                *start > now && *start > window_start && *start <= window_end && now <= *end
            })
            .min_by(|a, b| a.0.cmp(&b.0).then(a.2.id.cmp(&b.2.id)))
            .map(|(_, _, r)| r);

        match upcoming {
            Some(r) => tracing::debug!(
                table_id,
                reservation_id = %r.id,
                start_time = %r.start_time,
                "Found upcoming reservation"
            ),
            None => tracing::debug!(table_id, category = %category, "No upcoming reservation"),
        }
        upcoming
    }

    /// Reservation holding `table_id` at `at` for `category`
    ///
    /// Half-open like [`active_at`](Self::active_at); canceled and deleted
    /// entries do not hold a table.
    pub fn reservation_at_table(
        &self,
        table_id: i64,
        at: NaiveDateTime,
        category: ReservationCategory,
    ) -> Option<&Reservation> {
        self.active_at(at.date(), at).into_iter().find(|r| {
            r.occupies(table_id) && r.category == category && !r.status.is_removed()
        })
    }
}
