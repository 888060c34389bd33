//! Floor engine (楼面引擎)
//!
//! Composition root tying the reservation index, the cluster cache and the
//! recalculation orchestrator to the current layout snapshot. Every mutation
//! invalidates the clusters of the dates it touched; the next
//! [`FloorEngine::recalculate`] rebuilds them.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use shared::{Cluster, Reservation, ReservationCategory, Table};
use uuid::Uuid;

use super::config::EngineConfig;
use crate::clusters::{ClusterCache, ClusterOrchestrator};
use crate::reservations::ReservationDateIndex;

/// Reservations needing floor staff attention at an instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FloorAlerts {
    pub late: Vec<Uuid>,
    pub ending_soon: Vec<Uuid>,
}

impl FloorAlerts {
    pub fn is_empty(&self) -> bool {
        self.late.is_empty() && self.ending_soon.is_empty()
    }
}

#[derive(Debug)]
pub struct FloorEngine {
    index: ReservationDateIndex,
    cache: ClusterCache,
    orchestrator: ClusterOrchestrator,
    tables: Vec<Table>,
    preload_window_days: u32,
}

impl Default for FloorEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl FloorEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            index: ReservationDateIndex::with_thresholds(config.thresholds()),
            cache: ClusterCache::new(config.max_cluster_cache_entries),
            orchestrator: ClusterOrchestrator::new(),
            tables: Vec::new(),
            preload_window_days: config.preload_window_days,
        }
    }

    fn invalidate_date(&mut self, date: NaiveDate) {
        self.cache.invalidate_date(date);
        self.orchestrator.invalidate_date(date);
    }

    // =========================================================================
    // Reservations
    // =========================================================================

    /// Slide the preload window around `around` and load it from `source`
    pub fn preload(&mut self, around: NaiveDate, source: &[Reservation]) {
        let previous: BTreeSet<NaiveDate> = self.index.window().clone();
        self.index.preload(around, self.preload_window_days, source);

        // dates that stayed resident were not reloaded
        let touched: Vec<NaiveDate> = previous
            .symmetric_difference(self.index.window())
            .copied()
            .collect();
        for date in touched {
            self.invalidate_date(date);
        }
        tracing::info!(
            around = %around,
            window_days = self.preload_window_days,
            reservations = self.index.len(),
            "Preloaded reservations"
        );
    }

    /// Reload every date of the current window from `source`
    pub fn refresh(&mut self, source: &[Reservation]) {
        self.index.refresh(source);
        let dates: Vec<NaiveDate> = self.index.window().iter().copied().collect();
        for date in dates {
            self.invalidate_date(date);
        }
    }

    /// Insert or replace a reservation; `false` when it was not cached
    ///
    /// The date of any earlier copy is invalidated either way, since the
    /// index drops that copy even when the new one is rejected.
    pub fn upsert(&mut self, reservation: Reservation) -> bool {
        let previous = self.index.get(reservation.id).and_then(Reservation::date);
        let next = reservation.date();

        let cached = self.index.upsert(reservation);
        if let Some(date) = previous {
            self.invalidate_date(date);
        }
        if cached && let Some(date) = next {
            self.invalidate_date(date);
        }
        cached
    }

    pub fn remove(&mut self, reservation_id: Uuid, date: NaiveDate) -> bool {
        let removed = self.index.remove(reservation_id, date);
        if removed {
            self.invalidate_date(date);
        }
        removed
    }

    /// Drop canceled, deleted, to-handle and waiting-list entries
    pub fn purge_removed(&mut self) -> usize {
        let removed = self.index.purge_removed();
        if removed > 0 {
            self.cache.invalidate_all();
            self.orchestrator.invalidate_all();
        }
        removed
    }

    pub fn index(&self) -> &ReservationDateIndex {
        &self.index
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Replace the layout snapshot
    ///
    /// Cached clusters stay; the signature check on the next recalculation
    /// notices the difference.
    pub fn set_layout(&mut self, tables: Vec<Table>) {
        tracing::debug!(tables = tables.len(), "Layout updated");
        self.tables = tables;
    }

    /// Replace the layout and drop every cached cluster
    pub fn reset_layout(&mut self, tables: Vec<Table>) {
        self.tables = tables;
        self.cache.invalidate_all();
        self.orchestrator.invalidate_all();
        tracing::info!(tables = self.tables.len(), "Layout reset");
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    // =========================================================================
    // Clusters
    // =========================================================================

    /// Clusters of `category` at `at`, recomputed only when the floor changed
    pub fn recalculate(&mut self, at: NaiveDateTime, category: ReservationCategory) -> Arc<Vec<Cluster>> {
        self.orchestrator
            .recalculate(at, category, &self.tables, &self.index, &mut self.cache)
    }

    /// Last computed clusters; `None` when never computed or invalidated
    pub fn clusters(&mut self, date: NaiveDate, category: ReservationCategory) -> Option<Arc<Vec<Cluster>>> {
        self.cache.get(date, category)
    }

    pub fn recomputations(&self) -> u64 {
        self.orchestrator.recomputations()
    }

    pub fn cache(&self) -> &ClusterCache {
        &self.cache
    }

    pub fn orchestrator(&self) -> &ClusterOrchestrator {
        &self.orchestrator
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn active_at(&self, date: NaiveDate, at: NaiveDateTime) -> Vec<&Reservation> {
        self.index.active_at(date, at)
    }

    pub fn late_at(&self, at: NaiveDateTime) -> Vec<&Reservation> {
        self.index.late_at(at)
    }

    pub fn nearing_end_at(&self, at: NaiveDateTime) -> Vec<&Reservation> {
        self.index.nearing_end_at(at)
    }

    pub fn first_upcoming(
        &self,
        table_id: i64,
        date: NaiveDate,
        at: NaiveDateTime,
        category: ReservationCategory,
    ) -> Option<&Reservation> {
        self.index.first_upcoming(table_id, date, at, category)
    }

    pub fn reservation_at_table(
        &self,
        table_id: i64,
        at: NaiveDateTime,
        category: ReservationCategory,
    ) -> Option<&Reservation> {
        self.index.reservation_at_table(table_id, at, category)
    }

    /// Late and ending-soon reservation ids at `at`
    pub fn alerts_at(&self, at: NaiveDateTime) -> FloorAlerts {
        FloorAlerts {
            late: self.index.late_at(at).iter().map(|r| r.id).collect(),
            ending_soon: self.index.nearing_end_at(at).iter().map(|r| r.id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Acceptance, ReservationStatus, ReservationType};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        day().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn reservation(date: &str, tables: &[i64]) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            name: "Ferrari".to_string(),
            number_of_persons: 6,
            date_string: date.to_string(),
            category: ReservationCategory::Dinner,
            start_time: "19:00".to_string(),
            end_time: "21:00".to_string(),
            acceptance: Acceptance::Confirmed,
            status: ReservationStatus::Pending,
            reservation_type: ReservationType::InAdvance,
            tables: tables.to_vec(),
        }
    }

    fn engine_with(reservations: &[Reservation]) -> FloorEngine {
        let mut engine = FloorEngine::default();
        engine.set_layout(vec![Table::new(1, 1, 1), Table::new(2, 1, 4), Table::new(3, 1, 7)]);
        engine.preload(day(), reservations);
        engine
    }

    #[test]
    fn test_upsert_invalidates_clusters() {
        let mut engine = engine_with(&[reservation("2025-03-14", &[1, 2])]);
        assert_eq!(engine.recalculate(at(20, 0), ReservationCategory::Dinner).len(), 1);
        assert!(engine.clusters(day(), ReservationCategory::Dinner).is_some());

        assert!(engine.upsert(reservation("2025-03-14", &[3])));
        assert!(engine.clusters(day(), ReservationCategory::Dinner).is_none());

        engine.recalculate(at(20, 0), ReservationCategory::Dinner);
        assert_eq!(engine.recomputations(), 2);
    }

    #[test]
    fn test_upsert_outside_window_keeps_clusters() {
        let mut engine = engine_with(&[reservation("2025-03-14", &[1, 2])]);
        engine.recalculate(at(20, 0), ReservationCategory::Dinner);

        assert!(!engine.upsert(reservation("2025-06-01", &[1, 2])));
        assert!(engine.clusters(day(), ReservationCategory::Dinner).is_some());
    }

    #[test]
    fn test_rejected_move_releases_old_date() {
        let mut r = reservation("2025-03-14", &[1, 2]);
        let mut engine = engine_with(std::slice::from_ref(&r));
        assert_eq!(engine.recalculate(at(20, 0), ReservationCategory::Dinner).len(), 1);

        r.date_string = "2025-06-01".to_string();
        assert!(!engine.upsert(r.clone()));

        assert!(engine.clusters(day(), ReservationCategory::Dinner).is_none());
        assert!(engine.active_at(day(), at(20, 0)).is_empty());
        assert!(engine.recalculate(at(20, 0), ReservationCategory::Dinner).is_empty());

        r.date_string = "not-a-date".to_string();
        assert!(!engine.upsert(r));
        assert!(engine.index().is_empty());
    }

    #[test]
    fn test_remove_invalidates_clusters() {
        let r = reservation("2025-03-14", &[1, 2]);
        let id = r.id;
        let mut engine = engine_with(&[r]);
        engine.recalculate(at(20, 0), ReservationCategory::Dinner);

        assert!(engine.remove(id, day()));
        assert!(engine.clusters(day(), ReservationCategory::Dinner).is_none());
        assert!(engine.recalculate(at(20, 0), ReservationCategory::Dinner).is_empty());
    }

    #[test]
    fn test_set_layout_is_detected_by_signature() {
        let mut engine = engine_with(&[reservation("2025-03-14", &[1, 2, 3])]);
        let before = engine.recalculate(at(20, 0), ReservationCategory::Dinner);

        engine.set_layout(vec![Table::new(1, 1, 1), Table::new(2, 1, 4), Table::new(3, 10, 10)]);
        // cache still answers until the next recalculation
        assert!(engine.clusters(day(), ReservationCategory::Dinner).is_some());

        let after = engine.recalculate(at(20, 0), ReservationCategory::Dinner);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after[0].table_ids, vec![1, 2]);
    }

    #[test]
    fn test_window_slide_forgets_evicted_baselines() {
        let mut engine = engine_with(&[reservation("2025-03-14", &[1, 2])]);
        engine.recalculate(at(20, 0), ReservationCategory::Dinner);
        assert_eq!(engine.orchestrator().tracked(), 1);

        engine.preload(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(), &[]);
        assert_eq!(engine.orchestrator().tracked(), 0);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_reset_layout_drops_everything() {
        let mut engine = engine_with(&[reservation("2025-03-14", &[1, 2])]);
        engine.recalculate(at(20, 0), ReservationCategory::Dinner);

        engine.reset_layout(vec![Table::new(1, 1, 1), Table::new(2, 1, 4)]);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_alerts() {
        let mut late = reservation("2025-03-14", &[1]);
        late.start_time = "19:00".to_string();
        late.end_time = "22:00".to_string();
        let mut ending = reservation("2025-03-14", &[2]);
        ending.start_time = "18:00".to_string();
        ending.end_time = "19:30".to_string();
        ending.status = ReservationStatus::ShowedUp;

        let engine = engine_with(&[late.clone(), ending.clone()]);
        let alerts = engine.alerts_at(at(19, 20));

        assert_eq!(alerts.late, vec![late.id]);
        assert_eq!(alerts.ending_soon, vec![ending.id]);
        assert!(!alerts.is_empty());
        assert!(engine.alerts_at(at(12, 0)).is_empty());
    }

    #[test]
    fn test_purge_removed() {
        let mut canceled = reservation("2025-03-14", &[1, 2]);
        canceled.status = ReservationStatus::Canceled;
        let mut engine = engine_with(&[canceled, reservation("2025-03-14", &[3])]);
        engine.recalculate(at(20, 0), ReservationCategory::Dinner);

        assert_eq!(engine.purge_removed(), 1);
        assert_eq!(engine.index().len(), 1);
        assert!(engine.cache().is_empty());
    }
}
