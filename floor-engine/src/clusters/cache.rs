//! Cluster cache
//!
//! Per `(date, category)` store of the last computed clusters. Entries are
//! shared as `Arc<Vec<Cluster>>` so a reused result keeps its identity.
//! Bounded: once `max_entries` is exceeded the least recently accessed
//! entries are evicted.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use shared::{Cluster, ReservationCategory};

/// Cache key: one service on one date
pub type ClusterKey = (NaiveDate, ReservationCategory);

/// Default bound on cached `(date, category)` entries
pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone)]
pub struct ClusterCacheEntry {
    pub clusters: Arc<Vec<Cluster>>,
    /// Logical access stamp, strictly increasing across the cache
    pub last_accessed: u64,
}

#[derive(Debug)]
pub struct ClusterCache {
    entries: HashMap<ClusterKey, ClusterCacheEntry>,
    max_entries: usize,
    clock: u64,
}

impl Default for ClusterCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl ClusterCache {
    /// `max_entries` is clamped to at least one entry
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Cached clusters for a service, refreshing its access stamp
    ///
    /// `None` means never computed; `Some` with an empty list means computed
    /// and nothing clustered.
    pub fn get(&mut self, date: NaiveDate, category: ReservationCategory) -> Option<Arc<Vec<Cluster>>> {
        let stamp = self.tick();
        let entry = self.entries.get_mut(&(date, category))?;
        entry.last_accessed = stamp;
        tracing::debug!(date = %date, category = %category, clusters = entry.clusters.len(), "Cluster cache hit");
        Some(Arc::clone(&entry.clusters))
    }

    /// Like [`get`](Self::get) without touching the access stamp
    pub fn peek(&self, date: NaiveDate, category: ReservationCategory) -> Option<Arc<Vec<Cluster>>> {
        self.entries
            .get(&(date, category))
            .map(|entry| Arc::clone(&entry.clusters))
    }

    /// Insert or replace a service's clusters, evicting LRU entries past the bound
    pub fn put(
        &mut self,
        date: NaiveDate,
        category: ReservationCategory,
        clusters: Vec<Cluster>,
    ) -> Arc<Vec<Cluster>> {
        let clusters = Arc::new(clusters);
        let stamp = self.tick();
        self.entries.insert(
            (date, category),
            ClusterCacheEntry {
                clusters: Arc::clone(&clusters),
                last_accessed: stamp,
            },
        );
        tracing::debug!(date = %date, category = %category, clusters = clusters.len(), "Clusters cached");

        self.enforce_limit();
        clusters
    }

    fn enforce_limit(&mut self) {
        while self.entries.len() > self.max_entries {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_accessed)
                .map(|(key, _)| *key)
            else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::debug!(date = %oldest.0, category = %oldest.1, "Evicted LRU cluster entry");
        }
    }

    /// Drop one service's entry
    pub fn invalidate(&mut self, date: NaiveDate, category: ReservationCategory) {
        if self.entries.remove(&(date, category)).is_some() {
            tracing::debug!(date = %date, category = %category, "Cluster cache invalidated");
        }
    }

    /// Drop every category cached for a date
    pub fn invalidate_date(&mut self, date: NaiveDate) {
        let before = self.entries.len();
        self.entries.retain(|(d, _), _| *d != date);
        if self.entries.len() != before {
            tracing::debug!(date = %date, removed = before - self.entries.len(), "Cluster cache invalidated for date");
        }
    }

    /// Drop everything, used when the layout is reset wholesale
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        tracing::info!("All cluster caches invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
