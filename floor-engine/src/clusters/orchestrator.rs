//! Cluster recalculation orchestrator
//!
//! Decides whether a `(date, category)` service needs its clusters
//! recomputed. Two cheap checks guard the expensive path: the number of
//! reserved visible tables, then the layout signature. Only when either
//! moved (or nothing is cached) does the finder run again.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use shared::{Cluster, ReservationCategory, Table};

use super::cache::{ClusterCache, ClusterKey};
use super::finder::ClusterFinder;
use crate::layout::LayoutSignature;
use crate::reservations::ReservationDateIndex;

/// Lifecycle of one service's cluster set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterState {
    /// No usable baseline, next trigger recomputes
    #[default]
    Stale,
    /// Only held inside [`ClusterOrchestrator::recalculate`], which takes
    /// `&mut self`, so [`ClusterOrchestrator::state`] never reports it
    Computing,
    Fresh,
}

/// What the floor looked like when clusters were last computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub reserved_tables: usize,
    pub signature: LayoutSignature,
}

#[derive(Debug, Default)]
struct Context {
    state: ClusterState,
    baseline: Option<Baseline>,
}

#[derive(Debug, Default)]
pub struct ClusterOrchestrator {
    finder: ClusterFinder,
    contexts: HashMap<ClusterKey, Context>,
    recomputations: u64,
}

impl ClusterOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clusters for the service `category` on `at`'s date
    ///
    /// Returns the cached `Arc` untouched when the reserved-table count and
    /// the layout signature both match the baseline. Otherwise recomputes
    /// from the reservations active at `at`, stores the result and records a
    /// new baseline.
    pub fn recalculate(
        &mut self,
        at: NaiveDateTime,
        category: ReservationCategory,
        tables: &[Table],
        index: &ReservationDateIndex,
        cache: &mut ClusterCache,
    ) -> Arc<Vec<Cluster>> {
        let date = at.date();
        let key = (date, category);

        let visible: Vec<Table> = tables.iter().filter(|t| t.is_visible).cloned().collect();
        let reserved_tables = visible
            .iter()
            .filter(|t| index.reservation_at_table(t.id, at, category).is_some())
            .count();

        let baseline = self.contexts.get(&key).and_then(|ctx| ctx.baseline);
        if let Some(baseline) = baseline
            && baseline.reserved_tables == reserved_tables
            && let Some(cached) = cache.get(date, category)
        {
            let signature = LayoutSignature::of(&visible);
            if signature == baseline.signature {
                tracing::debug!(
                    date = %date,
                    category = %category,
                    reserved_tables,
                    "Layout unchanged, reusing clusters"
                );
                return cached;
            }
            tracing::debug!(date = %date, category = %category, "Layout signature changed");
        }

        self.context_mut(key).state = ClusterState::Computing;

        let clusters: Vec<Cluster> = index
            .active_at(date, at)
            .into_iter()
            .filter(|r| r.category == category)
            .filter(|r| !r.status.is_removed() && !r.is_waiting_list())
            .flat_map(|r| self.finder.clusters_for(r, &visible))
            .collect();

        let stored = cache.put(date, category, clusters);
        let signature = LayoutSignature::of(&visible);
        let ctx = self.context_mut(key);
        ctx.baseline = Some(Baseline {
            reserved_tables,
            signature,
        });
        ctx.state = ClusterState::Fresh;
        self.recomputations += 1;

        tracing::info!(
            date = %date,
            category = %category,
            reserved_tables,
            clusters = stored.len(),
            signature = %signature,
            "Clusters recalculated"
        );
        stored
    }

    fn context_mut(&mut self, key: ClusterKey) -> &mut Context {
        self.contexts.entry(key).or_default()
    }

    /// Forget the baseline of one service; it reads as stale afterwards
    pub fn invalidate(&mut self, date: NaiveDate, category: ReservationCategory) {
        self.contexts.remove(&(date, category));
    }

    /// Forget the baselines of every category on a date
    pub fn invalidate_date(&mut self, date: NaiveDate) {
        self.contexts.retain(|(d, _), _| *d != date);
    }

    pub fn invalidate_all(&mut self) {
        self.contexts.clear();
    }

    pub fn state(&self, key: ClusterKey) -> ClusterState {
        self.contexts
            .get(&key)
            .map(|ctx| ctx.state)
            .unwrap_or_default()
    }

    /// Services currently holding a baseline
    pub fn tracked(&self) -> usize {
        self.contexts.len()
    }

    pub fn baseline(&self, key: ClusterKey) -> Option<Baseline> {
        self.contexts.get(&key).and_then(|ctx| ctx.baseline)
    }

    /// How many times the finder actually ran
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
