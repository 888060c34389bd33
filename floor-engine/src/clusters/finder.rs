//! Cluster finder
//!
//! Groups the tables of one reservation into physically connected
//! components. Adjacency is edge contact only: two tables touch when their
//! origins differ by exactly one footprint along a single axis. Corner
//! contact does not join a cluster.

use std::collections::{HashSet, VecDeque};

use shared::{Cluster, GridRect, Reservation, Table};
use uuid::Uuid;

/// Whether two tables share an edge
pub fn adjacent(a: &Table, b: &Table) -> bool {
    let row_diff = a.row.abs_diff(b.row);
    let column_diff = a.column.abs_diff(b.column);

    (row_diff == Table::HEIGHT.unsigned_abs() && column_diff == 0)
        || (column_diff == Table::WIDTH.unsigned_abs() && row_diff == 0)
}

/// Partition tables into connected components (BFS)
///
/// Each table is visited exactly once. Components keep discovery order and
/// include singletons; callers decide what size is meaningful.
pub fn connected_components<'a>(tables: &[&'a Table]) -> Vec<Vec<&'a Table>> {
    let mut visited: HashSet<i64> = HashSet::with_capacity(tables.len());
    let mut components = Vec::new();

    for &seed in tables {
        if !visited.insert(seed.id) {
            continue;
        }

        let mut component = Vec::new();
        let mut frontier = VecDeque::from([seed]);
        while let Some(current) = frontier.pop_front() {
            component.push(current);
            for &neighbor in tables {
                if !visited.contains(&neighbor.id) && adjacent(current, neighbor) {
                    visited.insert(neighbor.id);
                    frontier.push_back(neighbor);
                }
            }
        }
        components.push(component);
    }

    components
}

/// Grid-unit bounding box of a set of tables; `None` when empty
pub fn bounding_box(tables: &[&Table]) -> Option<GridRect> {
    let min_row = tables.iter().map(|t| t.row).min()?;
    let min_column = tables.iter().map(|t| t.column).min()?;
    let max_row = tables.iter().map(|t| t.row.saturating_add(t.height())).max()?;
    let max_column = tables.iter().map(|t| t.column.saturating_add(t.width())).max()?;

    Some(GridRect {
        row: min_row,
        column: min_column,
        width: max_column.saturating_sub(min_column),
        height: max_row.saturating_sub(min_row),
    })
}

/// Stateless cluster computation (拼桌识别)
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterFinder;

impl ClusterFinder {
    /// Clusters formed by the tables `reservation` occupies
    ///
    /// Fewer than two matching tables, or tables that are all isolated,
    /// produce no clusters. Every returned cluster gets a fresh id.
    pub fn clusters_for(&self, reservation: &Reservation, tables: &[Table]) -> Vec<Cluster> {
        let held: Vec<&Table> = tables
            .iter()
            .filter(|t| reservation.occupies(t.id))
            .collect();
        if held.len() < 2 {
            return Vec::new();
        }

        let Some(date) = reservation.date() else {
            tracing::warn!(
                reservation_id = %reservation.id,
                date_string = %reservation.date_string,
                "Cannot cluster reservation with invalid date"
            );
            return Vec::new();
        };

        connected_components(&held)
            .into_iter()
            .filter(|component| component.len() >= 2)
            .filter_map(|component| {
                let bounding_box = bounding_box(&component)?;
                Some(Cluster {
                    id: Uuid::new_v4(),
                    reservation_id: reservation.id,
                    table_ids: component.iter().map(|t| t.id).collect(),
                    date,
                    category: reservation.category,
                    bounding_box,
                })
            })
            .collect()
    }
}
