//! Cluster Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reservation::ReservationCategory;
use super::table::GridRect;

/// Connected group of at least two physically adjacent tables held by one
/// reservation (拼桌)
///
/// Created by a recompute pass and never mutated afterwards; the next
/// recompute supersedes it with fresh identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub table_ids: Vec<i64>,
    pub date: NaiveDate,
    pub category: ReservationCategory,
    /// Bounding box in grid units; pixel conversion belongs to the renderer
    pub bounding_box: GridRect,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.table_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table_ids.is_empty()
    }
}
