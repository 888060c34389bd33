//! Table Model

use serde::{Deserialize, Serialize};

/// Physical dining table on the floor grid (桌台)
///
/// Positions are in grid units. Every table occupies a fixed 3×3 footprint,
/// so two tables touch when their origins differ by exactly one footprint
/// along a single axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Table {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub max_capacity: i32,
    pub row: i32,
    pub column: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

fn default_true() -> bool {
    true
}

impl Table {
    /// Footprint width in grid units
    pub const WIDTH: i32 = 3;
    /// Footprint height in grid units
    pub const HEIGHT: i32 = 3;

    pub fn new(id: i64, row: i32, column: i32) -> Self {
        Self {
            id,
            name: format!("T{}", id),
            max_capacity: 4,
            row,
            column,
            is_visible: true,
        }
    }

    pub fn width(&self) -> i32 {
        Self::WIDTH
    }

    pub fn height(&self) -> i32 {
        Self::HEIGHT
    }

    /// Builder-style visibility toggle
    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }
}

/// Axis-aligned rectangle in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub row: i32,
    pub column: i32,
    pub width: i32,
    pub height: i32,
}
