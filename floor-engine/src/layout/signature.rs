//! Layout signature (布局指纹)
//!
//! SHA-256 over the visible tables' `(id, row, column)` triples, sorted by id
//! so the input order never matters.

use std::fmt;

use sha2::{Digest, Sha256};
use shared::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutSignature([u8; 32]);

impl LayoutSignature {
    /// Fingerprint the visible part of a layout snapshot
    pub fn of(tables: &[Table]) -> Self {
        let mut visible: Vec<(i64, i32, i32)> = tables
            .iter()
            .filter(|t| t.is_visible)
            .map(|t| (t.id, t.row, t.column))
            .collect();
        visible.sort_unstable();

        let mut hasher = Sha256::new();
        hasher.update((visible.len() as u64).to_be_bytes());
        for (id, row, column) in &visible {
            hasher.update(id.to_be_bytes());
            hasher.update(row.to_be_bytes());
            hasher.update(column.to_be_bytes());
        }

        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for LayoutSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Vec<Table> {
        vec![Table::new(1, 1, 1), Table::new(2, 1, 4), Table::new(3, 1, 7)]
    }

    #[test]
    fn test_order_independent() {
        let mut reversed = layout();
        reversed.reverse();
        assert_eq!(LayoutSignature::of(&layout()), LayoutSignature::of(&reversed));
    }

    #[test]
    fn test_move_changes_signature() {
        let mut moved = layout();
        moved[1].column = 5;
        assert_ne!(LayoutSignature::of(&layout()), LayoutSignature::of(&moved));
    }

    #[test]
    fn test_visibility_changes_signature() {
        let mut toggled = layout();
        toggled[2].is_visible = false;
        assert_ne!(LayoutSignature::of(&layout()), LayoutSignature::of(&toggled));
    }

    #[test]
    fn test_add_and_remove_change_signature() {
        let base = LayoutSignature::of(&layout());

        let mut added = layout();
        added.push(Table::new(4, 4, 1));
        assert_ne!(base, LayoutSignature::of(&added));

        let mut removed = layout();
        removed.pop();
        assert_ne!(base, LayoutSignature::of(&removed));
    }

    #[test]
    fn test_hidden_tables_do_not_count() {
        let mut with_hidden = layout();
        with_hidden.push(Table::new(9, 20, 20).hidden());
        assert_eq!(LayoutSignature::of(&layout()), LayoutSignature::of(&with_hidden));
    }

    #[test]
    fn test_names_do_not_count() {
        let mut renamed = layout();
        renamed[0].name = "Window".to_string();
        assert_eq!(LayoutSignature::of(&layout()), LayoutSignature::of(&renamed));
    }

    #[test]
    fn test_hex_rendering() {
        let signature = LayoutSignature::of(&[]);
        let hex = signature.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
