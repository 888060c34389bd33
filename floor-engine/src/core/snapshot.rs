//! JSON floor snapshot used to seed the engine at startup

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult, ErrorCode, Reservation, Table};

/// Layout plus reservation book as one JSON document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSnapshot {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl FloorSnapshot {
    /// Read and decode a snapshot file, rejecting duplicate table ids
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_message(ErrorCode::SnapshotReadFailed, e.to_string())
                .with_detail("path", path.display().to_string())
        })?;

        let snapshot = Self::from_json(&raw)
            .map_err(|e| e.with_detail("path", path.display().to_string()))?;

        tracing::info!(
            path = %path.display(),
            tables = snapshot.tables.len(),
            reservations = snapshot.reservations.len(),
            "Loaded floor snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        let snapshot: Self = serde_json::from_str(raw)
            .map_err(|e| AppError::with_message(ErrorCode::SnapshotDecodeFailed, e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::with_capacity(self.tables.len());
        for table in &self.tables {
            if !seen.insert(table.id) {
                return Err(AppError::with_message(
                    ErrorCode::InvalidLayout,
                    format!("Duplicate table id {}", table.id),
                )
                .with_detail("table_id", table.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "tables": [
            { "id": 1, "name": "T1", "max_capacity": 4, "row": 1, "column": 1 },
            { "id": 2, "row": 1, "column": 4, "is_visible": false }
        ],
        "reservations": [
            {
                "id": "6f1c1f0e-58b3-4b8f-9a55-0c7f3d9e2a11",
                "name": "Bianchi",
                "number_of_persons": 6,
                "date_string": "2025-03-14",
                "category": "dinner",
                "start_time": "19:00",
                "end_time": "21:00",
                "status": "pending",
                "tables": [1, 2]
            }
        ]
    }"#;

    #[test]
    fn test_from_json_applies_defaults() {
        let snapshot = FloorSnapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.tables.len(), 2);
        assert!(snapshot.tables[0].is_visible);
        assert!(!snapshot.tables[1].is_visible);
        assert_eq!(snapshot.tables[1].name, "");

        let reservation = &snapshot.reservations[0];
        assert_eq!(reservation.acceptance, shared::Acceptance::Confirmed);
        assert_eq!(reservation.reservation_type, shared::ReservationType::InAdvance);
        assert_eq!(reservation.tables, vec![1, 2]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshot = FloorSnapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.reservations.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FloorSnapshot::load(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::SnapshotReadFailed);
        assert!(err.details.unwrap().contains_key("path"));
    }

    #[test]
    fn test_malformed_json() {
        let err = FloorSnapshot::from_json("{ not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::SnapshotDecodeFailed);
    }

    #[test]
    fn test_duplicate_table_ids_rejected() {
        let raw = r#"{ "tables": [ { "id": 7, "row": 0, "column": 0 }, { "id": 7, "row": 0, "column": 3 } ] }"#;
        let err = FloorSnapshot::from_json(raw).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLayout);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(FloorSnapshot::from_json("{}").unwrap(), FloorSnapshot::default());
    }
}
