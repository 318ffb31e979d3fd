use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::records::{RawPeriodEntry, RawPrediction, RawSymptomLog};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("data directory not found")]
    NoDataDir,
}

/// One export of the three tracker endpoints, read as a unit so every
/// computation sees a consistent view of the logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSnapshot {
    #[serde(default)]
    pub period_entries: Vec<RawPeriodEntry>,
    #[serde(default)]
    pub symptom_logs: Vec<RawSymptomLog>,
    #[serde(default)]
    pub prediction: Option<RawPrediction>,
}

/// Default snapshot location under the user's local data directory.
pub fn default_snapshot_path() -> Result<PathBuf, StorageError> {
    Ok(dirs::data_local_dir()
        .ok_or(StorageError::NoDataDir)?
        .join("cykel")
        .join("snapshot.json"))
}

/// Load a snapshot. The file is only ever read.
pub fn load(path: &Path) -> Result<LogSnapshot, StorageError> {
    let bytes = fs::read(path)?;
    let snapshot: LogSnapshot = serde_json::from_slice(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        period_entries = snapshot.period_entries.len(),
        symptom_logs = snapshot.symptom_logs.len(),
        has_prediction = snapshot.prediction.is_some(),
        "loaded log snapshot"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn loads_snapshot_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("snapshot.json");
        fs::write(
            &path,
            r#"{
                "period_entries": [
                    {"id": 2, "start_date": "2025-01-29", "end_date": "2025-02-02", "period_length": 5},
                    {"id": 1, "start_date": "2025-01-01", "end_date": "2025-01-05", "period_length": 5}
                ],
                "symptom_logs": [{"date": "2025-01-03", "symptoms": ["Cramps"]}],
                "prediction": null
            }"#,
        )
        .unwrap();

        let snapshot = load(&path).unwrap();
        assert_eq!(snapshot.period_entries.len(), 2);
        assert_eq!(snapshot.symptom_logs.len(), 1);
        assert!(snapshot.prediction.is_none());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("snapshot.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(load(&path).unwrap(), LogSnapshot::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.child("absent.json")).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("snapshot.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path), Err(StorageError::Serialization(_))));
    }
}
