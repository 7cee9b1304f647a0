//! JSON file store for engine snapshots.
//!
//! A snapshot written by a different major version is discarded on load.

use crate::engine::{EngineSnapshot, SNAPSHOT_VERSION};
use derive_more::{Display, Error};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// File name inside the state directory.
pub const STATE_FILE: &str = "kwanduh_state.json";

/// Reads and writes one snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store writing [`STATE_FILE`] inside `dir`.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STATE_FILE),
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `snapshot`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory or file cannot be written.
    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    pub fn save(&self, snapshot: &EngineSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(format!("Failed to create state dir: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StoreError::new(format!("Failed to encode snapshot: {}", e)))?;

        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, json)
            .map_err(|e| StoreError::new(format!("Failed to write snapshot: {}", e)))?;
        std::fs::rename(&staging, &self.path)
            .map_err(|e| StoreError::new(format!("Failed to replace snapshot: {}", e)))?;

        info!(version = %snapshot.version, "Snapshot saved");
        Ok(())
    }

    /// Reads the stored snapshot.
    ///
    /// Returns `None` when there is no file, or when the file was written by
    /// another major version; such a file is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<EngineSnapshot>, StoreError> {
        if !self.path.exists() {
            debug!("No snapshot stored");
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::new(format!("Failed to read snapshot: {}", e)))?;

        let raw: serde_json::Value = serde_json::from_str(&json)
            .map_err(|e| StoreError::new(format!("Failed to parse snapshot: {}", e)))?;
        let version = raw
            .get("version")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if major(version) != major(SNAPSHOT_VERSION) {
            warn!(
                stored = version,
                running = SNAPSHOT_VERSION,
                "Discarding snapshot from another major version"
            );
            self.clear()?;
            return Ok(None);
        }

        let snapshot: EngineSnapshot = serde_json::from_value(raw)
            .map_err(|e| StoreError::new(format!("Failed to decode snapshot: {}", e)))?;
        info!(version = %snapshot.version, saved_at = %snapshot.saved_at, "Snapshot loaded");
        Ok(Some(snapshot))
    }

    /// Deletes the stored snapshot, if any.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Snapshot removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::new(format!("Failed to remove snapshot: {}", e))),
        }
    }
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or_default()
}

/// Snapshot store error.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_component() {
        assert_eq!(major("1.4.2"), "1");
        assert_eq!(major("0.1.0"), "0");
        assert_eq!(major(""), "");
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.message.contains("Failed to parse snapshot"));
    }
}
