//! Durable storage for the task collection.
//!
//! Saves follow a backup-then-write sequence:
//!
//! 1. rename the live file to a `.bak` sibling (clobbering any older one)
//! 2. write the full record array, pretty-printed
//! 3. on success delete the `.bak`; on failure restore it to the live path
//!
//! The sequence is not atomic across steps: a crash between 1 and 2 leaves
//! only the `.bak` behind, and `load()` reads the live path only. Loading
//! is fail-open: a missing, malformed, or wrong-shaped file yields an
//! empty collection rather than a startup failure.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::task::TaskRecord;

/// Suffix of the transient backup file kept during the save window
pub const BACKUP_EXTENSION: &str = "bak";

/// Storage manager for the task data file
#[derive(Debug, Clone)]
pub struct Storage {
    data_file: PathBuf,
}

impl Storage {
    pub fn new(data_file: PathBuf) -> Self {
        Self { data_file }
    }

    /// Path to the live data file
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Path to the backup sibling used during saves
    pub fn backup_file(&self) -> PathBuf {
        let mut name = self.data_file.as_os_str().to_os_string();
        name.push(".");
        name.push(BACKUP_EXTENSION);
        PathBuf::from(name)
    }

    /// Create the directory the data file lives in, if any
    pub fn ensure_dirs(&self) -> Result<()> {
        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Load the record collection from the data file.
    ///
    /// A missing file is a first run, not an error. Malformed content or a
    /// top-level shape that is not an array logs and yields an empty
    /// collection. Entries missing `id` or `title` are skipped with a
    /// warning; other missing fields are defaulted.
    pub fn load(&self) -> Result<Vec<TaskRecord>> {
        if !self.data_file.exists() {
            tracing::info!("no existing data file at {}, starting fresh", self.data_file.display());
            return Ok(Vec::new());
        }

        let content = match fs::read_to_string(&self.data_file) {
            Ok(content) => content,
            Err(err) => {
                tracing::error!("error reading {}: {err}", self.data_file.display());
                return Ok(Vec::new());
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!("error parsing {}: {err}", self.data_file.display());
                return Ok(Vec::new());
            }
        };

        let items = match value {
            serde_json::Value::Array(items) => items,
            _ => {
                tracing::warn!("invalid data format in {}, starting fresh", self.data_file.display());
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<TaskRecord>(item.clone()) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!("skipping invalid task entry {item}: {err}");
                }
            }
        }

        tracing::info!(
            "loaded {} tasks from {}",
            records.len(),
            self.data_file.display()
        );
        Ok(records)
    }

    /// Save the full record collection.
    ///
    /// On write failure the previous file contents are restored from the
    /// backup (best effort) and `Error::Persistence` is returned; any
    /// in-memory mutation the caller already applied is kept.
    pub fn save(&self, records: &[TaskRecord]) -> Result<()> {
        self.ensure_dirs()?;

        let backup = self.backup_file();
        let had_previous = self.data_file.exists();
        if had_previous {
            fs::rename(&self.data_file, &backup).map_err(|err| Error::Persistence {
                path: self.data_file.clone(),
                reason: format!("could not move previous file aside: {err}"),
            })?;
        }

        match self.write_records(records) {
            Ok(()) => {
                if backup.exists() {
                    let _ = fs::remove_file(&backup);
                }
                tracing::debug!(
                    "saved {} tasks to {}",
                    records.len(),
                    self.data_file.display()
                );
                Ok(())
            }
            Err(err) => {
                if had_previous && backup.exists() {
                    let _ = fs::rename(&backup, &self.data_file);
                }
                tracing::error!("failed to save tasks: {err}");
                Err(Error::Persistence {
                    path: self.data_file.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }

    fn write_records(&self, records: &[TaskRecord]) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        let mut file = File::create(&self.data_file)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Status};
    use tempfile::TempDir;

    fn record(id: u64, title: &str) -> TaskRecord {
        TaskRecord::new(id, title.to_string(), String::new(), Priority::Medium)
    }

    fn storage_in(temp: &TempDir) -> Storage {
        Storage::new(temp.path().join("todos.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        let records = vec![record(1, "first"), record(2, "second")];
        storage.save(&records).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, records);
        assert!(!storage.backup_file().exists());
    }

    #[test]
    fn save_is_idempotent_byte_for_byte() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        let records = vec![record(1, "stable")];
        storage.save(&records).unwrap();
        let first = std::fs::read(storage.data_file()).unwrap();

        let reloaded = storage.load().unwrap();
        storage.save(&reloaded).unwrap();
        let second = std::fs::read(storage.data_file()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn output_is_pretty_printed() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);
        storage.save(&[record(1, "indent me")]).unwrap();

        let content = std::fs::read_to_string(storage.data_file()).unwrap();
        assert!(content.contains('\n'));
        assert!(content.contains("  \"id\": 1"));
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);
        std::fs::write(storage.data_file(), "{not json").unwrap();

        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn non_array_top_level_loads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);
        std::fs::write(storage.data_file(), "{\"tasks\": []}").unwrap();

        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn invalid_entries_are_skipped_not_fatal() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);
        std::fs::write(
            storage.data_file(),
            r#"[
                {"id": 1, "title": "keep me"},
                {"description": "no id or title"},
                {"id": 2, "title": "also kept", "status": "completed",
                 "completed_at": "2024-05-01T12:00:00Z"}
            ]"#,
        )
        .unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "keep me");
        assert_eq!(loaded[1].status, Status::Completed);
        assert!(loaded[1].completed_at.is_some());
    }

    #[test]
    fn failed_save_leaves_previous_file_intact() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        storage.save(&[record(1, "original")]).unwrap();

        // A directory squatting on the backup path makes the move-aside
        // step fail before the live file is touched
        std::fs::create_dir(storage.backup_file()).unwrap();

        let err = storage.save(&[record(2, "doomed")]).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "original");
    }

    #[test]
    fn stale_backup_is_not_read_at_startup() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        // Simulate a crash between the rename and the write: only the
        // backup survives
        storage.save(&[record(1, "survivor")]).unwrap();
        std::fs::rename(storage.data_file(), storage.backup_file()).unwrap();

        assert!(storage.load().unwrap().is_empty());
        assert!(storage.backup_file().exists());
    }

    #[test]
    fn save_into_missing_directory_creates_it() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("nested/dir/todos.json"));
        storage.save(&[record(1, "nested")]).unwrap();
        assert!(storage.data_file().exists());
    }
}
