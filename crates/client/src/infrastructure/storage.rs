//! Key-value storage implementations
//!
//! `FileStorage` survives process restarts by mirroring its map into a JSON
//! file; `MemoryStorage` lives only as long as the process.

use crate::infrastructure::ports::{StorageError, StoragePort};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

type Entries = HashMap<String, String>;

/// File-backed storage.
///
/// The default location comes from [`default_storage_path`]:
/// - Linux: ~/.config/timetrack/storage.json
/// - macOS: ~/Library/Application Support/io.timetrack.timetrack/storage.json
/// - Windows: C:\Users\<User>\AppData\Roaming\timetrack\timetrack\config\storage.json
///
/// A write only lands in memory once the whole map has been written to disk,
/// so what `load` returns is always what a restarted process will see.
pub struct FileStorage {
    storage_path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStorage {
    /// Open storage backed by `storage_path`.
    ///
    /// A missing file starts out empty, as does one that cannot be read or
    /// parsed; the next successful write replaces it.
    pub fn open(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        let entries = read_entries(&storage_path);

        tracing::debug!(path = ?storage_path, entries = entries.len(), "Opened token storage");

        Self {
            storage_path,
            entries: Mutex::new(entries),
        }
    }

    /// Apply `change` to a copy of the map, write it out, then commit it.
    fn write_through(&self, change: impl FnOnce(&mut Entries) -> bool) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }

        write_entries(&self.storage_path, &next).map_err(|e| {
            tracing::error!(path = ?self.storage_path, error = %e, "Token storage not updated");
            e
        })?;
        *entries = next;
        Ok(())
    }
}

impl StoragePort for FileStorage {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_through(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.write_through(|entries| entries.remove(key).is_some())
    }
}

/// Process-local storage, nothing is written to disk.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<Entries>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Default location of the storage file.
pub fn default_storage_path() -> PathBuf {
    match ProjectDirs::from("io", "timetrack", "timetrack") {
        Some(dirs) => dirs.config_dir().join("storage.json"),
        None => PathBuf::from("timetrack_storage.json"),
    }
}

fn read_entries(path: &Path) -> Entries {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Entries::new(),
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Token storage unreadable, starting empty");
            return Entries::new();
        }
    };

    serde_json::from_str(&data).unwrap_or_else(|e| {
        tracing::warn!(path = ?path, error = %e, "Token storage corrupt, starting empty");
        Entries::new()
    })
}

/// Write the map next to `path` and rename it into place.
fn write_entries(path: &Path, entries: &Entries) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| StorageError::Io(format!("{}: {e}", dir.display())))?;
    }

    let data = serde_json::to_string_pretty(entries)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    let staging = path.with_extension("json.tmp");
    fs::write(&staging, data)
        .map_err(|e| StorageError::Io(format!("{}: {e}", staging.display())))?;
    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        StorageError::Io(format!("{}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::storage_keys;

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path);
        storage.save(storage_keys::TOKEN, "abc").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.load(storage_keys::TOKEN), Some("abc".to_string()));
    }

    #[test]
    fn file_storage_remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = FileStorage::open(&path);
        storage.save(storage_keys::TOKEN, "abc").unwrap();
        storage.remove(storage_keys::TOKEN).unwrap();
        // Removing a missing key is a no-op
        storage.remove(storage_keys::TOKEN).unwrap();

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.load(storage_keys::TOKEN), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.load(storage_keys::TOKEN), None);

        storage.save(storage_keys::TOKEN, "fresh").unwrap();
        assert_eq!(
            FileStorage::open(&path).load(storage_keys::TOKEN),
            Some("fresh".to_string())
        );
    }

    #[test]
    fn unwritable_path_fails_save_and_keeps_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("storage.json");

        let storage = FileStorage::open(&path);
        let err = storage.save(storage_keys::TOKEN, "abc").unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(storage.load(storage_keys::TOKEN), None);
        assert_eq!(FileStorage::open(&path).load(storage_keys::TOKEN), None);
    }

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load("k"), None);

        storage.save("k", "v1").unwrap();
        storage.save("k", "v2").unwrap();
        assert_eq!(storage.load("k"), Some("v2".to_string()));

        storage.remove("k").unwrap();
        assert_eq!(storage.load("k"), None);
    }
}
