use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{SettingsStore, StoreError, StoredValue};

#[derive(Debug, Default)]
struct Document {
    values: BTreeMap<String, StoredValue>,
    dirty: bool,
}

/// Settings store persisted as a flat JSON object on disk.
///
/// The document is read once by [`open`](Self::open). Writes stay in memory
/// until [`flush`](SettingsStore::flush), which replaces the file atomically
/// by writing a sibling temporary file and renaming it over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<Document>,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading existing values when the file exists.
    ///
    /// A missing file yields an empty store; the file is created on the first
    /// flush.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|error| StoreError::json(&path, error))?
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(StoreError::io("failed to read", &path, error)),
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "opened settings store");

        Ok(Self {
            path,
            document: Mutex::new(Document {
                values,
                dirty: false,
            }),
        })
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reports whether unflushed writes are pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_document(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|error| StoreError::io("failed to create directory", parent, error))?;
        }

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp)
            .map_err(|error| StoreError::io("failed to create", &temp, error))?;
        file.write_all(bytes)
            .and_then(|()| file.sync_all())
            .map_err(|error| StoreError::io("failed to write", &temp, error))?;
        drop(file);

        fs::rename(&temp, &self.path)
            .map_err(|error| StoreError::io("failed to replace", &self.path, error))
    }
}

impl SettingsStore for JsonFileStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.lock()
            .values
            .get(key)
            .and_then(StoredValue::as_str)
            .map_or_else(|| default.to_owned(), str::to_owned)
    }

    fn set_string(&self, key: &str, value: &str) {
        let mut document = self.lock();
        document
            .values
            .insert(key.to_owned(), StoredValue::Str(value.to_owned()));
        document.dirty = true;
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.lock()
            .values
            .get(key)
            .and_then(StoredValue::as_int)
            .unwrap_or(default)
    }

    fn set_int(&self, key: &str, value: i32) {
        let mut document = self.lock();
        document
            .values
            .insert(key.to_owned(), StoredValue::Int(value));
        document.dirty = true;
    }

    fn has_key(&self, key: &str) -> bool {
        self.lock().values.contains_key(key)
    }

    fn delete_key(&self, key: &str) {
        let mut document = self.lock();
        if document.values.remove(key).is_some() {
            document.dirty = true;
        }
    }

    fn flush(&self) -> Result<(), StoreError> {
        // Serialize and write while holding the lock so concurrent flushes
        // cannot reorder snapshots on disk.
        let mut document = self.lock();
        if !document.dirty {
            return Ok(());
        }

        let bytes = serde_json::to_vec_pretty(&document.values)
            .map_err(|error| StoreError::json(&self.path, error))?;
        self.write_document(&bytes)?;
        document.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path().join("prefs.json")).expect("open");
        assert!(!store.has_key("anything"));
        assert!(!store.is_dirty());
    }

    #[test]
    fn flush_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("prefs.json");
        let store = JsonFileStore::open(&path).expect("open");
        store.set_int("k", 1);
        assert!(store.is_dirty());
        store.flush().expect("flush");
        assert!(path.exists());
        assert!(!store.is_dirty());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn malformed_document_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"{ not json").expect("write");
        let error = JsonFileStore::open(&path).expect_err("must fail");
        assert!(matches!(error, StoreError::Json { .. }));
    }

    #[test]
    fn blank_document_opens_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"  \n").expect("write");
        let store = JsonFileStore::open(&path).expect("open");
        assert!(!store.has_key("k"));
    }

    #[test]
    fn deleting_absent_key_keeps_store_clean() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path().join("prefs.json")).expect("open");
        store.delete_key("absent");
        assert!(!store.is_dirty());
    }
}
