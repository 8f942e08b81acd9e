use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::{SettingsStore, StoreError, StoredValue};

/// Settings store that keeps every value in process memory.
///
/// `flush` is a no-op. Useful for tests and for embedding hosts that persist
/// settings elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<FxHashMap<String, StoredValue>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Reports whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns a sorted snapshot of every stored key.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, StoredValue>> {
        // A poisoned map is still structurally valid; keep serving it.
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SettingsStore for MemoryStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.lock()
            .get(key)
            .and_then(StoredValue::as_str)
            .map_or_else(|| default.to_owned(), str::to_owned)
    }

    fn set_string(&self, key: &str, value: &str) {
        self.lock()
            .insert(key.to_owned(), StoredValue::Str(value.to_owned()));
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.lock()
            .get(key)
            .and_then(StoredValue::as_int)
            .unwrap_or(default)
    }

    fn set_int(&self, key: &str, value: i32) {
        self.lock().insert(key.to_owned(), StoredValue::Int(value));
    }

    fn has_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn delete_key(&self, key: &str) {
        self.lock().remove(key);
    }

    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
