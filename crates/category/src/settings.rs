//! crates/category/src/settings.rs
//! Per-category settings record and its persistence.

use settings_store::{SettingsStore, StoreError};

use crate::{CategoryId, keys};

/// Name carried by a record that has not been loaded or assigned.
pub const DEFAULT_CATEGORY_NAME: &str = "no category assigned";

/// The three independent switches of a category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategorySwitches {
    /// Emit this category's logs to the console sink.
    pub console_logging: bool,
    /// Emit this category's logs to the log file.
    pub file_logging: bool,
    /// Evaluate this category's assertions.
    pub asserts: bool,
}

impl CategorySwitches {
    /// Reports whether at least one sink would receive output.
    #[must_use]
    pub const fn any_sink(self) -> bool {
        self.console_logging || self.file_logging
    }
}

impl Default for CategorySwitches {
    fn default() -> Self {
        Self {
            console_logging: true,
            file_logging: false,
            asserts: true,
        }
    }
}

/// Persisted record for one registered category.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategorySettings {
    /// User-assigned category name.
    pub name: String,
    /// Id assigned by the registry.
    pub id: CategoryId,
    /// Output and assertion switches.
    pub switches: CategorySwitches,
}

impl CategorySettings {
    /// Creates a record with default switches.
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id,
            switches: CategorySwitches::default(),
        }
    }

    /// Loads the record stored for `id`, or `None` when no name key exists.
    pub fn load<S>(store: &S, id: CategoryId) -> Option<Self>
    where
        S: SettingsStore + ?Sized,
    {
        let mut settings = Self::new(id, DEFAULT_CATEGORY_NAME);
        settings.try_load(store).then_some(settings)
    }

    /// Overwrites every field except `id` from the store.
    ///
    /// Returns `false` and leaves the record untouched when no record exists.
    pub fn try_load<S>(&mut self, store: &S) -> bool
    where
        S: SettingsStore + ?Sized,
    {
        let id = self.id;
        if !store.has_key(&keys::name(id)) {
            return false;
        }

        // Fallbacks come from the two-switch layout when the record predates
        // the per-sink switches.
        let legacy_enabled = store.get_bool(&keys::legacy_enabled(id), true);
        let legacy_file = store.get_bool(&keys::legacy_always_log_to_file(id), false);
        let fallback = if store.has_key(&keys::legacy_enabled(id)) {
            CategorySwitches {
                console_logging: legacy_enabled,
                file_logging: legacy_file,
                asserts: legacy_enabled,
            }
        } else {
            self.switches
        };

        self.name = store.get_string(&keys::name(id), &self.name);
        self.switches = CategorySwitches {
            console_logging: store
                .get_bool(&keys::console_logging(id), fallback.console_logging),
            file_logging: store.get_bool(&keys::file_logging(id), fallback.file_logging),
            asserts: store.get_bool(&keys::asserts(id), fallback.asserts),
        };
        true
    }

    /// Loads the record, falling back to the default name and switches.
    pub fn load_or_default<S>(&mut self, store: &S)
    where
        S: SettingsStore + ?Sized,
    {
        if !self.try_load(store) {
            tracing::debug!(key = %keys::name(self.id), "category record missing, using defaults");
            self.name = DEFAULT_CATEGORY_NAME.to_owned();
            self.switches = CategorySwitches::default();
        }
    }

    /// Writes every field to the store and flushes it.
    pub fn save<S>(&self, store: &S) -> Result<(), StoreError>
    where
        S: SettingsStore + ?Sized,
    {
        let id = self.id;
        store.set_string(&keys::name(id), &self.name);
        store.set_bool(&keys::console_logging(id), self.switches.console_logging);
        store.set_bool(&keys::file_logging(id), self.switches.file_logging);
        store.set_bool(&keys::asserts(id), self.switches.asserts);
        store.delete_key(&keys::legacy_enabled(id));
        store.delete_key(&keys::legacy_always_log_to_file(id));
        store.flush()
    }

    /// Removes every key this record occupies.
    pub fn delete<S>(&self, store: &S)
    where
        S: SettingsStore + ?Sized,
    {
        for key in keys::all(self.id) {
            store.delete_key(&key);
        }
    }

    /// Restores default switches and saves. The name is kept so the record
    /// stays addressable by the registry.
    pub fn reset_to_default<S>(&mut self, store: &S) -> Result<(), StoreError>
    where
        S: SettingsStore + ?Sized,
    {
        self.switches = CategorySwitches::default();
        self.save(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings_store::MemoryStore;

    fn id(raw: u16) -> CategoryId {
        CategoryId::new(raw).unwrap()
    }

    #[test]
    fn defaults() {
        let settings = CategorySettings::new(id(0), "Physics");
        assert!(settings.switches.console_logging);
        assert!(!settings.switches.file_logging);
        assert!(settings.switches.asserts);
        assert!(settings.switches.any_sink());
    }

    #[test]
    fn load_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(CategorySettings::load(&store, id(3)).is_none());
    }

    #[test]
    fn save_then_load_reproduces_fields() {
        let store = MemoryStore::new();
        let mut settings = CategorySettings::new(id(9), "Networking");
        settings.switches = CategorySwitches {
            console_logging: false,
            file_logging: true,
            asserts: false,
        };
        settings.save(&store).unwrap();

        let loaded = CategorySettings::load(&store, id(9)).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn load_or_default_resets_missing_record() {
        let store = MemoryStore::new();
        let mut settings = CategorySettings::new(id(2), "Audio");
        settings.switches.file_logging = true;
        settings.load_or_default(&store);
        assert_eq!(settings.name, DEFAULT_CATEGORY_NAME);
        assert_eq!(settings.switches, CategorySwitches::default());
    }

    #[test]
    fn delete_removes_every_key() {
        let store = MemoryStore::new();
        let settings = CategorySettings::new(id(4), "AI");
        settings.save(&store).unwrap();
        assert!(!store.is_empty());
        settings.delete(&store);
        assert!(store.is_empty());
    }

    #[test]
    fn legacy_two_switch_record_is_migrated() {
        let store = MemoryStore::new();
        let legacy = id(5);
        store.set_string(&keys::name(legacy), "Legacy");
        store.set_int(&keys::legacy_enabled(legacy), 0);
        store.set_int(&keys::legacy_always_log_to_file(legacy), 1);

        let loaded = CategorySettings::load(&store, legacy).unwrap();
        assert_eq!(loaded.name, "Legacy");
        assert_eq!(
            loaded.switches,
            CategorySwitches {
                console_logging: false,
                file_logging: true,
                asserts: false,
            }
        );

        loaded.save(&store).unwrap();
        assert!(!store.has_key(&keys::legacy_enabled(legacy)));
        assert!(!store.has_key(&keys::legacy_always_log_to_file(legacy)));
        assert!(store.has_key(&keys::console_logging(legacy)));
    }

    #[test]
    fn reset_keeps_name() {
        let store = MemoryStore::new();
        let mut settings = CategorySettings::new(id(1), "UI");
        settings.switches.console_logging = false;
        settings.reset_to_default(&store).unwrap();
        assert_eq!(settings.name, "UI");
        assert_eq!(
            CategorySettings::load(&store, id(1)).unwrap().switches,
            CategorySwitches::default()
        );
    }
}
