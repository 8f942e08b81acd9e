//! crates/category/src/registry.rs
//! Name ⇄ id registry with lazy recovery from the settings store.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use rustc_hash::FxHashMap;
use settings_store::SettingsStore;

use crate::{
    CategoryId, CategorySettings, CategorySwitches, MAX_CATEGORY_ID, RegistryError, keys,
};

/// Label rendered for ids that do not belong to a registered category.
pub const UNASSIGNED_CATEGORY: &str = "Unassigned Category.";

#[derive(Debug, Default)]
struct RegistryState {
    by_id: FxHashMap<CategoryId, CategorySettings>,
    by_name: FxHashMap<String, CategoryId>,
}

impl RegistryState {
    fn insert(&mut self, settings: CategorySettings) {
        self.by_name.insert(settings.name.clone(), settings.id);
        self.by_id.insert(settings.id, settings);
    }

    fn remove(&mut self, id: CategoryId) -> Option<CategorySettings> {
        let settings = self.by_id.remove(&id)?;
        self.by_name.remove(&settings.name);
        Some(settings)
    }

    fn first_free_id(&self) -> Option<CategoryId> {
        CategoryId::all().find(|id| !self.by_id.contains_key(id))
    }
}

/// Registry of categories, shared by every facade and the dispatcher.
///
/// All state sits behind one mutex. Registration is rare compared to the
/// lookups performed on every log call, and lookups only copy small values
/// out of the lock.
pub struct CategoryRegistry {
    store: Arc<dyn SettingsStore>,
    state: OnceLock<Mutex<RegistryState>>,
}

impl fmt::Debug for CategoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryRegistry")
            .field("recovered", &self.state.get().is_some())
            .finish_non_exhaustive()
    }
}

impl CategoryRegistry {
    /// Creates a registry backed by `store`. The store is not read until the
    /// first operation.
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            state: OnceLock::new(),
        }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Reports whether the recovery pass has already run.
    #[must_use]
    pub fn is_recovered(&self) -> bool {
        self.state.get().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state
            .get_or_init(|| Mutex::new(recover(&*self.store)))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the id registered for `name`, registering it first if needed.
    ///
    /// New categories get the lowest free id and default switches, and are
    /// persisted immediately.
    pub fn register_category(&self, name: &str) -> Result<CategoryId, RegistryError> {
        if name.is_empty() {
            tracing::warn!("refusing to register a category with an empty name");
            return Err(RegistryError::EmptyName);
        }

        let mut state = self.lock();
        if let Some(&id) = state.by_name.get(name) {
            return Ok(id);
        }

        let Some(id) = state.first_free_id() else {
            tracing::warn!(name, max = MAX_CATEGORY_ID, "category id space exhausted");
            return Err(RegistryError::Exhausted);
        };

        let settings = CategorySettings::new(id, name);
        if let Err(error) = settings.save(&*self.store) {
            tracing::warn!(name, %id, %error, "failed to persist new category");
        }
        tracing::debug!(name, %id, "registered category");
        state.insert(settings);
        Ok(id)
    }

    /// Removes the category called `name` and deletes its persisted keys.
    ///
    /// Returns `false` when no such category exists. The freed id goes to
    /// the next registration; state keyed by the id outside the registry,
    /// such as a dispatcher's deferred text, is left alone.
    pub fn unregister_category(&self, name: &str) -> bool {
        let mut state = self.lock();
        let Some(&id) = state.by_name.get(name) else {
            return false;
        };
        self.remove_locked(&mut state, id)
    }

    /// Removes the category with `id` and deletes its persisted keys.
    pub fn unregister_category_id(&self, id: CategoryId) -> bool {
        let mut state = self.lock();
        self.remove_locked(&mut state, id)
    }

    fn remove_locked(&self, state: &mut RegistryState, id: CategoryId) -> bool {
        let Some(settings) = state.remove(id) else {
            return false;
        };
        settings.delete(&*self.store);
        if let Err(error) = self.store.flush() {
            tracing::warn!(%id, %error, "failed to flush after unregistering category");
        }
        tracing::debug!(name = %settings.name, %id, "unregistered category");
        true
    }

    /// Looks up the id of `name` without registering it.
    #[must_use]
    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.lock().by_name.get(name).copied()
    }

    /// Looks up the name registered for `id`.
    #[must_use]
    pub fn category_name(&self, id: CategoryId) -> Option<String> {
        self.lock().by_id.get(&id).map(|settings| settings.name.clone())
    }

    /// Name of `id`, or [`UNASSIGNED_CATEGORY`] when unregistered.
    #[must_use]
    pub fn display_name(&self, id: CategoryId) -> String {
        self.category_name(id)
            .unwrap_or_else(|| UNASSIGNED_CATEGORY.to_owned())
    }

    /// Snapshot of the full settings record for `id`.
    #[must_use]
    pub fn category_settings(&self, id: CategoryId) -> Option<CategorySettings> {
        self.lock().by_id.get(&id).cloned()
    }

    /// Snapshot of the switches for `id`.
    #[must_use]
    pub fn switches(&self, id: CategoryId) -> Option<CategorySwitches> {
        self.lock().by_id.get(&id).map(|settings| settings.switches)
    }

    /// Names of every registered category, in no particular order.
    #[must_use]
    pub fn registered_names(&self) -> Vec<String> {
        self.lock()
            .by_id
            .values()
            .map(|settings| settings.name.clone())
            .collect()
    }

    /// Ids of every registered category, ascending.
    #[must_use]
    pub fn registered_ids(&self) -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = self.lock().by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    /// Reports whether no category is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().by_id.is_empty()
    }

    /// Applies `update` to the switches of `id` in memory.
    ///
    /// Call [`save_category`](Self::save_category) to persist the change.
    /// Returns `false` (and warns) when `id` is not registered.
    pub fn update_switches<F>(&self, id: CategoryId, update: F) -> bool
    where
        F: FnOnce(&mut CategorySwitches),
    {
        let mut state = self.lock();
        if let Some(settings) = state.by_id.get_mut(&id) {
            update(&mut settings.switches);
            true
        } else {
            tracing::warn!(%id, "cannot change switches of an unregistered category");
            false
        }
    }

    /// Sets the console-logging switch of `id` in memory.
    pub fn set_console_logging(&self, id: CategoryId, enabled: bool) -> bool {
        self.update_switches(id, |switches| switches.console_logging = enabled)
    }

    /// Sets the file-logging switch of `id` in memory.
    pub fn set_file_logging(&self, id: CategoryId, enabled: bool) -> bool {
        self.update_switches(id, |switches| switches.file_logging = enabled)
    }

    /// Sets the asserts switch of `id` in memory.
    pub fn set_asserts(&self, id: CategoryId, enabled: bool) -> bool {
        self.update_switches(id, |switches| switches.asserts = enabled)
    }

    /// Persists the current record of `id`.
    pub fn save_category(&self, id: CategoryId) -> Result<(), RegistryError> {
        let state = self.lock();
        let settings = state
            .by_id
            .get(&id)
            .ok_or(RegistryError::UnknownCategory(id))?;
        settings.save(&*self.store)?;
        Ok(())
    }

    /// Restores the default switches of `id` and persists them.
    pub fn reset_category_to_default(&self, id: CategoryId) -> Result<(), RegistryError> {
        let mut state = self.lock();
        let settings = state
            .by_id
            .get_mut(&id)
            .ok_or(RegistryError::UnknownCategory(id))?;
        settings.reset_to_default(&*self.store)?;
        Ok(())
    }

    /// Forgets every category and scrubs all per-category keys in the id range.
    ///
    /// Freed ids become available again starting from zero.
    pub fn delete_all_saved_categories(&self) {
        let mut state = self.lock();
        state.by_id.clear();
        state.by_name.clear();
        for id in CategoryId::all() {
            for key in keys::all(id) {
                if self.store.has_key(&key) {
                    self.store.delete_key(&key);
                }
            }
        }
        if let Err(error) = self.store.flush() {
            tracing::warn!(%error, "failed to flush after deleting all categories");
        }
        tracing::debug!("deleted all saved categories");
    }
}

/// Rebuilds the registry state from every record present in `store`.
fn recover(store: &dyn SettingsStore) -> RegistryState {
    let mut state = RegistryState::default();
    let mut dropped = false;

    for id in CategoryId::all() {
        if !store.has_key(&keys::name(id)) {
            continue;
        }
        let Some(settings) = CategorySettings::load(store, id) else {
            continue;
        };

        if let Some(&first) = state.by_name.get(&settings.name) {
            tracing::warn!(
                name = %settings.name,
                first = %first,
                duplicate = %id,
                "duplicate category name in settings store, deleting later entry"
            );
            settings.delete(store);
            dropped = true;
        } else {
            tracing::debug!(name = %settings.name, %id, "recovered category");
            state.insert(settings);
        }
    }

    if dropped {
        if let Err(error) = store.flush() {
            tracing::warn!(%error, "failed to flush after dropping duplicate categories");
        }
    }

    tracing::debug!(count = state.by_id.len(), "category registry recovered");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings_store::MemoryStore;

    fn registry() -> (Arc<MemoryStore>, CategoryRegistry) {
        let store = Arc::new(MemoryStore::new());
        let registry = CategoryRegistry::new(store.clone());
        (store, registry)
    }

    fn id(raw: u16) -> CategoryId {
        CategoryId::new(raw).unwrap()
    }

    #[test]
    fn recovery_is_lazy() {
        let (_, registry) = registry();
        assert!(!registry.is_recovered());
        let _ = registry.category_id("anything");
        assert!(registry.is_recovered());
    }

    #[test]
    fn empty_name_is_rejected() {
        let (store, registry) = registry();
        assert!(matches!(
            registry.register_category(""),
            Err(RegistryError::EmptyName)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn registration_assigns_lowest_free_ids() {
        let (_, registry) = registry();
        assert_eq!(registry.register_category("A").unwrap(), id(0));
        assert_eq!(registry.register_category("B").unwrap(), id(1));
        assert_eq!(registry.register_category("C").unwrap(), id(2));
        assert!(registry.unregister_category_id(id(1)));
        assert_eq!(registry.register_category("D").unwrap(), id(1));
    }

    #[test]
    fn registration_persists_immediately() {
        let (store, registry) = registry();
        let physics = registry.register_category("Physics").unwrap();
        assert_eq!(store.get_string(&keys::name(physics), ""), "Physics");
        assert!(store.get_bool(&keys::console_logging(physics), false));
    }

    #[test]
    fn lookups_of_unknown_ids_do_not_panic() {
        let (_, registry) = registry();
        assert_eq!(registry.category_name(id(77)), None);
        assert_eq!(registry.display_name(id(77)), UNASSIGNED_CATEGORY);
        assert!(registry.category_settings(id(77)).is_none());
        assert!(registry.switches(id(77)).is_none());
        assert!(!registry.set_console_logging(id(77), false));
        assert!(matches!(
            registry.save_category(id(77)),
            Err(RegistryError::UnknownCategory(_))
        ));
    }

    #[test]
    fn category_id_never_registers() {
        let (store, registry) = registry();
        assert_eq!(registry.category_id("Ghost"), None);
        assert!(registry.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn setters_need_explicit_save() {
        let (store, registry) = registry();
        let audio = registry.register_category("Audio").unwrap();
        assert!(registry.set_file_logging(audio, true));
        assert!(!store.get_bool(&keys::file_logging(audio), true));
        registry.save_category(audio).unwrap();
        assert!(store.get_bool(&keys::file_logging(audio), false));
    }

    #[test]
    fn reset_restores_defaults() {
        let (_, registry) = registry();
        let ui = registry.register_category("UI").unwrap();
        registry.update_switches(ui, |s| {
            s.console_logging = false;
            s.asserts = false;
        });
        registry.reset_category_to_default(ui).unwrap();
        assert_eq!(registry.switches(ui), Some(CategorySwitches::default()));
    }

    #[test]
    fn unregister_by_name_deletes_keys() {
        let (store, registry) = registry();
        let ai = registry.register_category("AI").unwrap();
        assert!(registry.unregister_category("AI"));
        assert!(!registry.unregister_category("AI"));
        assert!(!store.has_key(&keys::name(ai)));
        assert_eq!(registry.category_id("AI"), None);
    }

    #[test]
    fn delete_all_scrubs_store() {
        let (store, registry) = registry();
        registry.register_category("A").unwrap();
        registry.register_category("B").unwrap();
        store.set_int(&keys::legacy_enabled(id(400)), 1);
        registry.delete_all_saved_categories();
        assert!(registry.is_empty());
        assert!(store.is_empty());
        assert_eq!(registry.register_category("C").unwrap(), id(0));
    }

    #[test]
    fn registered_snapshots() {
        let (_, registry) = registry();
        registry.register_category("B").unwrap();
        registry.register_category("A").unwrap();
        let mut names = registry.registered_names();
        names.sort();
        assert_eq!(names, vec!["A".to_owned(), "B".to_owned()]);
        assert_eq!(registry.registered_ids(), vec![id(0), id(1)]);
        assert_eq!(registry.len(), 2);
    }
}
