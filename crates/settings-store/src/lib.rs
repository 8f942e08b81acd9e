#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/settings-store/src/lib.rs
//!
//! # Overview
//!
//! `settings-store` defines the persistent key/value boundary used by the
//! category registry and the dispatcher options. The [`SettingsStore`] trait
//! mirrors a player-preferences style API: typed getters that take a default,
//! setters, an existence check, deletion, and an explicit [`flush`] that makes
//! pending writes durable.
//!
//! # Design
//!
//! All methods take `&self` so a single store can be shared behind an
//! [`Arc`](std::sync::Arc) by every component of a diagnostics context.
//! Implementations are responsible for their own locking. Booleans are stored
//! as integers (`0`/`1`) through the provided [`SettingsStore::get_bool`] and
//! [`SettingsStore::set_bool`] helpers so that records written by other tools
//! using the same convention load unchanged.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`] keeps values in process memory only.
//! - [`JsonFileStore`] loads a JSON document on open and writes it back
//!   atomically on [`flush`].
//!
//! # Errors
//!
//! Getters and setters are infallible; only [`SettingsStore::flush`] and
//! [`JsonFileStore::open`] surface a [`StoreError`].
//!
//! # Examples
//!
//! ```
//! use settings_store::{MemoryStore, SettingsStore};
//!
//! let store = MemoryStore::new();
//! store.set_bool("CatDebug_AlwaysShowWarnings", true);
//! assert!(store.get_bool("CatDebug_AlwaysShowWarnings", false));
//! assert_eq!(store.get_int("missing", 7), 7);
//! ```
//!
//! [`flush`]: SettingsStore::flush

mod error;
mod json_file;
mod memory;
mod value;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use value::StoredValue;

/// Persistent key/value store consumed by the category registry.
///
/// String and integer values live in separate type slots: reading an integer
/// key with [`get_string`](Self::get_string) returns the supplied default, and
/// vice versa.
pub trait SettingsStore: Send + Sync {
    /// Returns the string stored under `key`, or `default` when absent.
    fn get_string(&self, key: &str, default: &str) -> String;

    /// Stores a string value under `key`, replacing any previous value.
    fn set_string(&self, key: &str, value: &str);

    /// Returns the integer stored under `key`, or `default` when absent.
    fn get_int(&self, key: &str, default: i32) -> i32;

    /// Stores an integer value under `key`, replacing any previous value.
    fn set_int(&self, key: &str, value: i32);

    /// Reports whether any value is stored under `key`.
    fn has_key(&self, key: &str) -> bool;

    /// Removes the value stored under `key`, if any.
    fn delete_key(&self, key: &str);

    /// Makes all pending writes durable.
    fn flush(&self) -> Result<(), StoreError>;

    /// Reads a boolean stored as an integer (`0` is false, anything else true).
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_int(key, i32::from(default)) != 0
    }

    /// Stores a boolean as an integer (`1` for true, `0` for false).
    fn set_bool(&self, key: &str, value: bool) {
        self.set_int(key, i32::from(value));
    }
}

impl<S> SettingsStore for std::sync::Arc<S>
where
    S: SettingsStore + ?Sized,
{
    fn get_string(&self, key: &str, default: &str) -> String {
        (**self).get_string(key, default)
    }

    fn set_string(&self, key: &str, value: &str) {
        (**self).set_string(key, value);
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        (**self).get_int(key, default)
    }

    fn set_int(&self, key: &str, value: i32) {
        (**self).set_int(key, value);
    }

    fn has_key(&self, key: &str) -> bool {
        (**self).has_key(key)
    }

    fn delete_key(&self, key: &str) {
        (**self).delete_key(key);
    }

    fn flush(&self) -> Result<(), StoreError> {
        (**self).flush()
    }
}
