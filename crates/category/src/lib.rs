#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/category/src/lib.rs
//!
//! # Overview
//!
//! `category` owns the mapping between human-readable category names
//! ("Physics", "Networking") and the small integer [`CategoryId`]s that every
//! log and assert call carries. Each category has a [`CategorySettings`]
//! record with three independent switches (console output, file output,
//! assertion checks) persisted in a [`SettingsStore`](settings_store::SettingsStore).
//!
//! # Design
//!
//! [`CategoryRegistry`] is the hub. It is constructed cheaply and performs a
//! one-time recovery pass on first use: every id in `0..MAX_CATEGORY_ID` whose
//! name key exists in the store is loaded back into memory. Ids are assigned
//! lowest-available-first, so an id freed by unregistration is reused by the
//! next registration.
//!
//! # Invariants
//!
//! - The name → id and id → settings maps stay bijective.
//! - Recovery runs at most once per registry, lazily.
//! - Duplicate names found during recovery keep the lowest id; the others are
//!   deleted from the store.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use category::CategoryRegistry;
//! use settings_store::MemoryStore;
//!
//! let registry = CategoryRegistry::new(Arc::new(MemoryStore::new()));
//! let physics = registry.register_category("Physics").unwrap();
//! assert_eq!(registry.register_category("Physics").unwrap(), physics);
//! assert_eq!(registry.category_id("Physics"), Some(physics));
//! assert_eq!(registry.display_name(physics), "Physics");
//! ```

mod error;
mod id;
pub mod keys;
mod registry;
mod settings;

pub use error::RegistryError;
pub use id::{CategoryId, MAX_CATEGORY_ID};
pub use registry::{CategoryRegistry, UNASSIGNED_CATEGORY};
pub use settings::{CategorySettings, CategorySwitches, DEFAULT_CATEGORY_NAME};
