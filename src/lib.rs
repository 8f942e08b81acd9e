#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! src/lib.rs
//!
//! # Overview
//!
//! `catdebug` is the single entry point for categorical logging and
//! assertions. It re-exports the workspace crates:
//!
//! - [`settings_store`] for the persistent key/value store,
//! - [`category`] for category ids, switches and the registry,
//! - [`logging_sink`] for console sinks,
//! - [`logging`] for the dispatcher, facades, context and macros.
//!
//! The most common items are also available at the crate root.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use catdebug::{CapturingConsole, DiagnosticsContext, MemoryStore, cat_log};
//!
//! let console = Arc::new(CapturingConsole::new());
//! let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
//!     .console(console.clone())
//!     .build();
//!
//! let audio = ctx.category_logger("Audio");
//! cat_log!(audio, "{} voices", 12);
//! # if catdebug::ENABLED {
//! assert_eq!(console.texts(), vec!["12 voices".to_owned()]);
//! # }
//! ```

pub use category;
pub use logging;
pub use logging_sink;
pub use settings_store;

pub use category::{CategoryId, CategoryRegistry, CategorySettings, CategorySwitches, RegistryError};
pub use logging::{
    AssertionFailure, AssertionHandler, CategoryAssert, CategoryLogger, ContextError,
    DiagnosticsContext, Dispatcher, DispatcherConfig, ENABLED, GlobalCategory, GlobalOptions,
    LogAssertionFailures, PanicOnFailure, cat_assert, cat_error, cat_log, cat_warn,
    declare_category, global, install, make_category_logger, shutdown,
};
pub use logging_sink::{
    CapturingConsole, ConsoleSink, NullConsole, Severity, TracingConsole, WriterConsole,
};
pub use settings_store::{JsonFileStore, MemoryStore, SettingsStore, StoreError};
