#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! `logging` is the runtime half of the categorical logger. Calling code tags
//! each log or assert call with a category; per-category switches held by the
//! [`category`] registry decide whether the call reaches the console, the log
//! file, or (for asserts) is evaluated at all.
//!
//! # Design
//!
//! - [`Dispatcher`] composes entries (category label, instance label,
//!   deferred prepend text, message, deferred append text) and routes them to
//!   a [`ConsoleSink`](logging_sink::ConsoleSink) and an optional
//!   [`LogFile`].
//! - [`DiagnosticsContext`] owns one store, registry, dispatcher and
//!   [`AssertionHandler`]. It can be [`install`]ed as the process-wide context
//!   for [`declare_category!`] statics.
//! - [`CategoryLogger`] and [`CategoryAssert`] are bound to one category name
//!   and register it on first use.
//! - The `enabled` feature (on by default) compiles the whole path in. Without
//!   it every dispatcher and facade method returns immediately and the macros
//!   expand to nothing.
//!
//! # Invariants
//!
//! - A deferred buffer is consumed by exactly one matching log call.
//! - File entries never interleave; the file is closed at most once.
//! - Nothing on the logging path returns an error or panics (except through
//!   [`PanicOnFailure`], by request).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use logging::{DiagnosticsContext, GlobalOptions};
//! use logging_sink::CapturingConsole;
//! use settings_store::MemoryStore;
//!
//! let console = Arc::new(CapturingConsole::new());
//! let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
//!     .console(console.clone())
//!     .build();
//! ctx.dispatcher()
//!     .set_options(GlobalOptions::default().with_category_name(true).with_single_line(true));
//!
//! let net = ctx.category_logger("Networking");
//! net.log("connected");
//! assert_eq!(console.texts(), vec!["Networking: connected".to_owned()]);
//!
//! ctx.registry().set_console_logging(net.category_id().unwrap(), false);
//! net.log("hidden");
//! net.log_error("errors are always shown");
//! assert_eq!(console.len(), 2);
//! ```

mod buffers;
mod config;
mod context;
mod dispatcher;
mod facade;
mod file;
mod macros;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use buffers::BufferScope;
pub use config::{
    ADD_CATEGORY_NAME_KEY, ALWAYS_SHOW_WARNINGS_KEY, DEFAULT_LOG_FILE, DispatcherConfig,
    GlobalOptions, SINGLE_LINE_KEY, STACK_TRACE_KEY,
};
pub use context::{
    ContextError, DiagnosticsContext, DiagnosticsContextBuilder, global, install, shutdown,
};
pub use dispatcher::{Dispatcher, FILE_ERROR_PREFIX, FILE_WARNING_PREFIX, STACK_TRACE_HEADER};
pub use facade::{
    AssertionFailure, AssertionHandler, AssertionKind, CategoryAssert, CategoryLogger,
    GlobalCategory, LogAssertionFailures, PanicOnFailure, make_category_logger,
};
pub use file::{BACKUP_SUFFIX, LogFile};
pub use macros::{AsCategoryAssert, AsCategoryLogger};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{CategoryLayer, init_tracing, init_tracing_with_filter};

/// Whether logging and assertion calls are compiled in (the `enabled` feature).
pub const ENABLED: bool = cfg!(feature = "enabled");
