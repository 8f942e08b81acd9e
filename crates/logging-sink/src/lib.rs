#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` defines the console boundary of the categorical logger. The
//! dispatcher composes a complete line of text and hands it to a
//! [`ConsoleSink`] together with a [`Severity`]; the sink decides how to show
//! it.
//!
//! # Design
//!
//! [`ConsoleSink`] takes `&self` and must be `Send + Sync`: console writes are
//! not serialized by the dispatcher, so every implementation is responsible
//! for its own thread safety.
//!
//! - [`TracingConsole`] forwards lines to `tracing` events (the default).
//! - [`WriterConsole`] renders lines into any [`std::io::Write`] behind a
//!   mutex, one line per call.
//! - [`CapturingConsole`] records lines in memory for inspection.
//! - [`NullConsole`] discards everything.
//!
//! # Examples
//!
//! ```
//! use logging_sink::{CapturingConsole, ConsoleSink, Severity};
//!
//! let console = CapturingConsole::new();
//! console.write_line(Severity::Warning, "disk almost full");
//!
//! let lines = console.drain();
//! assert_eq!(lines.len(), 1);
//! assert_eq!(lines[0].severity, Severity::Warning);
//! assert_eq!(lines[0].text, "disk almost full");
//! ```

mod capture;
mod severity;
mod tracing_console;
mod writer;

pub use capture::{CapturingConsole, ConsoleLine};
pub use severity::Severity;
pub use tracing_console::{CONSOLE_TARGET, TracingConsole};
pub use writer::WriterConsole;

/// Destination for composed console output.
pub trait ConsoleSink: Send + Sync {
    /// Emits one composed log entry.
    fn write_line(&self, severity: Severity, text: &str);
}

impl<S> ConsoleSink for std::sync::Arc<S>
where
    S: ConsoleSink + ?Sized,
{
    fn write_line(&self, severity: Severity, text: &str) {
        (**self).write_line(severity, text);
    }
}

/// Console sink that discards every line.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullConsole;

impl ConsoleSink for NullConsole {
    fn write_line(&self, _severity: Severity, _text: &str) {}
}
