use crate::{ConsoleSink, Severity};

/// Target attached to every event emitted by [`TracingConsole`].
pub const CONSOLE_TARGET: &str = "catdebug";

/// Console sink that forwards lines to `tracing` events.
///
/// Info lines become `INFO` events, warnings `WARN`, errors `ERROR`, all with
/// the [`CONSOLE_TARGET`] target. Where the output ends up is decided by the
/// subscriber the host installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingConsole;

impl TracingConsole {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConsoleSink for TracingConsole {
    fn write_line(&self, severity: Severity, text: &str) {
        match severity {
            Severity::Info => tracing::info!(target: CONSOLE_TARGET, "{text}"),
            Severity::Warning => tracing::warn!(target: CONSOLE_TARGET, "{text}"),
            Severity::Error => tracing::error!(target: CONSOLE_TARGET, "{text}"),
        }
    }
}
