//! crates/logging/src/dispatcher.rs
//! Composes categorized log entries and routes them to the console and file sinks.

use std::fmt::{self, Display, Write as _};
use std::sync::{Arc, PoisonError, RwLock};

use category::{CategoryId, CategoryRegistry, CategorySwitches, UNASSIGNED_CATEGORY};
use logging_sink::{ConsoleSink, Severity};
use settings_store::StoreError;

use crate::ENABLED;
use crate::buffers::{BufferScope, TextBuffers, push_parts};
use crate::config::{DispatcherConfig, GlobalOptions};
use crate::file::LogFile;

/// Prefix placed before warning entries in the log file.
pub const FILE_WARNING_PREFIX: &str = " **Warning** ";
/// Prefix placed before error entries in the log file.
pub const FILE_ERROR_PREFIX: &str = " **ERROR** ";
/// Separator placed between a file entry and its backtrace.
pub const STACK_TRACE_HEADER: &str = "\nStackTrace: \n";

/// Routes log, warning and error calls for registered categories.
///
/// Each scoped call snapshots the category's switches from the registry and
/// writes the composed entry to every enabled sink. When the crate is built
/// without the `enabled` feature every method returns immediately.
pub struct Dispatcher {
    registry: Arc<CategoryRegistry>,
    console: Arc<dyn ConsoleSink>,
    file: Option<LogFile>,
    options: RwLock<GlobalOptions>,
    instance_name: Option<String>,
    instance_name_single_line: bool,
    buffers: TextBuffers,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("file", &self.file)
            .field("options", &self.options())
            .field("instance_name", &self.instance_name)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher, opening (and rotating) the log file when `config` names one.
    ///
    /// [`GlobalOptions`] are read from the registry's store.
    pub fn new(
        registry: Arc<CategoryRegistry>,
        console: Arc<dyn ConsoleSink>,
        config: DispatcherConfig,
    ) -> Self {
        let options = GlobalOptions::load(registry.store().as_ref());
        let file = if ENABLED {
            config
                .log_file()
                .map(|path| LogFile::open(path, console.as_ref()))
        } else {
            None
        };
        Self {
            registry,
            console,
            file,
            options: RwLock::new(options),
            instance_name: config.instance_name().map(str::to_owned),
            instance_name_single_line: config.instance_name_single_line(),
            buffers: TextBuffers::new(),
        }
    }

    /// Registry consulted for category switches and names.
    #[must_use]
    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        &self.registry
    }

    /// Console sink receiving composed entries.
    #[must_use]
    pub fn console(&self) -> &Arc<dyn ConsoleSink> {
        &self.console
    }

    /// File sink, when one was configured.
    #[must_use]
    pub fn log_file(&self) -> Option<&LogFile> {
        self.file.as_ref()
    }

    /// Instance label placed before each entry, if configured.
    #[must_use]
    pub fn instance_name(&self) -> Option<&str> {
        self.instance_name.as_deref()
    }

    /// Current options snapshot.
    #[must_use]
    pub fn options(&self) -> GlobalOptions {
        *self.options.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the options for subsequent calls.
    pub fn set_options(&self, options: GlobalOptions) {
        *self.options.write().unwrap_or_else(PoisonError::into_inner) = options;
    }

    /// Applies `update` to the current options.
    pub fn update_options<F>(&self, update: F)
    where
        F: FnOnce(&mut GlobalOptions),
    {
        update(&mut *self.options.write().unwrap_or_else(PoisonError::into_inner));
    }

    /// Re-reads the options from the store.
    pub fn reload_options(&self) {
        self.set_options(GlobalOptions::load(self.registry.store().as_ref()));
    }

    /// Persists the current options to the store.
    pub fn save_options(&self) -> Result<(), StoreError> {
        self.options().save(self.registry.store().as_ref())
    }

    // ------------------------------------------------------------------
    // Unscoped
    // ------------------------------------------------------------------

    /// Writes an uncategorized entry to the console.
    ///
    /// Consumes the unscoped prepend and append buffers; category switches
    /// are not consulted.
    #[inline]
    pub fn log_unscoped(&self, message: impl Display) {
        if !ENABLED {
            return;
        }
        self.emit_unscoped(&|out: &mut String| {
            let _ = write!(out, "{message}");
        });
    }

    /// Parts form of [`log_unscoped`](Self::log_unscoped); parts are concatenated.
    #[inline]
    pub fn log_unscoped_parts(&self, parts: &[&dyn Display]) {
        if !ENABLED {
            return;
        }
        self.emit_unscoped(&|out: &mut String| push_parts(out, parts));
    }

    fn emit_unscoped(&self, message: &dyn Fn(&mut String)) {
        let mut text = String::new();
        self.push_instance_label(&mut text);
        text.push_str(&self.buffers.take_prepend(BufferScope::Unscoped));
        message(&mut text);
        text.push_str(&self.buffers.take_append(BufferScope::Unscoped));
        self.console.write_line(Severity::Info, &text);
    }

    // ------------------------------------------------------------------
    // Scoped
    // ------------------------------------------------------------------

    /// Writes an entry for `category` to each of its enabled sinks.
    ///
    /// When both sinks are disabled (or the id is unknown) nothing is
    /// formatted and the category's buffers are left untouched.
    #[inline]
    pub fn log(&self, category: CategoryId, message: impl Display) {
        if !ENABLED {
            return;
        }
        self.emit_scoped(category, &|out: &mut String| {
            let _ = write!(out, "{message}");
        });
    }

    /// Parts form of [`log`](Self::log); parts are only stringified when a sink is enabled.
    #[inline]
    pub fn log_parts(&self, category: CategoryId, parts: &[&dyn Display]) {
        if !ENABLED {
            return;
        }
        self.emit_scoped(category, &|out: &mut String| push_parts(out, parts));
    }

    /// Logs to the category registered under `name`.
    ///
    /// Never registers: unknown names are ignored.
    #[inline]
    pub fn log_by_name(&self, name: &str, message: impl Display) {
        if !ENABLED {
            return;
        }
        if let Some(id) = self.registry.category_id(name) {
            self.log(id, message);
        }
    }

    fn emit_scoped(&self, category: CategoryId, message: &dyn Fn(&mut String)) {
        let switches = self.switches(category);
        if !switches.any_sink() {
            return;
        }

        let options = self.options();
        let scope = BufferScope::Category(category);
        let mut text = String::new();
        self.push_category_label(&mut text, category, options);
        self.push_instance_label(&mut text);
        text.push_str(&self.buffers.take_prepend(scope));
        message(&mut text);
        text.push_str(&self.buffers.take_append(scope));

        if switches.console_logging {
            self.console.write_line(Severity::Info, &text);
        }
        if switches.file_logging {
            self.write_file(&text, options);
        }
    }

    /// Writes a warning for `category`.
    ///
    /// The console receives it when `always_show_warnings` or console
    /// logging is on; the file when `always_show_warnings` or file logging
    /// is on.
    #[inline]
    pub fn log_warning(&self, category: CategoryId, message: impl Display) {
        if !ENABLED {
            return;
        }
        let options = self.options();
        let switches = self.switches(category);
        let to_console = options.always_show_warnings || switches.console_logging;
        let to_file = options.always_show_warnings || switches.file_logging;
        if !to_console && !to_file {
            return;
        }

        let mut text = String::new();
        self.push_category_label(&mut text, category, options);
        let _ = write!(text, "{message}");

        if to_console {
            self.console.write_line(Severity::Warning, &text);
        }
        if to_file {
            self.write_file(&format!("{FILE_WARNING_PREFIX}{text}"), options);
        }
    }

    /// Writes an error for `category`.
    ///
    /// Errors always reach the console; the file only with file logging on.
    #[inline]
    pub fn log_error(&self, category: CategoryId, message: impl Display) {
        if !ENABLED {
            return;
        }
        let options = self.options();
        let switches = self.switches(category);

        let mut text = String::new();
        self.push_category_label(&mut text, category, options);
        let _ = write!(text, "{message}");

        self.console.write_line(Severity::Error, &text);
        if switches.file_logging {
            self.write_file(&format!("{FILE_ERROR_PREFIX}{text}"), options);
        }
    }

    // ------------------------------------------------------------------
    // Deferred text
    // ------------------------------------------------------------------

    /// Queues text to be placed before the message of the next log in `scope`.
    ///
    /// For a category scope this is a no-op while both of its sinks are off.
    #[inline]
    pub fn prepend_to_next_log(&self, scope: impl Into<BufferScope>, message: impl Display) {
        if !ENABLED {
            return;
        }
        let scope = scope.into();
        if self.accepts_text(scope) {
            self.buffers.push_prepend(scope, &message);
        }
    }

    /// Queues text to be placed after the message of the next log in `scope`.
    ///
    /// For a category scope this is a no-op while both of its sinks are off.
    #[inline]
    pub fn append_to_next_log(&self, scope: impl Into<BufferScope>, message: impl Display) {
        if !ENABLED {
            return;
        }
        let scope = scope.into();
        if self.accepts_text(scope) {
            self.buffers.push_append(scope, &message);
        }
    }

    /// Parts form of [`prepend_to_next_log`](Self::prepend_to_next_log).
    #[inline]
    pub fn prepend_parts_to_next_log(&self, scope: impl Into<BufferScope>, parts: &[&dyn Display]) {
        if !ENABLED {
            return;
        }
        let scope = scope.into();
        if self.accepts_text(scope) {
            self.buffers.push_prepend_parts(scope, parts);
        }
    }

    /// Parts form of [`append_to_next_log`](Self::append_to_next_log).
    #[inline]
    pub fn append_parts_to_next_log(&self, scope: impl Into<BufferScope>, parts: &[&dyn Display]) {
        if !ENABLED {
            return;
        }
        let scope = scope.into();
        if self.accepts_text(scope) {
            self.buffers.push_append_parts(scope, parts);
        }
    }

    /// Discards queued prepend text for `scope` without emitting it.
    #[inline]
    pub fn clear_prepend_text(&self, scope: impl Into<BufferScope>) {
        if !ENABLED {
            return;
        }
        self.buffers.clear_prepend(scope.into());
    }

    /// Discards queued append text for `scope` without emitting it.
    #[inline]
    pub fn clear_append_text(&self, scope: impl Into<BufferScope>) {
        if !ENABLED {
            return;
        }
        self.buffers.clear_append(scope.into());
    }

    /// Discards all deferred text queued for `category`.
    ///
    /// Ids are reused after unregistration, so text left behind by a removed
    /// category would otherwise reach the next category given its id.
    pub fn forget_category(&self, category: CategoryId) {
        self.buffers.forget(category);
    }

    /// Prepend text currently queued for `scope`.
    #[must_use]
    pub fn pending_prepend_text(&self, scope: impl Into<BufferScope>) -> String {
        self.buffers.peek_prepend(scope.into())
    }

    /// Append text currently queued for `scope`.
    #[must_use]
    pub fn pending_append_text(&self, scope: impl Into<BufferScope>) -> String {
        self.buffers.peek_append(scope.into())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Flushes pending file output.
    pub fn flush(&self) {
        if let Some(file) = &self.file {
            if let Err(error) = file.flush() {
                tracing::warn!(%error, path = %file.path().display(), "log file flush failed");
            }
        }
    }

    /// Flushes and closes the log file.
    ///
    /// Safe to call any number of times from any thread; only the first call
    /// has an effect and returns `true`.
    pub fn close(&self) -> bool {
        match &self.file {
            Some(file) if file.is_open() => {
                tracing::debug!(path = %file.path().display(), "Flushing and closing log file stream.");
                file.close()
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn switches(&self, category: CategoryId) -> CategorySwitches {
        self.registry
            .switches(category)
            .unwrap_or(CategorySwitches {
                console_logging: false,
                file_logging: false,
                asserts: false,
            })
    }

    fn accepts_text(&self, scope: BufferScope) -> bool {
        match scope {
            BufferScope::Unscoped => true,
            BufferScope::Category(id) => self.switches(id).any_sink(),
        }
    }

    fn push_category_label(&self, out: &mut String, category: CategoryId, options: GlobalOptions) {
        if !options.add_category_name_to_log {
            return;
        }
        match self.registry.category_name(category) {
            Some(name) if options.add_category_name_to_log_single_line => {
                let _ = write!(out, "{name}: ");
            }
            Some(name) => {
                let _ = writeln!(out, "Category: {name}");
            }
            None => out.push_str(UNASSIGNED_CATEGORY),
        }
    }

    fn push_instance_label(&self, out: &mut String) {
        if let Some(name) = &self.instance_name {
            out.push_str(name);
            if !self.instance_name_single_line {
                out.push('\n');
            }
        }
    }

    fn write_file(&self, text: &str, options: GlobalOptions) {
        let Some(file) = &self.file else {
            return;
        };
        let result = if options.log_to_file_include_stack_trace {
            let trace = std::backtrace::Backtrace::force_capture();
            file.write_entry(&format!("{text}{STACK_TRACE_HEADER}{trace}"))
        } else {
            file.write_entry(text)
        };
        if let Err(error) = result {
            tracing::warn!(%error, path = %file.path().display(), "log file write failed");
            self.console.write_line(
                Severity::Warning,
                &format!("Failed to write to log file {}: {error}", file.path().display()),
            );
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.close();
    }
}
