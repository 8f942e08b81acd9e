//! crates/logging/src/context.rs
//! The object owning one store, registry, dispatcher and assertion handler.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use category::CategoryRegistry;
use logging_sink::{ConsoleSink, TracingConsole};
use settings_store::SettingsStore;

use crate::config::DispatcherConfig;
use crate::dispatcher::Dispatcher;
use crate::facade::{AssertionHandler, CategoryAssert, CategoryLogger, LogAssertionFailures};

static GLOBAL: OnceLock<DiagnosticsContext> = OnceLock::new();

/// Errors raised while setting up the process-wide context.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// [`install`] was called after a context had already been installed.
    #[error("a diagnostics context is already installed")]
    AlreadyInstalled,
}

struct ContextInner {
    store: Arc<dyn SettingsStore>,
    registry: Arc<CategoryRegistry>,
    dispatcher: Dispatcher,
    assertion_handler: Arc<dyn AssertionHandler>,
}

/// Everything a categorical log or assert call needs.
///
/// Cloning is cheap; clones share the same registry and dispatcher.
#[derive(Clone)]
pub struct DiagnosticsContext {
    inner: Arc<ContextInner>,
}

impl fmt::Debug for DiagnosticsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsContext")
            .field("registry", &self.inner.registry)
            .field("dispatcher", &self.inner.dispatcher)
            .finish_non_exhaustive()
    }
}

impl DiagnosticsContext {
    /// Starts building a context over `store`.
    #[must_use]
    pub fn builder(store: Arc<dyn SettingsStore>) -> DiagnosticsContextBuilder {
        DiagnosticsContextBuilder::new(store)
    }

    /// Settings store shared by the registry and the dispatcher options.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.inner.store
    }

    /// Category registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        &self.inner.registry
    }

    /// Log dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// Handler receiving failed checks.
    #[must_use]
    pub fn assertion_handler(&self) -> &Arc<dyn AssertionHandler> {
        &self.inner.assertion_handler
    }

    /// Logger bound to `name`.
    #[must_use]
    pub fn category_logger(&self, name: impl Into<Cow<'static, str>>) -> CategoryLogger {
        CategoryLogger::new(self.clone(), name)
    }

    /// Assert handle bound to `name`.
    #[must_use]
    pub fn category_assert(&self, name: impl Into<Cow<'static, str>>) -> CategoryAssert {
        CategoryAssert::new(self.clone(), name)
    }

    /// Unregisters `name` and discards its deferred text.
    ///
    /// Prefer this over [`CategoryRegistry::unregister_category`] while a
    /// dispatcher is running. Facades already bound to `name` keep the old id.
    pub fn unregister_category(&self, name: &str) -> bool {
        let Some(id) = self.inner.registry.category_id(name) else {
            return false;
        };
        let removed = self.inner.registry.unregister_category_id(id);
        if removed {
            self.inner.dispatcher.forget_category(id);
        }
        removed
    }

    /// Flushes and closes the log file; see [`Dispatcher::close`].
    pub fn shutdown(&self) -> bool {
        self.inner.dispatcher.close()
    }
}

/// Builder for [`DiagnosticsContext`].
pub struct DiagnosticsContextBuilder {
    store: Arc<dyn SettingsStore>,
    console: Option<Arc<dyn ConsoleSink>>,
    config: DispatcherConfig,
    assertion_handler: Option<Arc<dyn AssertionHandler>>,
}

impl fmt::Debug for DiagnosticsContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsContextBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DiagnosticsContextBuilder {
    fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            console: None,
            config: DispatcherConfig::default(),
            assertion_handler: None,
        }
    }

    /// Console sink; defaults to [`TracingConsole`].
    #[must_use]
    pub fn console(mut self, console: Arc<dyn ConsoleSink>) -> Self {
        self.console = Some(console);
        self
    }

    /// Enables the log file at `path`.
    #[must_use]
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_log_file(path);
        self
    }

    /// Labels every entry with `name`.
    #[must_use]
    pub fn instance_name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.with_instance_name(name);
        self
    }

    /// Replaces the whole dispatcher configuration.
    #[must_use]
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Handler for failed checks; defaults to [`LogAssertionFailures`].
    #[must_use]
    pub fn assertion_handler(mut self, handler: Arc<dyn AssertionHandler>) -> Self {
        self.assertion_handler = Some(handler);
        self
    }

    /// Creates the registry and dispatcher.
    ///
    /// Opens the log file when one was configured and reads the dispatcher
    /// options from the store. Category recovery stays lazy.
    #[must_use]
    pub fn build(self) -> DiagnosticsContext {
        let registry = Arc::new(CategoryRegistry::new(Arc::clone(&self.store)));
        let console: Arc<dyn ConsoleSink> = match self.console {
            Some(console) => console,
            None => Arc::new(TracingConsole::new()),
        };
        let dispatcher = Dispatcher::new(Arc::clone(&registry), console, self.config);
        let assertion_handler: Arc<dyn AssertionHandler> = match self.assertion_handler {
            Some(handler) => handler,
            None => Arc::new(LogAssertionFailures),
        };
        DiagnosticsContext {
            inner: Arc::new(ContextInner {
                store: self.store,
                registry,
                dispatcher,
                assertion_handler,
            }),
        }
    }
}

/// Makes `context` the process-wide context returned by [`global`].
///
/// Only the first call succeeds. The installed context lives in a `static`
/// and is never dropped, so its log file is not closed on exit: call
/// [`shutdown`] before the process ends or buffered entries are lost.
pub fn install(context: DiagnosticsContext) -> Result<(), ContextError> {
    GLOBAL
        .set(context)
        .map_err(|_| ContextError::AlreadyInstalled)
}

/// The installed process-wide context, if any.
#[must_use]
pub fn global() -> Option<&'static DiagnosticsContext> {
    GLOBAL.get()
}

/// Closes the process-wide context's log file.
///
/// Returns `false` when nothing was installed or the file was already closed.
pub fn shutdown() -> bool {
    global().is_some_and(DiagnosticsContext::shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings_store::MemoryStore;

    #[test]
    fn clones_share_registry() {
        let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new())).build();
        let clone = ctx.clone();
        ctx.registry().register_category("Shared").expect("register");
        assert!(clone.registry().category_id("Shared").is_some());
        assert!(Arc::ptr_eq(ctx.registry(), clone.registry()));
    }

    #[test]
    fn build_reads_options_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set_bool(crate::config::ALWAYS_SHOW_WARNINGS_KEY, false);
        let ctx = DiagnosticsContext::builder(store).build();
        assert!(!ctx.dispatcher().options().always_show_warnings);
    }

    #[test]
    fn context_error_message() {
        assert_eq!(
            ContextError::AlreadyInstalled.to_string(),
            "a diagnostics context is already installed"
        );
    }
}
