use std::borrow::Cow;
use std::fmt::Display;

use category::{CategoryId, CategorySettings, CategorySwitches};

use super::CategoryHandle;
use crate::ENABLED;
use crate::buffers::BufferScope;
use crate::context::DiagnosticsContext;

/// Logging handle for one category.
///
/// Every call forwards to the context's [`Dispatcher`](crate::Dispatcher)
/// with the cached id; the dispatcher applies the category's switches.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use logging::DiagnosticsContext;
/// use logging_sink::CapturingConsole;
/// use settings_store::MemoryStore;
///
/// let console = Arc::new(CapturingConsole::new());
/// let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
///     .console(console.clone())
///     .build();
///
/// let physics = ctx.category_logger("Physics");
/// physics.append_to_next_log(" (t=0.5)");
/// physics.log("velocity clamped");
///
/// assert_eq!(console.texts(), vec!["velocity clamped (t=0.5)".to_owned()]);
/// ```
#[derive(Debug)]
pub struct CategoryLogger {
    handle: CategoryHandle,
}

/// Creates a [`CategoryLogger`] bound to `name` in `context`.
pub fn make_category_logger(
    context: &DiagnosticsContext,
    name: impl Into<Cow<'static, str>>,
) -> CategoryLogger {
    CategoryLogger::new(context.clone(), name)
}

impl CategoryLogger {
    /// Binds a logger to `name`; the category is registered on first use.
    pub fn new(context: DiagnosticsContext, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            handle: CategoryHandle::new(context, name.into()),
        }
    }

    /// Name this logger is bound to.
    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.handle.name
    }

    /// Id of the category, registering it if this is the first use.
    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.handle.id()
    }

    /// Snapshot of the category's settings.
    #[must_use]
    pub fn settings(&self) -> Option<CategorySettings> {
        self.handle.settings()
    }

    /// Snapshot of the category's switches.
    #[must_use]
    pub fn switches(&self) -> Option<CategorySwitches> {
        self.handle.switches()
    }

    /// Reports whether a log call would reach at least one sink.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        ENABLED && self.handle.switches().is_some_and(CategorySwitches::any_sink)
    }

    /// Context this logger dispatches through.
    #[must_use]
    pub fn context(&self) -> &DiagnosticsContext {
        &self.handle.context
    }

    /// See [`Dispatcher::log`](crate::Dispatcher::log).
    #[inline]
    pub fn log(&self, message: impl Display) {
        if !ENABLED {
            return;
        }
        if let Some(id) = self.handle.id() {
            self.handle.context.dispatcher().log(id, message);
        }
    }

    /// See [`Dispatcher::log_parts`](crate::Dispatcher::log_parts).
    #[inline]
    pub fn log_parts(&self, parts: &[&dyn Display]) {
        if !ENABLED {
            return;
        }
        if let Some(id) = self.handle.id() {
            self.handle.context.dispatcher().log_parts(id, parts);
        }
    }

    /// See [`Dispatcher::log_warning`](crate::Dispatcher::log_warning).
    #[inline]
    pub fn log_warning(&self, message: impl Display) {
        if !ENABLED {
            return;
        }
        if let Some(id) = self.handle.id() {
            self.handle.context.dispatcher().log_warning(id, message);
        }
    }

    /// See [`Dispatcher::log_error`](crate::Dispatcher::log_error).
    #[inline]
    pub fn log_error(&self, message: impl Display) {
        if !ENABLED {
            return;
        }
        if let Some(id) = self.handle.id() {
            self.handle.context.dispatcher().log_error(id, message);
        }
    }

    /// Queues text placed before the next message of this category.
    #[inline]
    pub fn prepend_to_next_log(&self, message: impl Display) {
        if let Some(scope) = self.scope() {
            self.handle
                .context
                .dispatcher()
                .prepend_to_next_log(scope, message);
        }
    }

    /// Queues text placed after the next message of this category.
    #[inline]
    pub fn append_to_next_log(&self, message: impl Display) {
        if let Some(scope) = self.scope() {
            self.handle
                .context
                .dispatcher()
                .append_to_next_log(scope, message);
        }
    }

    /// Parts form of [`prepend_to_next_log`](Self::prepend_to_next_log).
    #[inline]
    pub fn prepend_parts_to_next_log(&self, parts: &[&dyn Display]) {
        if let Some(scope) = self.scope() {
            self.handle
                .context
                .dispatcher()
                .prepend_parts_to_next_log(scope, parts);
        }
    }

    /// Parts form of [`append_to_next_log`](Self::append_to_next_log).
    #[inline]
    pub fn append_parts_to_next_log(&self, parts: &[&dyn Display]) {
        if let Some(scope) = self.scope() {
            self.handle
                .context
                .dispatcher()
                .append_parts_to_next_log(scope, parts);
        }
    }

    /// Discards queued prepend text for this category.
    pub fn clear_prepend_text(&self) {
        if let Some(scope) = self.scope() {
            self.handle.context.dispatcher().clear_prepend_text(scope);
        }
    }

    /// Discards queued append text for this category.
    pub fn clear_append_text(&self) {
        if let Some(scope) = self.scope() {
            self.handle.context.dispatcher().clear_append_text(scope);
        }
    }

    fn scope(&self) -> Option<BufferScope> {
        if !ENABLED {
            return None;
        }
        self.handle.id().map(BufferScope::Category)
    }
}
