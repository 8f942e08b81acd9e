//! crates/logging/src/config.rs
//! Dispatcher options persisted in the settings store, and construction-time configuration.

use std::path::{Path, PathBuf};

use settings_store::{SettingsStore, StoreError};

/// Store key for [`GlobalOptions::add_category_name_to_log`].
pub const ADD_CATEGORY_NAME_KEY: &str = "CatDebug_AddCategoryNameToLog";
/// Store key for [`GlobalOptions::add_category_name_to_log_single_line`].
pub const SINGLE_LINE_KEY: &str = "CatDebug_AddCategoryNameToLogSingleLine";
/// Store key for [`GlobalOptions::always_show_warnings`].
pub const ALWAYS_SHOW_WARNINGS_KEY: &str = "CatDebug_AlwaysShowWarnings";
/// Store key for [`GlobalOptions::log_to_file_include_stack_trace`].
pub const STACK_TRACE_KEY: &str = "CatDebug_LogToFileIncludeStackTrace";

/// Default location of the log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "CategoricalLog.txt";

/// Process-wide formatting and routing options.
///
/// Read by every log call; changed at runtime through
/// [`Dispatcher::set_options`](crate::Dispatcher::set_options).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalOptions {
    /// Prefix each scoped entry with the category name.
    pub add_category_name_to_log: bool,
    /// Use `"<name>: "` instead of `"Category: <name>\n"` as the prefix.
    pub add_category_name_to_log_single_line: bool,
    /// Show warnings even when the category's sinks are disabled.
    pub always_show_warnings: bool,
    /// Append a captured backtrace to every file entry.
    pub log_to_file_include_stack_trace: bool,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            add_category_name_to_log: false,
            add_category_name_to_log_single_line: false,
            always_show_warnings: true,
            log_to_file_include_stack_trace: false,
        }
    }
}

impl GlobalOptions {
    /// Reads the options from `store`, falling back to defaults for absent keys.
    pub fn load<S>(store: &S) -> Self
    where
        S: SettingsStore + ?Sized,
    {
        let defaults = Self::default();
        Self {
            add_category_name_to_log: store
                .get_bool(ADD_CATEGORY_NAME_KEY, defaults.add_category_name_to_log),
            add_category_name_to_log_single_line: store.get_bool(
                SINGLE_LINE_KEY,
                defaults.add_category_name_to_log_single_line,
            ),
            always_show_warnings: store
                .get_bool(ALWAYS_SHOW_WARNINGS_KEY, defaults.always_show_warnings),
            log_to_file_include_stack_trace: store
                .get_bool(STACK_TRACE_KEY, defaults.log_to_file_include_stack_trace),
        }
    }

    /// Writes the options to `store` and flushes it.
    pub fn save<S>(&self, store: &S) -> Result<(), StoreError>
    where
        S: SettingsStore + ?Sized,
    {
        store.set_bool(ADD_CATEGORY_NAME_KEY, self.add_category_name_to_log);
        store.set_bool(SINGLE_LINE_KEY, self.add_category_name_to_log_single_line);
        store.set_bool(ALWAYS_SHOW_WARNINGS_KEY, self.always_show_warnings);
        store.set_bool(STACK_TRACE_KEY, self.log_to_file_include_stack_trace);
        store.flush()
    }

    /// Enables or disables the category-name prefix.
    #[must_use]
    pub const fn with_category_name(mut self, enabled: bool) -> Self {
        self.add_category_name_to_log = enabled;
        self
    }

    /// Selects the single-line category prefix.
    #[must_use]
    pub const fn with_single_line(mut self, enabled: bool) -> Self {
        self.add_category_name_to_log_single_line = enabled;
        self
    }

    /// Controls whether warnings bypass the category switches.
    #[must_use]
    pub const fn with_always_show_warnings(mut self, enabled: bool) -> Self {
        self.always_show_warnings = enabled;
        self
    }

    /// Controls whether file entries carry a backtrace.
    #[must_use]
    pub const fn with_stack_trace(mut self, enabled: bool) -> Self {
        self.log_to_file_include_stack_trace = enabled;
        self
    }
}

/// Construction-time settings for a [`Dispatcher`](crate::Dispatcher).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatcherConfig {
    log_file: Option<PathBuf>,
    instance_name: Option<String>,
    instance_name_single_line: bool,
}

impl DispatcherConfig {
    /// Configuration with no log file and no instance label.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the file sink at `path`.
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Enables the file sink at [`DEFAULT_LOG_FILE`].
    #[must_use]
    pub fn with_default_log_file(self) -> Self {
        self.with_log_file(DEFAULT_LOG_FILE)
    }

    /// Labels every entry with `name`.
    #[must_use]
    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = Some(name.into());
        self
    }

    /// Keeps the instance label on the same line as the message.
    #[must_use]
    pub const fn with_instance_name_single_line(mut self, enabled: bool) -> Self {
        self.instance_name_single_line = enabled;
        self
    }

    /// Path of the log file, if the file sink is enabled.
    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Instance label, if any.
    #[must_use]
    pub fn instance_name(&self) -> Option<&str> {
        self.instance_name.as_deref()
    }

    /// Whether the instance label is followed by a newline.
    #[must_use]
    pub const fn instance_name_single_line(&self) -> bool {
        self.instance_name_single_line
    }
}
