//! crates/category/src/keys.rs
//! Store key layout for per-category records.
//!
//! Keys have the shape `CatDebugKey<id>/<Field>`. Records written by the older
//! two-switch layout use the `Enabled` and `alwaysLogToFile` fields; they are
//! read as a fallback and removed on the next save.

use crate::CategoryId;

/// Prefix shared by every per-category key.
pub const KEY_BASE: &str = "CatDebugKey";

const NAME: &str = "Name";
const CONSOLE_LOGGING: &str = "EnableConsoleLogging";
const FILE_LOGGING: &str = "EnableFileLogging";
const ASSERTS: &str = "EnableAsserts";
const LEGACY_ENABLED: &str = "Enabled";
const LEGACY_ALWAYS_LOG_TO_FILE: &str = "alwaysLogToFile";

/// `CatDebugKey<id>`
#[must_use]
pub fn key_base(id: CategoryId) -> String {
    format!("{KEY_BASE}{id}")
}

fn field(id: CategoryId, field: &str) -> String {
    format!("{KEY_BASE}{id}/{field}")
}

/// Key holding the category name. Its presence marks a persisted record.
#[must_use]
pub fn name(id: CategoryId) -> String {
    field(id, NAME)
}

/// Key holding the console-logging switch.
#[must_use]
pub fn console_logging(id: CategoryId) -> String {
    field(id, CONSOLE_LOGGING)
}

/// Key holding the file-logging switch.
#[must_use]
pub fn file_logging(id: CategoryId) -> String {
    field(id, FILE_LOGGING)
}

/// Key holding the asserts switch.
#[must_use]
pub fn asserts(id: CategoryId) -> String {
    field(id, ASSERTS)
}

/// Two-switch layout: combined enable switch.
#[must_use]
pub fn legacy_enabled(id: CategoryId) -> String {
    field(id, LEGACY_ENABLED)
}

/// Two-switch layout: file output while disabled.
#[must_use]
pub fn legacy_always_log_to_file(id: CategoryId) -> String {
    field(id, LEGACY_ALWAYS_LOG_TO_FILE)
}

/// Every key a record for `id` may occupy, current and legacy.
#[must_use]
pub fn all(id: CategoryId) -> [String; 6] {
    [
        name(id),
        console_logging(id),
        file_logging(id),
        asserts(id),
        legacy_enabled(id),
        legacy_always_log_to_file(id),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shapes() {
        let id = CategoryId::new(17).unwrap();
        assert_eq!(key_base(id), "CatDebugKey17");
        assert_eq!(name(id), "CatDebugKey17/Name");
        assert_eq!(console_logging(id), "CatDebugKey17/EnableConsoleLogging");
        assert_eq!(file_logging(id), "CatDebugKey17/EnableFileLogging");
        assert_eq!(asserts(id), "CatDebugKey17/EnableAsserts");
        assert_eq!(legacy_enabled(id), "CatDebugKey17/Enabled");
        assert_eq!(legacy_always_log_to_file(id), "CatDebugKey17/alwaysLogToFile");
    }
}
