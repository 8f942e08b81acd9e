//! crates/logging/src/macros.rs
//! Formatting macros over category facades.
//!
//! Each macro exists twice: with the `enabled` feature it forwards to the
//! facade, without it the invocation expands to `()` and none of its
//! arguments are evaluated.

use crate::facade::{CategoryAssert, CategoryLogger, GlobalCategory};

/// Anything the logging macros can log through.
pub trait AsCategoryLogger {
    /// The logger to use, or `None` when it is not available yet.
    fn as_category_logger(&self) -> Option<&CategoryLogger>;
}

/// Anything [`cat_assert!`](crate::cat_assert) can check through.
pub trait AsCategoryAssert {
    /// The assert handle to use, or `None` when it is not available yet.
    fn as_category_assert(&self) -> Option<&CategoryAssert>;
}

impl AsCategoryLogger for CategoryLogger {
    fn as_category_logger(&self) -> Option<&CategoryLogger> {
        Some(self)
    }
}

impl AsCategoryLogger for GlobalCategory {
    fn as_category_logger(&self) -> Option<&CategoryLogger> {
        self.logger()
    }
}

impl<T> AsCategoryLogger for &T
where
    T: AsCategoryLogger + ?Sized,
{
    fn as_category_logger(&self) -> Option<&CategoryLogger> {
        (**self).as_category_logger()
    }
}

impl AsCategoryAssert for CategoryAssert {
    fn as_category_assert(&self) -> Option<&CategoryAssert> {
        Some(self)
    }
}

impl AsCategoryAssert for GlobalCategory {
    fn as_category_assert(&self) -> Option<&CategoryAssert> {
        self.asserts()
    }
}

impl<T> AsCategoryAssert for &T
where
    T: AsCategoryAssert + ?Sized,
{
    fn as_category_assert(&self) -> Option<&CategoryAssert> {
        (**self).as_category_assert()
    }
}

/// Declares a `static` [`GlobalCategory`] bound to the installed context.
///
/// ```
/// logging::declare_category!(pub PHYSICS = "Physics");
///
/// assert_eq!(PHYSICS.name(), "Physics");
/// // No context installed yet: the macros below are silent no-ops.
/// logging::cat_log!(PHYSICS, "step {}", 1);
/// ```
#[macro_export]
macro_rules! declare_category {
    ($(#[$meta:meta])* $vis:vis $ident:ident = $name:expr) => {
        $(#[$meta])*
        $vis static $ident: $crate::GlobalCategory = $crate::GlobalCategory::new($name);
    };
}

/// Logs a formatted message through a category logger.
///
/// ```
/// use std::sync::Arc;
/// use logging::{DiagnosticsContext, cat_log};
/// use logging_sink::CapturingConsole;
/// use settings_store::MemoryStore;
///
/// let console = Arc::new(CapturingConsole::new());
/// let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
///     .console(console.clone())
///     .build();
/// let physics = ctx.category_logger("Physics");
///
/// cat_log!(physics, "{} bodies", 3);
/// assert_eq!(console.texts(), vec!["3 bodies".to_owned()]);
/// ```
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! cat_log {
    ($target:expr, $($arg:tt)+) => {
        if let ::core::option::Option::Some(logger) =
            $crate::AsCategoryLogger::as_category_logger(&$target)
        {
            logger.log(::core::format_args!($($arg)+));
        }
    };
}

/// Logs a formatted message through a category logger.
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! cat_log {
    ($($tokens:tt)*) => {
        ()
    };
}

/// Logs a formatted warning through a category logger.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! cat_warn {
    ($target:expr, $($arg:tt)+) => {
        if let ::core::option::Option::Some(logger) =
            $crate::AsCategoryLogger::as_category_logger(&$target)
        {
            logger.log_warning(::core::format_args!($($arg)+));
        }
    };
}

/// Logs a formatted warning through a category logger.
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! cat_warn {
    ($($tokens:tt)*) => {
        ()
    };
}

/// Logs a formatted error through a category logger.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! cat_error {
    ($target:expr, $($arg:tt)+) => {
        if let ::core::option::Option::Some(logger) =
            $crate::AsCategoryLogger::as_category_logger(&$target)
        {
            logger.log_error(::core::format_args!($($arg)+));
        }
    };
}

/// Logs a formatted error through a category logger.
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! cat_error {
    ($($tokens:tt)*) => {
        ()
    };
}

/// Checks a condition through a category assert handle.
///
/// The condition is only evaluated while the category's asserts are on.
/// Without a message, the stringified condition is used.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! cat_assert {
    ($target:expr, $cond:expr $(,)?) => {
        $crate::cat_assert!($target, $cond, "{}", ::core::stringify!($cond))
    };
    ($target:expr, $cond:expr, $($arg:tt)+) => {
        if let ::core::option::Option::Some(asserts) =
            $crate::AsCategoryAssert::as_category_assert(&$target)
        {
            asserts.expensive_is_true(|| $cond, ::core::format_args!($($arg)+));
        }
    };
}

/// Checks a condition through a category assert handle.
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! cat_assert {
    ($($tokens:tt)*) => {
        ()
    };
}

#[cfg(all(test, feature = "enabled"))]
mod tests {
    use std::sync::Arc;

    use logging_sink::CapturingConsole;
    use settings_store::MemoryStore;

    use crate::DiagnosticsContext;

    #[test]
    fn macros_format_through_logger() {
        let console = Arc::new(CapturingConsole::new());
        let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
            .console(console.clone())
            .build();
        let logger = ctx.category_logger("Net");
        let by_ref = &logger;

        crate::cat_log!(logger, "a{}", 1);
        crate::cat_warn!(by_ref, "b{}", 2);
        crate::cat_error!(logger, "c");
        assert_eq!(
            console.texts(),
            vec!["a1".to_owned(), "b2".to_owned(), "c".to_owned()]
        );
    }

    #[test]
    fn assert_macro_uses_condition_text_by_default() {
        let console = Arc::new(CapturingConsole::new());
        let ctx = DiagnosticsContext::builder(Arc::new(MemoryStore::new()))
            .console(console.clone())
            .build();
        let asserts = ctx.category_assert("Net");
        let packets = 0;

        crate::cat_assert!(asserts, packets > 0);
        crate::cat_assert!(asserts, packets == 0, "never shown");

        let texts = console.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("packets > 0"), "{}", texts[0]);
    }
}
