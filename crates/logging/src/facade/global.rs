use std::sync::OnceLock;

use super::{CategoryAssert, CategoryLogger};
use crate::context;

/// Category bound to the process-wide [`DiagnosticsContext`](crate::DiagnosticsContext).
///
/// Usable in a `static`; the facades are created on first access once a
/// context has been [`install`](crate::install)ed. Declared with
/// [`declare_category!`](crate::declare_category).
#[derive(Debug)]
pub struct GlobalCategory {
    name: &'static str,
    logger: OnceLock<CategoryLogger>,
    asserts: OnceLock<CategoryAssert>,
}

impl GlobalCategory {
    /// Declares a category called `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            logger: OnceLock::new(),
            asserts: OnceLock::new(),
        }
    }

    /// Category name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Logger for this category, or `None` before a context is installed.
    pub fn logger(&self) -> Option<&CategoryLogger> {
        if let Some(logger) = self.logger.get() {
            return Some(logger);
        }
        let context = context::global()?;
        Some(
            self.logger
                .get_or_init(|| CategoryLogger::new(context.clone(), self.name)),
        )
    }

    /// Assert handle for this category, or `None` before a context is installed.
    pub fn asserts(&self) -> Option<&CategoryAssert> {
        if let Some(asserts) = self.asserts.get() {
            return Some(asserts);
        }
        let context = context::global()?;
        Some(
            self.asserts
                .get_or_init(|| CategoryAssert::new(context.clone(), self.name)),
        )
    }
}
