//! crates/logging/src/facade/mod.rs
//! Handles bound to one category name.
//!
//! A facade resolves its category id on first use (registering the name if
//! needed) and caches it for its lifetime. A name that cannot be registered
//! leaves the facade inert.

mod asserts;
mod global;
mod handler;
mod logger;

use std::borrow::Cow;
use std::sync::OnceLock;

use category::{CategoryId, CategorySettings, CategorySwitches};

use crate::context::DiagnosticsContext;

pub use asserts::CategoryAssert;
pub use global::GlobalCategory;
pub use handler::{
    AssertionFailure, AssertionHandler, AssertionKind, LogAssertionFailures, PanicOnFailure,
};
pub use logger::{CategoryLogger, make_category_logger};

/// Shared state of [`CategoryLogger`] and [`CategoryAssert`].
#[derive(Debug)]
struct CategoryHandle {
    context: DiagnosticsContext,
    name: Cow<'static, str>,
    id: OnceLock<Option<CategoryId>>,
}

impl CategoryHandle {
    fn new(context: DiagnosticsContext, name: Cow<'static, str>) -> Self {
        Self {
            context,
            name,
            id: OnceLock::new(),
        }
    }

    fn id(&self) -> Option<CategoryId> {
        *self.id.get_or_init(|| {
            match self.context.registry().register_category(&self.name) {
                Ok(id) => Some(id),
                Err(error) => {
                    tracing::warn!(name = %self.name, %error, "category facade left inert");
                    None
                }
            }
        })
    }

    fn switches(&self) -> Option<CategorySwitches> {
        self.id().and_then(|id| self.context.registry().switches(id))
    }

    fn settings(&self) -> Option<CategorySettings> {
        self.id()
            .and_then(|id| self.context.registry().category_settings(id))
    }
}
