use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt::{Debug, Display};
use std::panic::Location;

use category::{CategoryId, CategorySettings};

use super::CategoryHandle;
use super::handler::{AssertionFailure, AssertionKind};
use crate::ENABLED;
use crate::context::DiagnosticsContext;

/// Assertion handle for one category.
///
/// Checks only run while the category's `asserts` switch is on; failures go
/// to the context's [`AssertionHandler`](crate::AssertionHandler).
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
/// let physics = ctx.category_assert("Physics");
/// physics.is_true(1 + 1 == 2, "arithmetic");
/// assert!(console.is_empty());
///
/// physics.is_equal(3, 4, "body count");
/// assert!(console.texts()[0].contains("expected 3, got 4"));
/// ```
#[derive(Debug)]
pub struct CategoryAssert {
    handle: CategoryHandle,
}

impl CategoryAssert {
    /// Binds an assert handle to `name`; the category is registered on first use.
    pub fn new(context: DiagnosticsContext, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            handle: CategoryHandle::new(context, name.into()),
        }
    }

    /// Name this handle is bound to.
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

    /// Reports whether checks are currently evaluated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        ENABLED && self.active_id().is_some()
    }

    fn active_id(&self) -> Option<CategoryId> {
        let id = self.handle.id()?;
        let switches = self.handle.context.registry().switches(id)?;
        switches.asserts.then_some(id)
    }

    fn fail(
        &self,
        id: CategoryId,
        kind: AssertionKind,
        message: &dyn Display,
        location: &'static Location<'static>,
    ) {
        let message = message.to_string();
        let failure = AssertionFailure {
            category: id,
            category_name: &self.handle.name,
            kind,
            message: &message,
            location,
        };
        let context = &self.handle.context;
        context
            .assertion_handler()
            .on_failure(&failure, context.dispatcher());
    }

    /// Fails when `condition` is false.
    #[track_caller]
    #[inline]
    pub fn is_true(&self, condition: bool, message: impl Display) {
        if !ENABLED {
            return;
        }
        let location = Location::caller();
        if let Some(id) = self.active_id() {
            if !condition {
                self.fail(id, AssertionKind::IsTrue, &message, location);
            }
        }
    }

    /// Fails when `condition` is true.
    #[track_caller]
    #[inline]
    pub fn is_false(&self, condition: bool, message: impl Display) {
        if !ENABLED {
            return;
        }
        let location = Location::caller();
        if let Some(id) = self.active_id() {
            if condition {
                self.fail(id, AssertionKind::IsFalse, &message, location);
            }
        }
    }

    /// Like [`is_true`](Self::is_true), but `condition` only runs while checks are active.
    #[track_caller]
    #[inline]
    pub fn expensive_is_true<F>(&self, condition: F, message: impl Display)
    where
        F: FnOnce() -> bool,
    {
        if !ENABLED {
            return;
        }
        let location = Location::caller();
        if let Some(id) = self.active_id() {
            if !condition() {
                self.fail(id, AssertionKind::IsTrue, &message, location);
            }
        }
    }

    /// Fails when `value` is `None`.
    #[track_caller]
    #[inline]
    pub fn is_some<T>(&self, value: Option<&T>, message: impl Display) {
        if !ENABLED {
            return;
        }
        let location = Location::caller();
        if let Some(id) = self.active_id() {
            if value.is_none() {
                self.fail(id, AssertionKind::IsSome, &message, location);
            }
        }
    }

    /// Fails at the first `None` in `values`.
    #[track_caller]
    #[inline]
    pub fn all_some<T>(&self, values: &[Option<T>], message: impl Display) {
        if !ENABLED {
            return;
        }
        let location = Location::caller();
        if let Some(id) = self.active_id() {
            if let Some(index) = values.iter().position(Option::is_none) {
                self.fail(id, AssertionKind::AllSome { index }, &message, location);
            }
        }
    }

    /// Fails when `expected != actual`.
    #[track_caller]
    #[inline]
    pub fn is_equal<T>(&self, expected: T, actual: T, message: impl Display)
    where
        T: PartialEq + Debug,
    {
        if !ENABLED {
            return;
        }
        let location = Location::caller();
        if let Some(id) = self.active_id() {
            if expected != actual {
                let kind = AssertionKind::IsEqual {
                    expected: format!("{expected:?}"),
                    actual: format!("{actual:?}"),
                };
                self.fail(id, kind, &message, location);
            }
        }
    }

    /// Fails when `value` is not a `T`.
    #[track_caller]
    #[inline]
    pub fn is_type<T: Any>(&self, value: &dyn Any, message: impl Display) {
        if !ENABLED {
            return;
        }
        let location = Location::caller();
        if let Some(id) = self.active_id() {
            if !value.is::<T>() {
                let kind = AssertionKind::IsType {
                    expected: type_name::<T>(),
                };
                self.fail(id, kind, &message, location);
            }
        }
    }
}
