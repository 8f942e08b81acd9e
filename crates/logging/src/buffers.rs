//! crates/logging/src/buffers.rs
//! Deferred prepend/append text consumed by the next matching log call.

use std::fmt::Write as _;
use std::sync::{Mutex, PoisonError};

use category::CategoryId;
use dashmap::DashMap;

/// Selects which deferred buffer an operation targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferScope {
    /// Buffer consumed by the next uncategorized log call.
    Unscoped,
    /// Buffer consumed by the next log call for this category.
    Category(CategoryId),
}

impl From<CategoryId> for BufferScope {
    fn from(id: CategoryId) -> Self {
        Self::Category(id)
    }
}

/// One side (prepend or append) of the deferred text.
#[derive(Debug, Default)]
struct Side {
    unscoped: Mutex<String>,
    scoped: DashMap<CategoryId, String>,
}

impl Side {
    // Callers render first: a `Display` impl may log, so none runs under these locks.
    fn push(&self, scope: BufferScope, text: &str) {
        if text.is_empty() {
            return;
        }
        match scope {
            BufferScope::Unscoped => self
                .unscoped
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_str(text),
            BufferScope::Category(id) => self.scoped.entry(id).or_default().push_str(text),
        }
    }

    fn take(&self, scope: BufferScope) -> String {
        match scope {
            BufferScope::Unscoped => {
                std::mem::take(&mut *self.unscoped.lock().unwrap_or_else(PoisonError::into_inner))
            }
            BufferScope::Category(id) => self
                .scoped
                .remove(&id)
                .map(|(_, text)| text)
                .unwrap_or_default(),
        }
    }

    fn peek(&self, scope: BufferScope) -> String {
        match scope {
            BufferScope::Unscoped => self
                .unscoped
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            BufferScope::Category(id) => self
                .scoped
                .get(&id)
                .map(|text| text.value().clone())
                .unwrap_or_default(),
        }
    }
}

/// Prepend and append buffers for the unscoped channel and every category.
///
/// Appends to one buffer and a take of the same buffer never interleave:
/// text is either fully included in the take or left for the next one.
#[derive(Debug, Default)]
pub(crate) struct TextBuffers {
    prepend: Side,
    append: Side,
}

impl TextBuffers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_prepend(&self, scope: BufferScope, text: &dyn std::fmt::Display) {
        self.prepend.push(scope, &render(&[text]));
    }

    pub(crate) fn push_append(&self, scope: BufferScope, text: &dyn std::fmt::Display) {
        self.append.push(scope, &render(&[text]));
    }

    pub(crate) fn push_prepend_parts(&self, scope: BufferScope, parts: &[&dyn std::fmt::Display]) {
        self.prepend.push(scope, &render(parts));
    }

    pub(crate) fn push_append_parts(&self, scope: BufferScope, parts: &[&dyn std::fmt::Display]) {
        self.append.push(scope, &render(parts));
    }

    /// Drops both sides of a category's text.
    pub(crate) fn forget(&self, id: CategoryId) {
        self.prepend.scoped.remove(&id);
        self.append.scoped.remove(&id);
    }

    pub(crate) fn take_prepend(&self, scope: BufferScope) -> String {
        self.prepend.take(scope)
    }

    pub(crate) fn take_append(&self, scope: BufferScope) -> String {
        self.append.take(scope)
    }

    pub(crate) fn peek_prepend(&self, scope: BufferScope) -> String {
        self.prepend.peek(scope)
    }

    pub(crate) fn peek_append(&self, scope: BufferScope) -> String {
        self.append.peek(scope)
    }

    pub(crate) fn clear_prepend(&self, scope: BufferScope) {
        drop(self.prepend.take(scope));
    }

    pub(crate) fn clear_append(&self, scope: BufferScope) {
        drop(self.append.take(scope));
    }
}

fn render(parts: &[&dyn std::fmt::Display]) -> String {
    let mut text = String::new();
    push_parts(&mut text, parts);
    text
}

fn push_display(buffer: &mut String, text: &dyn std::fmt::Display) {
    // Writing into a String cannot fail.
    let _ = write!(buffer, "{text}");
}

pub(crate) fn push_parts(buffer: &mut String, parts: &[&dyn std::fmt::Display]) {
    for part in parts {
        push_display(buffer, *part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u16) -> CategoryId {
        CategoryId::new(raw).expect("id")
    }

    #[test]
    fn take_consumes_once() {
        let buffers = TextBuffers::new();
        buffers.push_prepend(BufferScope::Unscoped, &"a");
        buffers.push_prepend(BufferScope::Unscoped, &"b");
        assert_eq!(buffers.take_prepend(BufferScope::Unscoped), "ab");
        assert_eq!(buffers.take_prepend(BufferScope::Unscoped), "");
    }

    #[test]
    fn scopes_are_independent() {
        let buffers = TextBuffers::new();
        buffers.push_append(id(1).into(), &"one");
        buffers.push_append(id(2).into(), &"two");
        buffers.push_append(BufferScope::Unscoped, &"none");

        assert_eq!(buffers.take_append(id(2).into()), "two");
        assert_eq!(buffers.peek_append(id(1).into()), "one");
        assert_eq!(buffers.take_append(BufferScope::Unscoped), "none");
        assert_eq!(buffers.take_append(id(1).into()), "one");
    }

    #[test]
    fn parts_are_concatenated_in_order() {
        let buffers = TextBuffers::new();
        buffers.push_prepend_parts(id(0).into(), &[&"x=", &42, &", "]);
        assert_eq!(buffers.take_prepend(id(0).into()), "x=42, ");
    }

    #[test]
    fn forget_drops_both_sides_of_one_category() {
        let buffers = TextBuffers::new();
        buffers.push_prepend(id(3).into(), &"p");
        buffers.push_append(id(3).into(), &"a");
        buffers.push_append(id(4).into(), &"kept");
        buffers.forget(id(3));
        assert_eq!(buffers.peek_prepend(id(3).into()), "");
        assert_eq!(buffers.peek_append(id(3).into()), "");
        assert_eq!(buffers.peek_append(id(4).into()), "kept");
    }

    #[test]
    fn clear_discards_without_touching_other_side() {
        let buffers = TextBuffers::new();
        buffers.push_prepend(BufferScope::Unscoped, &"p");
        buffers.push_append(BufferScope::Unscoped, &"a");
        buffers.clear_prepend(BufferScope::Unscoped);
        assert_eq!(buffers.peek_prepend(BufferScope::Unscoped), "");
        assert_eq!(buffers.peek_append(BufferScope::Unscoped), "a");
    }
}
