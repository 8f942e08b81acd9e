use std::sync::{Mutex, PoisonError};

use crate::{ConsoleSink, Severity};

/// One line recorded by a [`CapturingConsole`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Severity the line was emitted with.
    pub severity: Severity,
    /// Composed text.
    pub text: String,
}

impl ConsoleLine {
    /// Creates a line record.
    #[must_use]
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

/// Console sink that keeps every line in memory.
///
/// Used by tests and by hosts that render log output themselves.
#[derive(Debug, Default)]
pub struct CapturingConsole {
    lines: Mutex<Vec<ConsoleLine>>,
}

impl CapturingConsole {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every captured line in emission order.
    pub fn drain(&self) -> Vec<ConsoleLine> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns a copy of the captured lines without clearing them.
    #[must_use]
    pub fn lines(&self) -> Vec<ConsoleLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns only the text of the captured lines.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|line| line.text.clone())
            .collect()
    }

    /// Number of captured lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` when nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConsoleSink for CapturingConsole {
    fn write_line(&self, severity: Severity, text: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ConsoleLine::new(severity, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_capture() {
        let console = CapturingConsole::new();
        console.write_line(Severity::Info, "a");
        console.write_line(Severity::Error, "b");
        assert_eq!(console.len(), 2);

        let drained = console.drain();
        assert_eq!(
            drained,
            vec![
                ConsoleLine::new(Severity::Info, "a"),
                ConsoleLine::new(Severity::Error, "b"),
            ]
        );
        assert!(console.is_empty());
    }

    #[test]
    fn lines_leaves_capture_intact() {
        let console = CapturingConsole::new();
        console.write_line(Severity::Warning, "w");
        assert_eq!(console.texts(), vec!["w".to_owned()]);
        assert_eq!(console.lines().len(), 1);
        assert_eq!(console.len(), 1);
    }
}
