use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::{ConsoleSink, Severity};

/// Console sink that renders lines into an [`std::io::Write`] target.
///
/// Warnings and errors are prefixed with `warning: ` and `error: `; regular
/// lines are written unchanged. The writer sits behind a mutex so one sink
/// can be shared by every thread that logs.
///
/// # Examples
///
/// ```
/// use logging_sink::{ConsoleSink, Severity, WriterConsole};
///
/// let console = WriterConsole::new(Vec::new());
/// console.write_line(Severity::Info, "ready");
/// console.write_line(Severity::Error, "failed");
///
/// let output = String::from_utf8(console.into_inner()).unwrap();
/// assert_eq!(output, "ready\nerror: failed\n");
/// ```
pub struct WriterConsole<W> {
    writer: Mutex<W>,
    terminate_lines: bool,
}

impl<W> WriterConsole<W> {
    /// Creates a console that ends every line with `\n`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            terminate_lines: true,
        }
    }

    /// Creates a console that writes lines back to back, for writers that
    /// frame records themselves.
    #[must_use]
    pub fn unterminated(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            terminate_lines: false,
        }
    }

    /// Whether each line is followed by `\n`.
    #[must_use]
    pub const fn terminates_lines(&self) -> bool {
        self.terminate_lines
    }

    /// Consumes the console and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriterConsole<io::Stderr> {
    /// Console writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl WriterConsole<io::Stdout> {
    /// Console writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> WriterConsole<W>
where
    W: Write,
{
    fn render(&self, severity: Severity, text: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        match severity {
            Severity::Info => {}
            Severity::Warning | Severity::Error => write!(writer, "{severity}: ")?,
        }
        writer.write_all(text.as_bytes())?;
        if self.terminate_lines {
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

impl<W> ConsoleSink for WriterConsole<W>
where
    W: Write + Send,
{
    fn write_line(&self, severity: Severity, text: &str) {
        // A console that cannot be written to has nowhere to report the failure.
        if let Err(error) = self.render(severity, text) {
            tracing::trace!(%error, "console write failed");
        }
    }
}

impl<W> fmt::Debug for WriterConsole<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterConsole")
            .field("terminate_lines", &self.terminate_lines)
            .finish_non_exhaustive()
    }
}
