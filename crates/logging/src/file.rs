//! crates/logging/src/file.rs
//! Plain-text log file with `.BAK` rotation and idempotent close.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use logging_sink::{ConsoleSink, Severity};

/// Suffix appended to the log path to form the backup path.
pub const BACKUP_SUFFIX: &str = ".BAK";

/// Log file owned by one dispatcher.
///
/// Every write, and the close, go through a single lock, so entries from
/// concurrent callers never interleave. After [`close`](Self::close) the
/// file is inert.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl LogFile {
    /// Rotates any existing file at `path` to its backup and opens a fresh one.
    ///
    /// Failures never abort: they are reported as warnings through `tracing`
    /// and `console`. When the file cannot be created the returned sink is
    /// inert.
    pub fn open(path: impl Into<PathBuf>, console: &dyn ConsoleSink) -> Self {
        let path = path.into();
        if path.exists() {
            if let Err(error) = rotate(&path) {
                let text = format!(
                    "Failed to delete existing log file {}, (possibly open).  Trying Write anyway.",
                    path.display()
                );
                tracing::warn!(%error, path = %path.display(), "log file rotation failed");
                console.write_line(Severity::Warning, &text);
            }
        }

        let writer = match File::create(&path) {
            Ok(file) => {
                tracing::debug!(path = %path.display(), "log file opened");
                Some(BufWriter::new(file))
            }
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "log file creation failed");
                console.write_line(
                    Severity::Warning,
                    &format!("Failed to create file {}", path.display()),
                );
                None
            }
        };

        Self {
            path,
            writer: Mutex::new(writer),
        }
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path the previous log file is rotated to.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.path)
    }

    /// Reports whether the file is open for writing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Writes one entry followed by a newline.
    ///
    /// A closed or never-opened file silently drops the entry.
    pub fn write_entry(&self, text: &str) -> io::Result<()> {
        let mut guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(writer) => {
                writer.write_all(text.as_bytes())?;
                writer.write_all(b"\n")
            }
            None => Ok(()),
        }
    }

    /// Flushes buffered entries without closing.
    pub fn flush(&self) -> io::Result<()> {
        match self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Flushes and closes the file.
    ///
    /// Returns `true` for the call that actually closed it; later and
    /// concurrent calls return `false`.
    pub fn close(&self) -> bool {
        let taken = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match taken {
            Some(mut writer) => {
                if let Err(error) = writer.flush() {
                    tracing::warn!(%error, path = %self.path.display(), "log file flush failed");
                }
                true
            }
            None => false,
        }
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        self.close();
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn rotate(path: &Path) -> io::Result<()> {
    let backup = backup_path(path);
    match fs::remove_file(&backup) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }
    fs::rename(path, &backup)
}
