use std::io;
use std::path::PathBuf;

/// Errors surfaced by [`SettingsStore`](crate::SettingsStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error while reading or writing the backing file.
    #[error("{context} '{path}': {source}")]
    Io {
        /// What the store was doing when the error occurred.
        context: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The backing document could not be parsed or serialized.
    #[error("malformed settings document '{path}': {source}")]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
