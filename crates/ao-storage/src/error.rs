//! Error types for session storage

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error produced by a content writer (usually a formatter).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A session write was attempted without an ID.
    #[error("session ID is required")]
    SessionIdRequired,

    /// A session file exists but has no content.
    #[error("empty session file: {}", path.display())]
    EmptySessionFile { path: PathBuf },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("unsupported format: .{extension} ({})", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("{operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write content: {source}")]
    WriteContent {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("marshal json for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn write_content(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::WriteContent {
            path: path.into(),
            source: source.into(),
        }
    }

    /// True for point lookups that found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
