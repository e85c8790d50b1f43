//! File-backed session store

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use crate::formatter::Formatter;
use crate::io::{append_jsonl, atomic_write, read_jsonl, scan_jsonl};
use crate::paths::{session_file_stem, Paths};
use crate::types::{IndexEntry, ProvenanceRecord, Session};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// Extension `read_session` can decode
const READABLE_EXTENSION: &str = "jsonl";

/// Persistence for sessions, the session index, and provenance records
pub trait Storage {
    /// Create the directory structure. Safe to call repeatedly.
    fn init(&self) -> Result<()>;

    /// Write a session with every configured formatter
    ///
    /// Returns the primary (first formatter's) path, or `None` when no
    /// formatter is configured.
    fn write_session(&self, session: &Session) -> Result<Option<PathBuf>>;

    /// Add an entry to the session index unless its session is already indexed
    fn write_index(&self, entry: &IndexEntry) -> Result<()>;

    /// Append a provenance record
    fn write_provenance(&self, record: &ProvenanceRecord) -> Result<()>;

    /// Load a session through its index entry
    fn read_session(&self, session_id: &str) -> Result<Session>;

    /// All index entries, oldest first
    fn list_sessions(&self) -> Result<Vec<IndexEntry>>;

    /// Provenance records whose artifact path equals `artifact_path`
    fn query_provenance(&self, artifact_path: &str) -> Result<Vec<ProvenanceRecord>>;

    /// Release held resources
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// [`Storage`] on the local filesystem
///
/// No in-process locking is applied. Two processes calling `write_index`
/// for the same session can both pass the dedup scan and both append; an
/// OS-level file lock around the check and append would be needed to rule
/// that out. The dedup scan reads the whole index on every write.
pub struct FileStorage {
    config: StorageConfig,
    paths: Paths,
    formatters: Vec<Box<dyn Formatter>>,
}

impl FileStorage {
    pub fn new(config: StorageConfig) -> Self {
        let paths = Paths::new(config.base_dir.clone());
        Self {
            config,
            paths,
            formatters: Vec::new(),
        }
    }

    /// Store rooted at `base_dir` with default settings
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self::new(StorageConfig::new(base_dir))
    }

    /// Register a formatter; the first one registered is the primary format
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatters.push(Box::new(formatter));
        self
    }

    /// Replace the formatter list
    pub fn with_formatters(mut self, formatters: Vec<Box<dyn Formatter>>) -> Self {
        self.formatters = formatters;
        self
    }

    pub fn formatters(&self) -> &[Box<dyn Formatter>] {
        &self.formatters
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn base_dir(&self) -> &Path {
        self.paths.base_dir()
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.paths.sessions_dir()
    }

    pub fn index_path(&self) -> PathBuf {
        self.paths.index_file()
    }

    pub fn provenance_path(&self) -> PathBuf {
        self.paths.provenance_file()
    }

    fn has_index_entry(&self, session_id: &str) -> Result<bool> {
        let mut found = false;
        scan_jsonl(&self.index_path(), |entry: IndexEntry| {
            if entry.session_id == session_id {
                found = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found)
    }
}

impl Storage for FileStorage {
    fn init(&self) -> Result<()> {
        for dir in self.paths.managed_dirs() {
            std::fs::create_dir_all(&dir)
                .map_err(|e| StorageError::io("create directory", &dir, e))?;
        }
        tracing::debug!(base_dir = %self.base_dir().display(), "storage initialized");
        Ok(())
    }

    fn write_session(&self, session: &Session) -> Result<Option<PathBuf>> {
        if session.id.is_empty() {
            return Err(StorageError::SessionIdRequired);
        }

        let stem = session_file_stem(session);
        let mut primary = None;

        for formatter in &self.formatters {
            let path = self.paths.session_file(&stem, formatter.extension());
            atomic_write(&path, self.config.sync, |w| formatter.format(w, session))?;
            tracing::debug!(session_id = %session.id, path = %path.display(), "session written");
            if primary.is_none() {
                primary = Some(path);
            }
        }

        Ok(primary)
    }

    fn write_index(&self, entry: &IndexEntry) -> Result<()> {
        if self.has_index_entry(&entry.session_id)? {
            tracing::debug!(session_id = %entry.session_id, "session already indexed");
            return Ok(());
        }
        append_jsonl(&self.index_path(), entry, self.config.sync)
    }

    fn write_provenance(&self, record: &ProvenanceRecord) -> Result<()> {
        append_jsonl(&self.provenance_path(), record, self.config.sync)
    }

    fn read_session(&self, session_id: &str) -> Result<Session> {
        let entry = self
            .list_sessions()?
            .into_iter()
            .find(|entry| entry.session_id == session_id)
            .ok_or_else(|| StorageError::SessionNotFound(session_id.to_string()))?;
        read_session_file(&entry.session_path)
    }

    fn list_sessions(&self) -> Result<Vec<IndexEntry>> {
        read_jsonl(&self.index_path())
    }

    fn query_provenance(&self, artifact_path: &str) -> Result<Vec<ProvenanceRecord>> {
        let mut records = Vec::new();
        scan_jsonl(&self.provenance_path(), |record: ProvenanceRecord| {
            if record.artifact_path == artifact_path {
                records.push(record);
            }
            ControlFlow::Continue(())
        })?;
        Ok(records)
    }
}

/// Decode a single-record JSONL session file
pub(crate) fn read_session_file(path: &Path) -> Result<Session> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if extension != READABLE_EXTENSION {
        return Err(StorageError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    let file = File::open(path).map_err(|e| StorageError::io("open", path, e))?;
    let mut reader = BufReader::new(file);
    let mut line = Vec::new();
    let read = reader
        .read_until(b'\n', &mut line)
        .map_err(|e| StorageError::io("read", path, e))?;
    if read == 0 {
        return Err(StorageError::EmptySessionFile {
            path: path.to_path_buf(),
        });
    }

    serde_json::from_slice(line.trim_ascii_end()).map_err(|source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
