//! On-disk layout of the storage tree

use crate::slug::generate_slug;
use crate::types::Session;
use std::path::{Path, PathBuf};

/// Session files, one per session per formatter
pub const SESSIONS_DIR: &str = "sessions";

/// Session index directory
pub const INDEX_DIR: &str = "index";

/// Provenance ledger directory
pub const PROVENANCE_DIR: &str = "provenance";

pub const INDEX_FILE: &str = "sessions.jsonl";

pub const PROVENANCE_FILE: &str = "provenance.jsonl";

const SHORT_ID_LEN: usize = 7;

/// Resolves paths inside a storage base directory
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.base_dir.join(SESSIONS_DIR)
    }

    pub fn index_dir(&self) -> PathBuf {
        self.base_dir.join(INDEX_DIR)
    }

    pub fn provenance_dir(&self) -> PathBuf {
        self.base_dir.join(PROVENANCE_DIR)
    }

    /// Get sessions.jsonl path
    pub fn index_file(&self) -> PathBuf {
        self.index_dir().join(INDEX_FILE)
    }

    /// Get provenance.jsonl path
    pub fn provenance_file(&self) -> PathBuf {
        self.provenance_dir().join(PROVENANCE_FILE)
    }

    /// The three directories created by `init`
    pub fn managed_dirs(&self) -> [PathBuf; 3] {
        [self.sessions_dir(), self.index_dir(), self.provenance_dir()]
    }

    /// `sessions/<stem>.<extension>`; a leading dot on the extension is ignored
    /// and an empty extension gives `sessions/<stem>`
    pub fn session_file(&self, stem: &str, extension: &str) -> PathBuf {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return self.sessions_dir().join(stem);
        }
        self.sessions_dir().join(format!("{}.{}", stem, extension))
    }
}

/// File stem for a session: `YYYY-MM-DD-<slug>-<short id>`
pub fn session_file_stem(session: &Session) -> String {
    // Separators in IDs must not escape sessions/
    let short_id: String = session
        .id
        .chars()
        .take(SHORT_ID_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!(
        "{}-{}-{}",
        session.date.format("%Y-%m-%d"),
        generate_slug(&session.summary),
        short_id
    )
}
