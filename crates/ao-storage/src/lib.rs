//! Append-only file storage for agent sessions, the session index, and the
//! provenance ledger

mod config;
mod error;
mod formatter;
mod io;
mod paths;
mod slug;
mod store;
mod types;

pub use config::{StorageConfig, DEFAULT_BASE_DIR};
pub use error::{BoxError, Result, StorageError};
pub use formatter::Formatter;
pub use io::{append_jsonl, atomic_write, read_jsonl, scan_jsonl};
pub use paths::{
    session_file_stem, Paths, INDEX_DIR, INDEX_FILE, PROVENANCE_DIR, PROVENANCE_FILE,
    SESSIONS_DIR,
};
pub use slug::{generate_slug, SLUG_MAX_LENGTH, SLUG_MIN_WORD_BOUNDARY};
pub use store::{FileStorage, Storage};
pub use types::{
    IndexEntry, ProvenanceRecord, Session, TokenUsage, ARTIFACT_SESSION, SOURCE_TRANSCRIPT,
};
