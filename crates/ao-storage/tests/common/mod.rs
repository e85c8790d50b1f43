use ao_storage::{FileStorage, Formatter, Session, Storage, StorageConfig};
use chrono::{TimeZone, Utc};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Writes the session as one JSON line
pub struct LineFormatter;

impl Formatter for LineFormatter {
    fn format(&self, w: &mut dyn Write, session: &Session) -> anyhow::Result<()> {
        serde_json::to_writer(&mut *w, session)?;
        w.write_all(b"\n")?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "jsonl"
    }
}

/// Writes a little text, then fails
pub struct FailingFormatter;

impl Formatter for FailingFormatter {
    fn format(&self, w: &mut dyn Write, _session: &Session) -> anyhow::Result<()> {
        w.write_all(b"half a document")?;
        anyhow::bail!("format error")
    }

    fn extension(&self) -> &str {
        "err"
    }
}

/// Plain-text formatter that counts its invocations
pub struct CountingFormatter {
    pub calls: Arc<AtomicUsize>,
}

impl Formatter for CountingFormatter {
    fn format(&self, w: &mut dyn Write, session: &Session) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        writeln!(w, "{}", session.summary)?;
        Ok(())
    }

    fn extension(&self) -> &str {
        ".txt"
    }
}

pub fn sample_session(id: &str, summary: &str) -> Session {
    Session {
        id: id.to_string(),
        date: Utc.with_ymd_and_hms(2026, 2, 10, 14, 0, 0).unwrap(),
        summary: summary.to_string(),
        decisions: vec!["Chose JSONL over SQLite for simplicity".to_string()],
        knowledge: vec!["Append-only logs tolerate partial lines".to_string()],
        files_changed: vec!["crates/ao-storage/src/store.rs".to_string()],
        ..Default::default()
    }
}

/// Initialized store under `<dir>/.agents/ao`, without fsync
pub fn init_storage(dir: &Path) -> FileStorage {
    let storage = FileStorage::new(StorageConfig::under(dir).with_sync(false));
    storage.init().unwrap();
    storage
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
