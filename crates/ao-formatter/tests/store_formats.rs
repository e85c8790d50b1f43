use ao_formatter::{JsonlFormatter, MarkdownFormatter};
use ao_storage::{FileStorage, IndexEntry, Session, Storage, StorageConfig, TokenUsage};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use tempfile::TempDir;

fn forged_session() -> Session {
    Session {
        id: "7f3a9c2e-5b1d-4c8e".to_string(),
        date: Utc.with_ymd_and_hms(2026, 9, 30, 17, 45, 0).unwrap(),
        summary: "Ship the provenance ledger".to_string(),
        decisions: vec!["Skip malformed ledger lines".to_string()],
        knowledge: vec!["Renames within one directory are atomic".to_string()],
        files_changed: vec!["crates/ao-storage/src/io.rs".to_string()],
        issues: vec!["ao-9".to_string()],
        tool_calls: BTreeMap::from([("Write".to_string(), 3)]),
        tokens: TokenUsage {
            input: 40_000,
            output: 6_000,
            total: 46_000,
            estimated: true,
        },
        transcript_path: "/home/dev/.claude/projects/x/7f3a9c2e.jsonl".to_string(),
    }
}

fn storage(temp: &TempDir) -> FileStorage {
    let storage = FileStorage::new(StorageConfig::under(temp.path()).with_sync(false));
    storage.init().unwrap();
    storage
}

#[test]
fn test_markdown_primary_with_jsonl_sidecar() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp)
        .with_formatter(MarkdownFormatter::plain())
        .with_formatter(JsonlFormatter::new());

    let session = forged_session();
    let primary = storage.write_session(&session).unwrap().unwrap();
    assert_eq!(primary.extension().unwrap(), "md");

    let sidecar = primary.with_extension("jsonl");
    assert!(sidecar.exists());

    let note = std::fs::read_to_string(&primary).unwrap();
    assert!(note.contains("# Ship the provenance ledger"));
    assert!(note.contains("~46000 (estimated)"));

    // The markdown note is what gets indexed, and it cannot be read back
    storage
        .write_index(&IndexEntry::for_session(&session, &primary))
        .unwrap();
    let err = storage.read_session(&session.id).unwrap_err();
    assert!(err.to_string().contains("unsupported format"));
}

#[test]
fn test_jsonl_primary_reads_back() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp)
        .with_formatter(JsonlFormatter::new())
        .with_formatter(MarkdownFormatter::for_vault(temp.path()));

    let session = forged_session();
    let primary = storage.write_session(&session).unwrap().unwrap();
    storage
        .write_index(&IndexEntry::for_session(&session, &primary))
        .unwrap();

    let read = storage.read_session(&session.id).unwrap();
    assert_eq!(read, session);

    let note = std::fs::read_to_string(primary.with_extension("md")).unwrap();
    assert!(note.contains("[[issues/ao-9|ao-9]]"));
}
