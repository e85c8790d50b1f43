//! JSONL I/O and atomic file operations

use crate::error::{Result, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::ops::ControlFlow;
use std::path::Path;

/// Write a file atomically using a temp file + rename in the same directory
///
/// The target either ends up with everything `write_fn` produced or is left
/// untouched. On any failure the temp file is removed.
pub fn atomic_write<F>(path: &Path, sync: bool, write_fn: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> anyhow::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| StorageError::io("create directory", dir, e))?;

    // Dropping `tmp` before persist deletes it
    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(dir)
        .map_err(|e| StorageError::io("create temp file in", dir, e))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_fn(&mut writer).map_err(|e| StorageError::write_content(path, e))?;
        writer
            .flush()
            .map_err(|e| StorageError::write_content(path, e))?;
    }

    if sync {
        tmp.as_file()
            .sync_all()
            .map_err(|e| StorageError::io("sync", tmp.path(), e))?;
    }

    tmp.persist(path)
        .map_err(|e| StorageError::io("rename temp file to", path, e.error))?;
    Ok(())
}

/// Append a JSON record to a JSONL file
pub fn append_jsonl<T: Serialize>(path: &Path, record: &T, sync: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StorageError::io("create directory", parent, e))?;
    }

    let mut line = serde_json::to_vec(record).map_err(|source| StorageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    line.push(b'\n');

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| StorageError::io("open", path, e))?;

    // Terminate a torn last line so it does not swallow this record
    if !ends_with_newline(&mut file).map_err(|e| StorageError::io("read", path, e))? {
        tracing::debug!(path = %path.display(), "terminating unfinished JSONL line");
        line.insert(0, b'\n');
    }

    // One write per record so a line is never interleaved
    file.write_all(&line)
        .map_err(|e| StorageError::io("append to", path, e))?;
    if sync {
        file.sync_data()
            .map_err(|e| StorageError::io("sync", path, e))?;
    }
    Ok(())
}

/// True for an empty file or one whose last byte is `\n`
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Visit each well-formed record of a JSONL file in order
///
/// Malformed and blank lines are skipped. Returns `Ok(false)` when the file
/// does not exist; any other I/O error is returned.
pub fn scan_jsonl<T, F>(path: &Path, mut visit: F) -> Result<bool>
where
    T: DeserializeOwned,
    F: FnMut(T) -> ControlFlow<()>,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(StorageError::io("open", path, e)),
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_number = 0usize;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| StorageError::io("read", path, e))?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_slice::<T>(line) {
            Ok(record) => {
                if visit(record).is_break() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), line = line_number, error = %e, "skipping malformed JSONL line");
            }
        }
    }

    Ok(true)
}

/// Read all well-formed records from a JSONL file
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut records = Vec::new();
    scan_jsonl(path, |record| {
        records.push(record);
        ControlFlow::Continue(())
    })?;
    Ok(records)
}
