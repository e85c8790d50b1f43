//! Output format extension point

use crate::types::Session;
use std::io::Write;

/// Renders a session into one output format
///
/// Formatters hold no per-write state; the store calls `format` once per
/// session write with a writer backed by a temp file.
pub trait Formatter: Send + Sync {
    /// Write `session` to `w`
    fn format(&self, w: &mut dyn Write, session: &Session) -> anyhow::Result<()>;

    /// File extension without the leading dot (e.g. `jsonl`)
    fn extension(&self) -> &str;
}
