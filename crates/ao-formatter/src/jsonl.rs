//! JSON Lines session output

use ao_storage::{Formatter, Session};
use std::io::Write;

/// Writes each session as a single JSON object followed by a newline
///
/// Output is what `Storage::read_session` decodes.
#[derive(Debug, Clone, Default)]
pub struct JsonlFormatter {
    /// Indent the JSON. Indented output spans several lines and is no longer
    /// readable as JSONL.
    pub pretty: bool,
}

impl JsonlFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }
}

impl Formatter for JsonlFormatter {
    fn format(&self, w: &mut dyn Write, session: &Session) -> anyhow::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *w, session)?;
        } else {
            serde_json::to_writer(&mut *w, session)?;
        }
        w.write_all(b"\n")?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "jsonl"
    }
}
