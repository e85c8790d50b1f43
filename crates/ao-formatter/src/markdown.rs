//! Obsidian-compatible markdown session notes

use crate::vault::detect_vault_from_cwd;
use ao_storage::{Formatter, Session};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Tags every session note carries, before the `YYYY-MM` tag
const BASE_TAGS: [&str; 2] = ["ao", "session"];

/// Renders a session as a markdown note with YAML frontmatter
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    /// Enclosing Obsidian vault, if any
    pub vault_path: Option<PathBuf>,

    /// Use `[[wiki-links]]` for files and issues
    pub use_wiki_links: bool,
}

impl MarkdownFormatter {
    /// Formatter configured for the vault around the current directory
    pub fn new() -> Self {
        let vault_path = detect_vault_from_cwd();
        if let Some(vault) = &vault_path {
            tracing::debug!(vault = %vault.display(), "obsidian vault detected, using wiki links");
        }
        Self {
            use_wiki_links: vault_path.is_some(),
            vault_path,
        }
    }

    /// Plain markdown links, no vault lookup
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn for_vault(vault: impl AsRef<Path>) -> Self {
        Self {
            vault_path: Some(vault.as_ref().to_path_buf()),
            use_wiki_links: true,
        }
    }

    fn file_link(&self, path: &str) -> String {
        if self.use_wiki_links {
            format!("[[{}]]", path)
        } else {
            format!("`{}`", path)
        }
    }

    fn issue_link(&self, issue_id: &str) -> String {
        if self.use_wiki_links {
            format!("[[issues/{}|{}]]", issue_id, issue_id)
        } else {
            format!("`{}`", issue_id)
        }
    }

    fn tags(session: &Session) -> Vec<String> {
        let mut tags: Vec<String> = BASE_TAGS.iter().map(|t| t.to_string()).collect();
        tags.push(session.date.format("%Y-%m").to_string());
        tags
    }

    fn write_frontmatter(&self, w: &mut dyn Write, session: &Session) -> std::io::Result<()> {
        writeln!(w, "---")?;
        writeln!(w, "session_id: {}", session.id)?;
        writeln!(w, "date: {}", session.date.format("%Y-%m-%d"))?;
        writeln!(w, "summary: \"{}\"", yaml_escape(&session.summary))?;
        writeln!(w, "tags:")?;
        for tag in Self::tags(session) {
            writeln!(w, "  - {}", tag)?;
        }
        writeln!(w, "---")
    }
}

impl Formatter for MarkdownFormatter {
    fn format(&self, w: &mut dyn Write, session: &Session) -> anyhow::Result<()> {
        self.write_frontmatter(w, session)?;

        writeln!(w)?;
        writeln!(w, "# {}", session.summary)?;
        writeln!(w)?;
        writeln!(w, "**Session:** {}", session.id)?;
        writeln!(w, "**Date:** {}", session.date.format("%Y-%m-%d"))?;

        write_list(w, "Decisions", session.decisions.iter().cloned())?;
        write_list(w, "Knowledge", session.knowledge.iter().cloned())?;
        write_list(
            w,
            "Files Changed",
            session.files_changed.iter().map(|f| self.file_link(f)),
        )?;
        write_list(
            w,
            "Issues",
            session.issues.iter().map(|i| self.issue_link(i)),
        )?;

        if !session.tool_calls.is_empty() {
            writeln!(w)?;
            writeln!(w, "## Tool Usage")?;
            writeln!(w)?;
            writeln!(w, "| Tool | Count |")?;
            writeln!(w, "|------|-------|")?;
            for (tool, count) in &session.tool_calls {
                writeln!(w, "| {} | {} |", tool, count)?;
            }
        }

        let tokens = &session.tokens;
        if tokens.total > 0 {
            writeln!(w)?;
            writeln!(w, "## Tokens")?;
            writeln!(w)?;
            writeln!(w, "- **Input:** {}", tokens.input)?;
            writeln!(w, "- **Output:** {}", tokens.output)?;
            if tokens.estimated {
                writeln!(w, "- **Total:** ~{} (estimated)", tokens.total)?;
            } else {
                writeln!(w, "- **Total:** {}", tokens.total)?;
            }
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        "md"
    }
}

/// `## heading` followed by a bullet list; nothing when `items` is empty
fn write_list(
    w: &mut dyn Write,
    heading: &str,
    items: impl Iterator<Item = String>,
) -> std::io::Result<()> {
    let mut items = items.peekable();
    if items.peek().is_none() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "## {}", heading)?;
    writeln!(w)?;
    for item in items {
        writeln!(w, "- {}", item)?;
    }
    Ok(())
}

fn yaml_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\n', '\r'], " ")
}
