//! Output formatters for ao sessions

mod jsonl;
mod markdown;
mod vault;

pub use jsonl::JsonlFormatter;
pub use markdown::MarkdownFormatter;
pub use vault::{detect_vault, detect_vault_from_cwd, is_in_vault};
