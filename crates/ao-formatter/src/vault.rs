//! Obsidian vault detection

use std::path::{Path, PathBuf};

const OBSIDIAN_DIR: &str = ".obsidian";

/// Walk up from `start` to the first directory containing `.obsidian/`
pub fn detect_vault(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(OBSIDIAN_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Vault enclosing the current working directory
pub fn detect_vault_from_cwd() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    detect_vault(&cwd)
}

pub fn is_in_vault(dir: &Path) -> bool {
    detect_vault(dir).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_vault() {
        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("plain");
        std::fs::create_dir_all(&plain).unwrap();
        // Guard against a vault somewhere above the temp dir
        let above = detect_vault(temp.path());
        assert_eq!(detect_vault(&plain), above);
    }

    #[test]
    fn test_detects_from_root_and_nested() {
        let temp = TempDir::new().unwrap();
        let vault = temp.path().join("my-vault");
        std::fs::create_dir_all(vault.join(".obsidian")).unwrap();
        let nested = vault.join("notes/daily");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(detect_vault(&vault), Some(vault.clone()));
        assert_eq!(detect_vault(&nested), Some(vault.clone()));
        assert!(is_in_vault(&nested));
    }

    #[test]
    fn test_obsidian_file_is_not_a_vault() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("fake");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(".obsidian"), "not a dir").unwrap();

        assert_ne!(detect_vault(&dir), Some(dir.clone()));
    }
}
