//! Storage configuration

use std::path::{Path, PathBuf};

/// Default storage directory, relative to the project root
pub const DEFAULT_BASE_DIR: &str = ".agents/ao";

/// Configuration passed to [`crate::FileStorage::new`]
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root of the managed tree (sessions/, index/, provenance/)
    pub base_dir: PathBuf,

    /// fsync session files and appended lines before returning
    pub sync: bool,
}

impl StorageConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            sync: true,
        }
    }

    /// Default layout under a project root
    pub fn under(project_root: &Path) -> Self {
        Self::new(project_root.join(DEFAULT_BASE_DIR))
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.base_dir, PathBuf::from(".agents/ao"));
        assert!(config.sync);
    }

    #[test]
    fn test_config_under_root() {
        let config = StorageConfig::under(Path::new("/work/project")).with_sync(false);
        assert_eq!(config.base_dir, PathBuf::from("/work/project/.agents/ao"));
        assert!(!config.sync);
    }
}
