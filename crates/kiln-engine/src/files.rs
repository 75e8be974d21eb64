//! File-loading collaborator.
//!
//! Shaders and config files are read through [`FileLoader`] so that hosts can
//! redirect them (embedded assets, tests) without touching the engine.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::config::Config;
use crate::error::{ConfigError, FileError};

pub trait FileLoader: Send + Sync + fmt::Debug {
    fn load_text_file(&self, path: &Path) -> Result<String, FileError>;

    /// Reads and parses a config file.
    ///
    /// A missing file is reported as [`ConfigError::NotFound`], malformed
    /// contents as [`ConfigError::Parse`].
    fn load_config(&self, path: &Path) -> Result<Config, ConfigError> {
        let text = self.load_text_file(path)?;
        Config::from_toml_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Reads from the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileLoader;

impl FileLoader for FsFileLoader {
    fn load_text_file(&self, path: &Path) -> Result<String, FileError> {
        log::trace!(target: "kiln::files", "loading {}", path.display());
        std::fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => FileError::NotFound {
                path: path.to_path_buf(),
            },
            _ => FileError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }
}

/// In-memory file table.
///
/// Contents can be replaced while the loader is shared, which is how tests
/// simulate editing a shader on disk between reloads.
#[derive(Debug, Default)]
pub struct MemoryFileLoader {
    files: RwLock<HashMap<PathBuf, String>>,
}

impl MemoryFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path.as_ref());
    }
}

impl FileLoader for MemoryFileLoader {
    fn load_text_file(&self, path: &Path) -> Result<String, FileError> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| FileError::NotFound {
                path: path.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_loader_serves_and_replaces() {
        let files = MemoryFileLoader::new().with_file("a.txt", "one");
        assert_eq!(files.load_text_file(Path::new("a.txt")).unwrap(), "one");

        files.insert("a.txt", "two");
        assert_eq!(files.load_text_file(Path::new("a.txt")).unwrap(), "two");

        files.remove("a.txt");
        assert!(matches!(
            files.load_text_file(Path::new("a.txt")),
            Err(FileError::NotFound { .. })
        ));
    }

    #[test]
    fn config_errors_are_classified() {
        let files = MemoryFileLoader::new().with_file("bad.toml", "[window");

        assert!(matches!(
            files.load_config(Path::new("missing.toml")),
            Err(ConfigError::NotFound { .. })
        ));
        assert!(matches!(
            files.load_config(Path::new("bad.toml")),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn fs_loader_reports_missing_files() {
        let err = FsFileLoader
            .load_text_file(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(matches!(err, FileError::NotFound { .. }));
        assert_eq!(err.path(), Path::new("/definitely/not/here.txt"));
    }
}
