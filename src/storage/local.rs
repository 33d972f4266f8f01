//! Local filesystem backend

use std::fs;
use std::path::{Path, PathBuf};

use glob_match::glob_match;
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::error::{StorageError, StorageResult};
use super::{ListOptions, StorageBackend};

/// Backend rooted at a local directory
///
/// Storage paths are `/`-separated and relative to `base`.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    base: PathBuf,
    exclude_patterns: Vec<String>,
}

impl LocalBackend {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Skip files whose name matches any of these glob patterns
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base.join(path.trim_start_matches('/'))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        self.exclude_patterns
            .iter()
            .any(|pattern| glob_match(pattern, &name))
    }

    /// Storage path of a file found under `base`
    fn storage_path(&self, path: &Path) -> StorageResult<String> {
        let relative = path
            .strip_prefix(&self.base)
            .map_err(|_| StorageError::OutsideRoot(path.display().to_string()))?;
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Ok(format!("/{}", joined))
    }
}

impl StorageBackend for LocalBackend {
    fn list_paths(&self, root: &str, options: ListOptions<'_>) -> StorageResult<Vec<String>> {
        let dir = self.resolve(root);
        if !dir.is_dir() {
            return Err(StorageError::NotFound(dir.display().to_string()));
        }

        let max_depth = if options.recursive { usize::MAX } else { 1 };
        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(max_depth).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() && options.recursive {
                continue;
            }
            if self.is_excluded(entry.path()) {
                trace!(path = %entry.path().display(), "excluded");
                continue;
            }
            let path = self.storage_path(entry.path())?;
            paths.push(options.listed_path(path, root));
        }

        debug!(root, count = paths.len(), "listed local files");
        Ok(paths)
    }

    fn copy(&self, from: &str, to: &str) -> StorageResult<()> {
        let source = self.resolve(from);
        let target = self.resolve(to);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &target)?;
        Ok(())
    }
}
