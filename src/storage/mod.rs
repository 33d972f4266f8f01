/*!
 * Storage backends for listing and copying source files
 */

mod dropbox;
mod error;
mod local;

pub use dropbox::{collect_pages, listed_paths, DropboxBackend, Entry, ListFolderPage, DROPBOX_API, TOKEN_ENV};
pub use error::{StorageError, StorageResult};
pub use local::LocalBackend;

use tracing::{info, warn};

use crate::catalog::Catalog;

/// Directory under which source files live
pub const SOURCE_DIR: &str = "/source";

/// How to list a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions<'a> {
    /// Descend into subdirectories; flat listings include directories
    pub recursive: bool,
    /// Return paths relative to `source_dir` (recursive listings) or to the
    /// listing root (flat listings)
    pub strip_root: bool,
    /// Prefix removed from recursive listings, whatever directory was listed
    pub source_dir: &'a str,
}

impl Default for ListOptions<'_> {
    fn default() -> Self {
        Self {
            recursive: true,
            strip_root: true,
            source_dir: SOURCE_DIR,
        }
    }
}

impl ListOptions<'_> {
    /// Listed path as it should be returned
    ///
    /// Recursive listings keep every directory below `source_dir`, so listing
    /// a subdirectory yields the same paths as listing the whole source tree.
    pub fn listed_path(&self, path: String, root: &str) -> String {
        if !self.strip_root {
            return path;
        }
        let prefix = if self.recursive { self.source_dir } else { root };
        strip_root(&path, prefix)
    }
}

/// A place files can be listed from and copied within
pub trait StorageBackend {
    /// All file paths under `root`
    fn list_paths(&self, root: &str, options: ListOptions<'_>) -> StorageResult<Vec<String>>;

    /// Copy a single file, creating missing directories
    fn copy(&self, from: &str, to: &str) -> StorageResult<()>;
}

/// `path` relative to `root`, always starting with `/`
///
/// The prefix is compared ignoring ASCII case, as remote listings keep the
/// stored casing of folder names. A path outside `root` is returned as is.
pub fn strip_root(path: &str, root: &str) -> String {
    let root = root.trim_end_matches('/');
    let relative = match path.get(..root.len()) {
        Some(head)
            if head.eq_ignore_ascii_case(root)
                && (path.len() == root.len() || path[root.len()..].starts_with('/')) =>
        {
            &path[root.len()..]
        }
        _ => path,
    };
    if relative.starts_with('/') {
        relative.to_string()
    } else {
        format!("/{}", relative)
    }
}

/// Join a directory and a path with exactly one `/` between them
pub fn join_remote(dir: &str, path: &str) -> String {
    format!(
        "{}/{}",
        dir.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Outcome of a sort run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSummary {
    pub copied: usize,
    pub failed: Vec<(String, String)>,
}

/// Copy every record from `source_dir/old_path` to `target_dir/new_path`
///
/// Failed copies are collected rather than aborting the run. With `dry_run`
/// nothing is copied and every planned copy counts as done.
pub fn sort_source_to_target(
    catalog: &Catalog,
    backend: &dyn StorageBackend,
    source_dir: &str,
    target_dir: &str,
    dry_run: bool,
) -> SortSummary {
    let mut summary = SortSummary::default();

    for record in catalog.records() {
        let from = join_remote(source_dir, &record.old_path);
        let to = join_remote(target_dir, &record.new_path);

        if dry_run {
            info!(%from, %to, "would copy");
            summary.copied += 1;
            continue;
        }

        match backend.copy(&from, &to) {
            Ok(()) => {
                info!(%from, %to, "copied");
                summary.copied += 1;
            }
            Err(e) => {
                warn!(%from, %to, error = %e, "copy failed");
                summary.failed.push((record.old_path.clone(), e.to_string()));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::classify::SubjectTable;
    use crate::record::build_record;
    use crate::types::Overrides;

    #[derive(Default)]
    struct RecordingBackend {
        copies: RefCell<Vec<(String, String)>>,
    }

    impl StorageBackend for RecordingBackend {
        fn list_paths(&self, _root: &str, _options: ListOptions<'_>) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }

        fn copy(&self, from: &str, to: &str) -> StorageResult<()> {
            if from.contains("missing") {
                return Err(StorageError::NotFound(from.to_string()));
            }
            self.copies
                .borrow_mut()
                .push((from.to_string(), to.to_string()));
            Ok(())
        }
    }

    fn catalog() -> Catalog {
        let table = SubjectTable::new([("P01", "sub-01")]);
        ["/study/P01_mri_20230101000000_1.nii", "/missing/P01_mri.nii"]
            .into_iter()
            .map(|p| build_record(p, &table, &Overrides::default()))
            .collect()
    }

    #[test]
    fn root_stripping_and_joining() {
        assert_eq!(strip_root("/source/a/b.nii", "/source"), "/a/b.nii");
        assert_eq!(strip_root("/source/a/b.nii", "/source/"), "/a/b.nii");
        assert_eq!(strip_root("/other/b.nii", "/source"), "/other/b.nii");
        assert_eq!(strip_root("/Source/a/b.nii", "/source"), "/a/b.nii");
        assert_eq!(strip_root("/sources/b.nii", "/source"), "/sources/b.nii");
        assert_eq!(strip_root("/a/b.nii", "/"), "/a/b.nii");
        assert_eq!(join_remote("/source/", "/a.nii"), "/source/a.nii");
        assert_eq!(join_remote("/target", "sub-01/a.nii"), "/target/sub-01/a.nii");
    }

    #[test]
    fn recursive_listings_keep_directories_below_source() {
        let options = ListOptions::default();
        assert_eq!(
            options.listed_path("/source/study/tissues/a.nii".to_string(), "/source/study/tissues"),
            "/study/tissues/a.nii"
        );

        let flat = ListOptions {
            recursive: false,
            ..options
        };
        assert_eq!(
            flat.listed_path("/source/study/tissues/a.nii".to_string(), "/source/study/"),
            "/tissues/a.nii"
        );

        let kept = ListOptions {
            strip_root: false,
            ..options
        };
        assert_eq!(
            kept.listed_path("/source/a.nii".to_string(), "/source"),
            "/source/a.nii"
        );
    }

    #[test]
    fn sort_copies_every_record() {
        let backend = RecordingBackend::default();
        let summary = sort_source_to_target(&catalog(), &backend, "/source", "/target/", false);

        assert_eq!(summary.copied, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "/missing/P01_mri.nii");
        assert_eq!(
            backend.copies.borrow().as_slice(),
            [(
                "/source/study/P01_mri_20230101000000_1.nii".to_string(),
                "/target/sub-01/anat/sub-01_id-1.nii".to_string()
            )]
        );
    }

    #[test]
    fn dry_run_copies_nothing() {
        let backend = RecordingBackend::default();
        let summary = sort_source_to_target(&catalog(), &backend, "/source", "/target", true);
        assert_eq!(summary.copied, 2);
        assert!(backend.copies.borrow().is_empty());
    }
}
