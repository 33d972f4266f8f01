//! Path-structure flags
//!
//! All predicates look at `/`-separated segments and return false when the
//! path is too short to have the segment they inspect.

use super::{ancestors, parent_dir};

/// True if the parent directory name contains `localizer`
pub fn is_localizer(path: &str) -> bool {
    parent_dir(path).is_some_and(|dir| dir.to_lowercase().contains("localizer"))
}

/// True if the parent directory name contains `other`
///
/// `localizer_other` directories are localizers, not others.
pub fn is_other(path: &str) -> bool {
    parent_dir(path).is_some_and(|dir| {
        let dir = dir.to_lowercase();
        dir.contains("other") && !dir.contains("localizer_other")
    })
}

/// True if any ancestor directory name contains `previous_version`
pub fn is_a_previous_version(path: &str) -> bool {
    ancestors(path).any(|dir| dir.to_lowercase().contains("previous_version"))
}

/// True if `tmp` appears anywhere in the path, in any case
pub fn is_tmp(path: &str) -> bool {
    path.to_lowercase().contains("tmp")
}
