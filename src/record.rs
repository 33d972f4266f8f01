/*!
 * Record construction
 *
 * Runs every classifier over a source path, in dependency order, and
 * composes the canonical path from the results.
 */

use tracing::trace;

use crate::classify::{
    extract_extension, extract_id, extract_type, get_category, get_seg_info, get_suffix,
    is_a_previous_version, is_localizer, is_other, is_tmp, SubjectTable,
};
use crate::compose::generate_new_path;
use crate::types::{FileRecord, Overrides};

/// Build the record of `path`, using any field set in `overrides` verbatim
///
/// A filename without a known subject gets `placeholder` as subject.
pub fn build_record_with_placeholder(
    path: &str,
    table: &SubjectTable,
    overrides: &Overrides,
    placeholder: &str,
) -> FileRecord {
    let id = overrides.id.clone().unwrap_or_else(|| extract_id(path));

    let sub = match &overrides.sub {
        Some(sub) => sub.clone(),
        None => match table.resolve(path) {
            Ok(sub) => sub.to_string(),
            Err(e) => {
                trace!(error = %e, placeholder, "using placeholder subject");
                placeholder.to_string()
            }
        },
    };

    let kind = overrides
        .kind
        .clone()
        .unwrap_or_else(|| extract_type(path).to_string());

    let extension = overrides
        .extension
        .clone()
        .unwrap_or_else(|| extract_extension(path).to_string());

    let category = overrides
        .category
        .clone()
        .unwrap_or_else(|| get_category(path));

    let seg_info = kind.contains("segmentation").then(|| {
        overrides
            .seg_info
            .clone()
            .unwrap_or_else(|| get_seg_info(path))
    });

    let suffix = overrides
        .suffix
        .clone()
        .unwrap_or_else(|| get_suffix(path, &kind));

    let mut record = FileRecord {
        old_path: path.to_string(),
        id,
        sub,
        kind,
        extension,
        category,
        seg_info,
        suffix,
        is_tmp: overrides.is_tmp.unwrap_or_else(|| is_tmp(path)),
        is_localizer: overrides.is_localizer.unwrap_or_else(|| is_localizer(path)),
        is_other: overrides.is_other.unwrap_or_else(|| is_other(path)),
        is_a_previous_version: overrides
            .is_a_previous_version
            .unwrap_or_else(|| is_a_previous_version(path)),
        new_path: String::new(),
    };
    record.new_path = generate_new_path(&record.path_parts());
    record
}

/// Build the record of `path` with the table's default placeholder subject
pub fn build_record(path: &str, table: &SubjectTable, overrides: &Overrides) -> FileRecord {
    build_record_with_placeholder(path, table, overrides, crate::classify::SUBJECT_PLACEHOLDER)
}
