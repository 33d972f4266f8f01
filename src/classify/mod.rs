/*!
 * Filename classification
 *
 * Heuristic parsers that read a raw `/`-separated path and derive the
 * metadata used to build its canonical location. Every classifier is a pure
 * function of the path string.
 */

mod category;
mod date;
mod extension;
mod identifier;
mod modality;
mod predicates;
mod rules;
mod segmentation;
mod subject;
mod suffix;

pub use category::{get_category, DIR_CATEGORIES, FILENAME_CATEGORIES, LOCALIZER_CATEGORY};
pub use date::is_date;
pub use extension::{extract_extension, remove_extension, NIFTI_GZ};
pub use identifier::extract_id;
pub use modality::{
    extract_type, is_derivative, Modality, DERIVATIVE_ONLY_TYPES, SIMULATION_EXTENSION,
};
pub use predicates::{is_a_previous_version, is_localizer, is_other, is_tmp};
pub use rules::RuleTable;
pub use segmentation::{get_seg_info, DIR_SEG_INFO, FILENAME_SEG_INFO};
pub use subject::{extract_sub, SubjectTable, SUBJECT_PLACEHOLDER};
pub use suffix::{get_suffix, SEQUENCE_SUFFIXES, T2_SPC_ZOOMIT};

/// Last segment of `path`
pub(crate) fn filename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory segments of `path`, outermost first
pub(crate) fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.rsplit_once('/')
        .map(|(dirs, _)| dirs.split('/'))
        .into_iter()
        .flatten()
}

/// Name of the directory directly containing `path`
pub(crate) fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit('/').nth(1)
}

/// Lower-cased ancestor directories joined back with `/`
pub(crate) fn dir_haystack(path: &str) -> String {
    ancestors(path)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("/")
}

/// Lower-cased filename without its extension
pub(crate) fn stem_lowercase(path: &str) -> String {
    remove_extension(filename(path)).to_lowercase()
}
