/*!
 * Canonical path construction
 */

use crate::classify::is_derivative;

/// Prefix under which temporary files are quarantined, original path kept
pub const QUARANTINE_PREFIX: &str = "_tmp";

/// Top-level directory of derived data
pub const DERIVATIVES_DIR: &str = "derivatives";

const SEGMENTATION: &str = "segmentation";
const LOCALIZER_DIR: &str = "_localizer/";
const OTHER_DIR: &str = "_other/";
const PREVIOUS_VERSION_DIR: &str = "_previous_version/";

/// Every field the canonical path depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewPathParts<'a> {
    pub old_path: &'a str,
    pub id: &'a str,
    pub sub: &'a str,
    pub kind: &'a str,
    pub extension: &'a str,
    pub category: &'a str,
    pub seg_info: &'a str,
    pub suffix: &'a str,
    pub is_tmp: bool,
    pub is_localizer: bool,
    pub is_other: bool,
    pub is_a_previous_version: bool,
}

/// Build the canonical target path
///
/// Temporary files go to [`QUARANTINE_PREFIX`] followed by their original
/// path. Otherwise the path is
/// `<type dirs>/<marker dir>/<sub>_<category>_id-<id>_<seg_info>_<suffix><ext>`
/// where empty members of the filename are dropped along with their `_`.
pub fn generate_new_path(parts: &NewPathParts<'_>) -> String {
    if parts.is_tmp {
        return format!("{}{}", QUARANTINE_PREFIX, parts.old_path);
    }

    let mut path = type_dirs(parts.kind, parts.sub);

    if parts.is_localizer {
        path.push_str(LOCALIZER_DIR);
    } else if parts.is_other {
        path.push_str(OTHER_DIR);
    } else if parts.is_a_previous_version {
        path.push_str(PREVIOUS_VERSION_DIR);
    }

    path.push_str(&filename_stem(parts));
    path.push_str(parts.extension);
    path
}

fn type_dirs(kind: &str, sub: &str) -> String {
    if !is_derivative(kind) {
        return format!("{sub}/{kind}/");
    }

    if kind.contains(SEGMENTATION) {
        format!(
            "{DERIVATIVES_DIR}/{SEGMENTATION}/{sub}/{}/",
            segmented_modality(kind)
        )
    } else {
        format!("{DERIVATIVES_DIR}/{kind}/{sub}/")
    }
}

/// `anat_segmentation` -> `anat`
fn segmented_modality(kind: &str) -> &str {
    kind.strip_suffix("_segmentation")
        .or_else(|| kind.split('_').next())
        .unwrap_or(kind)
}

fn filename_stem(parts: &NewPathParts<'_>) -> String {
    let id = if parts.id.is_empty() {
        String::new()
    } else {
        format!("id-{}", parts.id)
    };

    [
        parts.sub,
        parts.category,
        id.as_str(),
        parts.seg_info,
        parts.suffix,
    ]
    .into_iter()
    .filter(|member| !member.is_empty())
    .collect::<Vec<_>>()
    .join("_")
}
