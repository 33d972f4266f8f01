//! Secondary category tags

use super::predicates::is_localizer;
use super::rules::{match_dirs_and_filename, RuleTable};
use super::{dir_haystack, stem_lowercase};

/// Category of files in localizer directories
pub const LOCALIZER_CATEGORY: &str = "localizer";

/// Matched against the joined ancestor directories
pub const DIR_CATEGORIES: RuleTable = RuleTable(&[
    "ssl_tissues_post_pro_step_02",
    "ssl_tissues_post_pro_step_01",
    "ssl_tissues",
    "deepseg",
    "for_making_levels",
    "lumbar",
    "ax_lspine",
    "ax_obl_sacrum",
    "bladder",
    "individual_spinal_levels",
]);

/// Matched against the filename
pub const FILENAME_CATEGORIES: RuleTable = RuleTable(&["total_spineseg"]);

/// Category tag of `path`, or an empty string
pub fn get_category(path: &str) -> String {
    if is_localizer(path) {
        return LOCALIZER_CATEGORY.to_string();
    }

    match_dirs_and_filename(
        DIR_CATEGORIES,
        FILENAME_CATEGORIES,
        &dir_haystack(path),
        &stem_lowercase(path),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::rules::assert_superstrings_first;

    #[test]
    fn localizer_short_circuits() {
        assert_eq!(get_category("/deepseg/localizer/P01_total_spineseg.nii"), "localizer");
    }

    #[test]
    fn pipeline_step_precedes_prefix() {
        assert_eq!(
            get_category("/study/ssl_tissues_post_pro_step_01/P01_mri_seg.nii.gz"),
            "ssl_tissues_post_pro_step_01"
        );
        assert_eq!(get_category("/study/SSL_Tissues/P01_mri_seg.nii.gz"), "ssl_tissues");
    }

    #[test]
    fn every_ancestor_is_searched() {
        assert_eq!(get_category("/lumbar/run_1/P01_mri.nii"), "lumbar");
    }

    #[test]
    fn dir_and_filename_tags_are_joined() {
        assert_eq!(
            get_category("/study/deepseg/P01_Total_SpineSeg_1.nii.gz"),
            "deepseg_total_spineseg"
        );
        assert_eq!(get_category("/study/P01_total_spineseg.nii.gz"), "total_spineseg");
    }

    #[test]
    fn no_category() {
        assert_eq!(get_category("/study/P01_mri.nii"), "");
        assert_eq!(get_category("P01_mri.nii"), "");
    }

    #[test]
    fn tables_are_ordered() {
        assert_superstrings_first(DIR_CATEGORIES);
        assert_superstrings_first(FILENAME_CATEGORIES);
    }
}
