//! Segmentation target tags

use super::rules::{match_dirs_and_filename, RuleTable};
use super::{dir_haystack, stem_lowercase};

/// Matched against the joined ancestor directories
pub const DIR_SEG_INFO: RuleTable = RuleTable(&["segmentator_tissues"]);

/// Matched against the filename: pipeline stages, spinal levels, structures
pub const FILENAME_SEG_INFO: RuleTable = RuleTable(&[
    "step1_canal",
    "step1_cord",
    "step1_levels",
    "step1_output",
    "step2_output",
    "l2",
    "l3",
    "l4",
    "l5",
    "more_caudal",
    "more_rostral",
    "s1",
    "s2",
    "s3",
    "s4",
    "aorta",
    "autochthon_left",
    "autochthon_right",
    "colon",
    "gluteus_maximus_left",
    "hip_right",
    "iliac_vena_left",
    "iliac_vena_right",
    "iliopsoas_left",
    "iliopsoas_right",
    "inferior_vena_cava",
    "intervertebral_discs",
    "lung_right",
    "portal_vein_and_splenic_vein",
    "sacrum",
    "small_bowel",
    "spinal_cord",
    "stomach",
    "vertebrae",
]);

/// Segmentation target tag of `path`, or an empty string
///
/// Only meaningful for segmentation types; the record builder does not call
/// it otherwise.
pub fn get_seg_info(path: &str) -> String {
    match_dirs_and_filename(
        DIR_SEG_INFO,
        FILENAME_SEG_INFO,
        &dir_haystack(path),
        &stem_lowercase(path),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::rules::assert_superstrings_first;

    #[test]
    fn structure_from_filename() {
        assert_eq!(get_seg_info("/seg/P01_mri_seg_Spinal_Cord.nii.gz"), "spinal_cord");
        assert_eq!(get_seg_info("/seg/P01_mri_seg_aorta.nii.gz"), "aorta");
    }

    #[test]
    fn pipeline_stage_precedes_levels() {
        assert_eq!(get_seg_info("/seg/P01_step1_levels_l3.nii.gz"), "step1_levels");
    }

    #[test]
    fn directory_tag_comes_first() {
        assert_eq!(
            get_seg_info("/study/segmentator_tissues/P01_mri_seg_stomach.nii.gz"),
            "segmentator_tissues_stomach"
        );
        assert_eq!(
            get_seg_info("/study/segmentator_tissues/P01_mri_seg.nii.gz"),
            "segmentator_tissues"
        );
    }

    #[test]
    fn extension_is_not_searched() {
        assert_eq!(get_seg_info("/seg/P01_mri_seg.s1"), "");
    }

    #[test]
    fn tables_are_ordered() {
        assert_superstrings_first(DIR_SEG_INFO);
        assert_superstrings_first(FILENAME_SEG_INFO);
    }
}
