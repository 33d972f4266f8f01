//! File extension handling

/// Compound NIfTI extension, matched before plain dot-splitting
pub const NIFTI_GZ: &str = ".nii.gz";

/// Longest accepted extension in characters, dot excluded
const MAX_EXTENSION_LEN: usize = 9;

/// Returns the extension of `path`, dot included, or an empty string
///
/// `.nii.gz` is recognized as a whole. Otherwise the text after the last dot
/// is an extension only if the path has a dot at all, the text is shorter
/// than ten characters and it does not cross a directory separator.
pub fn extract_extension(path: &str) -> &str {
    if path.ends_with(NIFTI_GZ) {
        return &path[path.len() - NIFTI_GZ.len()..];
    }

    match path.rfind('.') {
        Some(dot) => {
            let ext = &path[dot + 1..];
            if ext.chars().count() <= MAX_EXTENSION_LEN && !ext.contains('/') {
                &path[dot..]
            } else {
                ""
            }
        }
        None => "",
    }
}

/// Returns `path` without its extension, unchanged if it has none
pub fn remove_extension(path: &str) -> &str {
    let ext = extract_extension(path);
    &path[..path.len() - ext.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("folder/file.nii.gz", ".nii.gz")]
    #[case("/a/b/scan.dcm", ".dcm")]
    #[case("/a/b/sim.smash", ".smash")]
    #[case("/a/b/meta.json", ".json")]
    #[case("/a/b/archive.gz", ".gz")]
    #[case("/a/b/README", "")]
    #[case("/a/b/file.averyverylongext", "")]
    #[case("/a/b/scan.ééééé", ".ééééé")]
    #[case("/a/b/scan.éééééééééé", "")]
    #[case("/a/v1.2/README", "")]
    #[case("trailing.", ".")]
    #[case("", "")]
    fn extracts_extension(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(extract_extension(path), expected);
    }

    #[test]
    fn removes_extension() {
        assert_eq!(remove_extension("folder/file.nii.gz"), "folder/file");
        assert_eq!(remove_extension("/a/b/README"), "/a/b/README");
        assert_eq!(remove_extension("x.json"), "x");
    }

    #[test]
    fn remove_and_extract_recompose_path() {
        let paths = [
            "/source/study/20230615093000_042_mri_t2_tse.nii.gz",
            "/a/v1.2/README",
            "no_dot",
            "a.b.c",
            ".hidden",
            "/dir/file.123456789",
            "/dir/file.1234567890",
        ];
        for path in paths {
            let rebuilt = format!("{}{}", remove_extension(path), extract_extension(path));
            assert_eq!(rebuilt, path);
        }
    }
}
