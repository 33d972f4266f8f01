//! Acquisition sequence suffixes

use super::rules::RuleTable;
use super::{filename, remove_extension, stem_lowercase};

/// Sequence names, longer names before the names they contain
pub const SEQUENCE_SUFFIXES: RuleTable = RuleTable(&[
    "t2_space",
    "t2_tse",
    "t2_trufi3d",
    "t2_gre",
    "t1_tfe",
    "b_ffe",
    "t2_3d_tra_vista",
    "t2w_ffe",
    "ffe",
]);

/// Suffix of the T2 SPACE zoomed-FOV sequence, whose keywords can appear in
/// any order
pub const T2_SPC_ZOOMIT: &str = "t2_spc_zoomit";

/// Acquisition sequence suffix of `path` given its modality type `kind`
pub fn get_suffix(path: &str, kind: &str) -> String {
    let stem = stem_lowercase(path);

    if kind.contains("ct") {
        return "ct".to_string();
    }

    // Functional tags are matched with the filename's own casing
    if kind.contains("func") {
        let raw_stem = remove_extension(filename(path));
        let tag = if raw_stem.contains("physiolog") {
            "physiolog"
        } else if raw_stem.contains("interoperability") {
            "interoperability"
        } else {
            "bold"
        };
        return tag.to_string();
    }

    let has = |word: &str| stem.split('_').any(|k| k == word);
    if has("t2") && has("spc") && has("zoomit") {
        return T2_SPC_ZOOMIT.to_string();
    }

    SEQUENCE_SUFFIXES
        .first_match(&stem)
        .unwrap_or_default()
        .to_string()
}
