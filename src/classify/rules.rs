//! Ordered substring rule tables
//!
//! Tables are scanned in order and the first entry contained in the haystack
//! wins. Entries that contain other entries must come first.

/// An ordered list of substrings, each doubling as the tag it produces
#[derive(Debug, Clone, Copy)]
pub struct RuleTable(pub &'static [&'static str]);

impl RuleTable {
    /// First entry of the table found in `haystack`
    pub fn first_match(&self, haystack: &str) -> Option<&'static str> {
        self.0.iter().copied().find(|rule| haystack.contains(rule))
    }

    pub fn rules(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Match one table against the directories and one against the filename
///
/// At most one tag comes from each; they are joined with `_`.
pub fn match_dirs_and_filename(
    dirs_table: RuleTable,
    filename_table: RuleTable,
    dirs: &str,
    filename: &str,
) -> String {
    [
        dirs_table.first_match(dirs),
        filename_table.first_match(filename),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("_")
}

/// Checks that no entry is shadowed by an earlier entry it contains
#[cfg(test)]
pub(crate) fn assert_superstrings_first(table: RuleTable) {
    let rules = table.rules();
    for (i, later) in rules.iter().enumerate() {
        for earlier in &rules[..i] {
            assert!(
                !later.contains(earlier),
                "{later:?} can never match, {earlier:?} comes first"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: RuleTable = RuleTable(&["abc_def", "abc", "xyz"]);

    #[test]
    fn first_entry_wins() {
        assert_eq!(TABLE.first_match("__abc_def__xyz"), Some("abc_def"));
        assert_eq!(TABLE.first_match("abc_xyz"), Some("abc"));
        assert_eq!(TABLE.first_match("nothing"), None);
    }

    #[test]
    fn joins_dir_and_filename_tags() {
        let files = RuleTable(&["xyz"]);
        assert_eq!(match_dirs_and_filename(TABLE, files, "/abc", "f_xyz"), "abc_xyz");
        assert_eq!(match_dirs_and_filename(TABLE, files, "/abc", "f"), "abc");
        assert_eq!(match_dirs_and_filename(TABLE, files, "/q", "f_xyz"), "xyz");
        assert_eq!(match_dirs_and_filename(TABLE, files, "/q", "f"), "");
    }

    #[test]
    fn table_order_is_checked() {
        assert_superstrings_first(TABLE);
    }
}
