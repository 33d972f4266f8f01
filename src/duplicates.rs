/*!
 * Records whose canonical paths collide
 */

use std::collections::{BTreeMap, HashMap};

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::classify::{extract_extension, remove_extension};
use crate::error::{BidsortError, Result};

/// Colliding records, keyed by the first member of each group
///
/// Each group lists every member, its key included, in catalog order.
pub type DuplicateGroups = BTreeMap<String, Vec<String>>;

/// Group records sharing the same `new_path`
///
/// Only groups with more than one member are returned.
pub fn flag_potential_duplicates(catalog: &Catalog) -> DuplicateGroups {
    let mut by_new_path: HashMap<&str, Vec<String>> = HashMap::new();
    for (old_path, record) in catalog {
        by_new_path
            .entry(record.new_path.as_str())
            .or_default()
            .push(old_path.clone());
    }

    let groups: DuplicateGroups = by_new_path
        .into_values()
        .filter(|members| members.len() > 1)
        .map(|members| (members[0].clone(), members))
        .collect();

    if !groups.is_empty() {
        warn!(
            groups = groups.len(),
            files = groups.values().map(Vec::len).sum::<usize>(),
            "records share a new path"
        );
    }
    groups
}

/// Path with a `_duplicate-<n>` marker before its extension
pub fn duplicate_path(new_path: &str, index: usize) -> String {
    format!(
        "{}_duplicate-{}{}",
        remove_extension(new_path),
        index,
        extract_extension(new_path)
    )
}

/// Disambiguate every flagged group by numbering its members
pub fn rename_duplicates(catalog: &Catalog, groups: &DuplicateGroups) -> Result<Catalog> {
    let mut renamed = catalog.clone();
    let mut count = 0;

    for members in groups.values() {
        for (index, old_path) in members.iter().enumerate() {
            let record = renamed
                .get_mut(old_path)
                .ok_or_else(|| BidsortError::RecordNotFound(old_path.clone()))?;
            record.new_path = duplicate_path(&record.new_path, index);
            count += 1;
        }
    }

    info!(groups = groups.len(), renamed = count, "renamed duplicates");
    Ok(renamed)
}
