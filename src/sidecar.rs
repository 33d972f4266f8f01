/*!
 * JSON metadata sidecars
 *
 * Sidecars carry no classifiable keywords of their own; they take the
 * metadata of the data file they describe.
 */

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::classify::remove_extension;
use crate::error::{BidsortError, Result};

/// Extension of metadata sidecars
pub const SIDECAR_EXTENSION: &str = ".json";

/// Data files matching each sidecar, keyed by the sidecar's old path
pub type SidecarMatches = BTreeMap<String, Vec<String>>;

/// Find the data files each sidecar describes
///
/// A data file matches when its filename contains the sidecar's filename
/// without `.json`.
pub fn match_sidecars(catalog: &Catalog) -> SidecarMatches {
    let (sidecars, data): (Vec<_>, Vec<_>) = catalog
        .records()
        .partition(|record| record.extension == SIDECAR_EXTENSION);

    sidecars
        .into_iter()
        .map(|sidecar| {
            let stem = sidecar
                .old_filename()
                .strip_suffix(SIDECAR_EXTENSION)
                .unwrap_or(sidecar.old_filename());
            let matches: Vec<String> = data
                .iter()
                .filter(|record| record.old_filename().contains(stem))
                .map(|record| record.old_path.clone())
                .collect();
            debug!(sidecar = %sidecar.old_path, matches = matches.len(), "matched sidecar");
            (sidecar.old_path.clone(), matches)
        })
        .collect()
}

/// Give each sidecar with exactly one match the metadata of that match
///
/// The sidecar keeps its own `old_path`; its `new_path` is the data file's
/// with a `.json` extension. More than one match is an error.
pub fn correct_with_matching_metadata(
    catalog: &Catalog,
    matches: &SidecarMatches,
) -> Result<Catalog> {
    let mut corrected = catalog.clone();
    let mut count = 0;

    for (sidecar_path, data_paths) in matches {
        let data_path = match data_paths.as_slice() {
            [] => continue,
            [single] => single,
            _ => {
                return Err(BidsortError::AmbiguousSidecar(format!(
                    "{} matches {} data files",
                    sidecar_path,
                    data_paths.len()
                )))
            }
        };

        let data = catalog
            .get(data_path)
            .ok_or_else(|| BidsortError::RecordNotFound(data_path.clone()))?;
        let sidecar = corrected
            .get_mut(sidecar_path)
            .ok_or_else(|| BidsortError::RecordNotFound(sidecar_path.clone()))?;

        let old_path = std::mem::take(&mut sidecar.old_path);
        *sidecar = data.clone();
        sidecar.old_path = old_path;
        sidecar.extension = SIDECAR_EXTENSION.to_string();
        sidecar.new_path = format!("{}{}", remove_extension(&data.new_path), SIDECAR_EXTENSION);
        count += 1;
    }

    info!(corrected = count, "corrected sidecar metadata");
    Ok(corrected)
}
