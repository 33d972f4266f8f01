/*!
 * Text and JSON report writers
 */

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::catalog::{create_parent_dirs, read_json, write_json, Catalog};
use crate::error::{Result, ResultExt};

/// New paths grouped by subject, then by modality type
pub type Recap = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Options for the paths file
#[derive(Debug, Clone, Default)]
pub struct PathsFileOptions {
    /// Prepended to every old path
    pub old_prefix: String,
    /// Prepended to every new path
    pub new_prefix: String,
    /// Append to an existing file instead of replacing it
    pub append: bool,
}

/// One `~<old>, ~/<new>` line per record
pub fn paths_line(old_path: &str, new_path: &str, options: &PathsFileOptions) -> String {
    format!(
        "~{}{}, ~/{}{}",
        options.old_prefix, old_path, options.new_prefix, new_path
    )
}

/// Write the old and new path of every record, one record per line
pub fn write_paths_file(catalog: &Catalog, out: &Path, options: &PathsFileOptions) -> Result<()> {
    create_parent_dirs(out)?;
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(options.append)
        .truncate(!options.append)
        .open(out)
        .with_context(|| format!("Failed to open {}", out.display()))?;

    let mut writer = BufWriter::new(file);
    for record in catalog.records() {
        writeln!(
            writer,
            "{}",
            paths_line(&record.old_path, &record.new_path, options)
        )?;
    }
    writer.flush()?;

    info!(lines = catalog.len(), path = %out.display(), append = options.append, "wrote paths file");
    Ok(())
}

/// Group every new path by subject and type
pub fn general_recap(catalog: &Catalog, new_prefix: &str) -> Recap {
    let mut recap = Recap::new();
    for record in catalog.records() {
        recap
            .entry(record.sub.clone())
            .or_default()
            .entry(record.kind.clone())
            .or_default()
            .push(format!("{}{}", new_prefix, record.new_path));
    }
    recap
}

/// Write the recap of `catalog` as JSON
pub fn write_recap(catalog: &Catalog, out: &Path, new_prefix: &str) -> Result<Recap> {
    let recap = general_recap(catalog, new_prefix);
    write_json(out, &recap)?;
    info!(subjects = recap.len(), path = %out.display(), "wrote recap");
    Ok(recap)
}

/// Union of several recaps, keeping the first occurrence of each path
pub fn merge_recaps<I: IntoIterator<Item = Recap>>(recaps: I) -> Recap {
    let mut merged = Recap::new();
    for recap in recaps {
        for (sub, types) in recap {
            let merged_types = merged.entry(sub).or_default();
            for (kind, paths) in types {
                let merged_paths = merged_types.entry(kind).or_default();
                for path in paths {
                    if !merged_paths.contains(&path) {
                        merged_paths.push(path);
                    }
                }
            }
        }
    }
    merged
}

/// Merge recap files into `out`
pub fn merge_recap_files<P: AsRef<Path>>(inputs: &[P], out: &Path) -> Result<Recap> {
    let recaps = inputs
        .iter()
        .map(|input| read_json::<Recap>(input.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let merged = merge_recaps(recaps);
    write_json(out, &merged)?;
    info!(inputs = inputs.len(), subjects = merged.len(), path = %out.display(), "merged recaps");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SubjectTable;
    use crate::record::build_record;
    use crate::types::Overrides;
    use std::fs;

    fn catalog() -> Catalog {
        let table = SubjectTable::new([("P01", "sub-01"), ("P02", "sub-02")]);
        [
            "/s/P01_mri_20230101000000_1.nii.gz",
            "/s/P01_ct_20230101000000_2.nii.gz",
            "/s/P02_mri_20230101000000_3.nii.gz",
        ]
        .into_iter()
        .map(|p| build_record(p, &table, &Overrides::default()))
        .collect()
    }

    #[test]
    fn paths_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("logs").join("paths.txt");
        let options = PathsFileOptions {
            old_prefix: "Dropbox/source".to_string(),
            new_prefix: "target/".to_string(),
            append: false,
        };

        write_paths_file(&catalog(), &out, &options).unwrap();
        let content = fs::read_to_string(&out).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "~Dropbox/source/s/P01_ct_20230101000000_2.nii.gz, ~/target/sub-01/ct/sub-01_id-2_ct.nii.gz"
        );
    }

    #[test]
    fn paths_file_append() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("paths.txt");
        let mut options = PathsFileOptions::default();

        write_paths_file(&catalog(), &out, &options).unwrap();
        write_paths_file(&catalog(), &out, &options).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 3);

        options.append = true;
        write_paths_file(&catalog(), &out, &options).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 6);
    }

    #[test]
    fn recap_groups_by_subject_and_type() {
        let recap = general_recap(&catalog(), "/target/");
        assert_eq!(recap.len(), 2);
        assert_eq!(
            recap["sub-01"]["anat"],
            ["/target/sub-01/anat/sub-01_id-1.nii.gz"]
        );
        assert_eq!(recap["sub-01"]["ct"].len(), 1);
        assert_eq!(recap["sub-02"].len(), 1);
    }

    #[test]
    fn merging_recaps_deduplicates_paths() {
        let first = general_recap(&catalog(), "");
        let mut second = Recap::new();
        second
            .entry("sub-01".to_string())
            .or_default()
            .insert(
                "anat".to_string(),
                vec![
                    "sub-01/anat/sub-01_id-1.nii.gz".to_string(),
                    "sub-01/anat/sub-01_id-9.nii.gz".to_string(),
                ],
            );
        second
            .entry("sub-03".to_string())
            .or_default()
            .insert("func".to_string(), vec!["sub-03/func/sub-03_bold.nii".to_string()]);

        let merged = merge_recaps([first, second]);
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged["sub-01"]["anat"],
            [
                "sub-01/anat/sub-01_id-1.nii.gz",
                "sub-01/anat/sub-01_id-9.nii.gz"
            ]
        );
    }

    #[test]
    fn merge_recap_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        let out = dir.path().join("merged").join("recap.json");
        write_recap(&catalog(), &a, "").unwrap();
        write_recap(&catalog(), &b, "").unwrap();

        let merged = merge_recap_files(&[a, b], &out).unwrap();
        assert_eq!(merged, general_recap(&catalog(), ""));
        assert!(out.exists());
    }
}
