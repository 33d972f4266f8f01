/*!
 * Persisted collections of file records
 */

use std::collections::btree_map::{self, BTreeMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ResultExt};
use crate::types::FileRecord;

/// Records keyed by their original path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: BTreeMap<String, FileRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog saved by [`Catalog::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let catalog: Self = read_json(path)?;
        debug!(records = catalog.len(), path = %path.display(), "loaded catalog");
        Ok(catalog)
    }

    /// Save as a pretty-printed JSON object, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)?;
        info!(records = self.len(), path = %path.display(), "saved catalog");
        Ok(())
    }

    /// Insert a record under its own `old_path`, returning any record it replaced
    pub fn insert(&mut self, record: FileRecord) -> Option<FileRecord> {
        self.records.insert(record.old_path.clone(), record)
    }

    pub fn get(&self, old_path: &str) -> Option<&FileRecord> {
        self.records.get(old_path)
    }

    pub fn get_mut(&mut self, old_path: &str) -> Option<&mut FileRecord> {
        self.records.get_mut(old_path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered by key
    pub fn iter(&self) -> btree_map::Iter<'_, String, FileRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> btree_map::Values<'_, String, FileRecord> {
        self.records.values()
    }

    /// Recompute every `new_path` from the stored fields
    pub fn refresh(&mut self) -> usize {
        let mut changed = 0;
        for record in self.records.values_mut() {
            let before = std::mem::take(&mut record.new_path);
            record.refresh_new_path();
            if record.new_path != before {
                debug!(old_path = %record.old_path, %before, after = %record.new_path, "refreshed new path");
                changed += 1;
            }
        }
        changed
    }
}

impl FromIterator<FileRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = (&'a String, &'a FileRecord);
    type IntoIter = btree_map::Iter<'a, String, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Read a JSON document from `path`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Write `value` as pretty JSON to `path`, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    create_parent_dirs(path)?;
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Create the directory that will contain `path`
pub fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Read a list of source paths
///
/// Accepts a JSON array of strings or plain text with one path per line.
pub fn read_path_list(path: &Path) -> Result<Vec<String>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if raw.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(&raw)?);
    }

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
