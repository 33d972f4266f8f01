//! Subject code resolution

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::filename;
use crate::error::{BidsortError, Result, ResultExt};

/// Subject code used when a filename has no resolvable prefix
pub const SUBJECT_PLACEHOLDER: &str = "sub-unknown";

/// Mapping from raw filename prefixes to canonical subject codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectTable {
    entries: HashMap<String, String>,
}

impl SubjectTable {
    /// Create a table from `(raw prefix, subject code)` pairs
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load a table from a JSON object file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subject table {}", path.display()))?;
        let table: Self = serde_json::from_str(&raw)?;
        debug!(entries = table.len(), path = %path.display(), "loaded subject table");
        Ok(table)
    }

    /// Look up the subject code for an exact raw prefix
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the subject code of `path`
    ///
    /// The candidate key starts as the first underscore segment of the
    /// filename and grows one segment at a time until it is found in the
    /// table.
    pub fn resolve(&self, path: &str) -> Result<&str> {
        let name = filename(path);
        let mut candidate = String::with_capacity(name.len());

        for (i, segment) in name.split('_').enumerate() {
            if i > 0 {
                candidate.push('_');
            }
            candidate.push_str(segment);
            if let Some(sub) = self.get(&candidate) {
                return Ok(sub);
            }
        }

        Err(BidsortError::SubjectNotFound(path.to_string()))
    }
}

/// Resolve the subject code of `path` against `table`
pub fn extract_sub(path: &str, table: &SubjectTable) -> Result<String> {
    table.resolve(path).map(str::to_string)
}
