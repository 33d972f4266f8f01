/*!
 * Batch classification of source paths
 */

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::classify::{Modality, SubjectTable, SUBJECT_PLACEHOLDER};
use crate::record::build_record_with_placeholder;
use crate::types::{FileRecord, Overrides};

/// Batch statistics
#[derive(Debug, Clone, Default)]
pub struct BatchStatistics {
    /// Number of records built
    pub records: usize,
    /// Records per modality type, the empty type included
    pub by_type: BTreeMap<String, usize>,
    /// Records that fell back to the placeholder subject
    pub unresolved_subjects: usize,
    /// Records of a segmentation modality
    pub segmentations: usize,
    /// Records quarantined as temporary files
    pub temporary: usize,
    /// Paths listed more than once in the input
    pub repeated_inputs: usize,
}

impl BatchStatistics {
    fn record(&mut self, record: &FileRecord, placeholder: &str) {
        self.records += 1;
        *self.by_type.entry(record.kind.clone()).or_default() += 1;
        if record.sub == placeholder {
            self.unresolved_subjects += 1;
        }
        if Modality::from_str(&record.kind).is_ok_and(|m| m.is_segmentation()) {
            self.segmentations += 1;
        }
        if record.is_tmp {
            self.temporary += 1;
        }
    }

    /// Records no modality rule matched
    pub fn unclassified(&self) -> usize {
        self.by_type.get("").copied().unwrap_or(0)
    }
}

/// Builds a catalog from a list of source paths
pub struct BatchClassifier {
    table: SubjectTable,
    overrides: Overrides,
    placeholder: String,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    statistics: Arc<Mutex<BatchStatistics>>,
}

impl BatchClassifier {
    /// Create a classifier with no overrides and the default placeholder
    pub fn new(table: SubjectTable, progress: Arc<ProgressBar>) -> Self {
        Self {
            table,
            overrides: Overrides::default(),
            placeholder: SUBJECT_PLACEHOLDER.to_string(),
            progress,
            statistics: Arc::new(Mutex::new(BatchStatistics::default())),
        }
    }

    /// Apply `overrides` to every record of the batch
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Subject used when a filename has no known prefix
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Get batch statistics
    pub fn get_statistics(&self) -> BatchStatistics {
        self.statistics
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    /// Classify a single path
    pub fn classify_one(&self, path: &str) -> FileRecord {
        let record =
            build_record_with_placeholder(path, &self.table, &self.overrides, &self.placeholder);
        debug!(old_path = %record.old_path, new_path = %record.new_path, kind = %record.kind, "classified");
        record
    }

    /// Classify every path in parallel
    ///
    /// Records are independent of each other, so the output does not depend
    /// on scheduling.
    pub fn classify<S: AsRef<str> + Sync>(&self, paths: &[S]) -> Catalog {
        if !self.overrides.is_empty() {
            info!(overrides = ?self.overrides, "applying overrides to every record");
        }
        self.progress.set_length(paths.len() as u64);

        let records: Vec<FileRecord> = paths
            .par_iter()
            .map(|path| {
                let record = self.classify_one(path.as_ref());
                self.progress.inc(1);
                record
            })
            .collect();

        let mut catalog = Catalog::new();
        let mut stats = BatchStatistics::default();
        for record in records {
            stats.record(&record, &self.placeholder);
            if let Some(previous) = catalog.insert(record) {
                warn!(old_path = %previous.old_path, "path listed more than once");
                stats.repeated_inputs += 1;
            }
        }

        info!(
            records = stats.records,
            unresolved_subjects = stats.unresolved_subjects,
            unclassified = stats.unclassified(),
            temporary = stats.temporary,
            "batch classified"
        );

        if let Ok(mut shared) = self.statistics.lock() {
            *shared = stats;
        }
        catalog
    }
}
