/*!
 * bidsort - Classify medical-imaging files into a BIDS-like layout
 *
 * This library reads raw scan, segmentation and simulation file paths,
 * derives subject, modality, category, segmentation target and sequence
 * metadata from them, and computes the canonical path each file belongs at.
 */

pub mod batch;
pub mod catalog;
pub mod classify;
pub mod compose;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod record;
pub mod report;
pub mod sidecar;
pub mod storage;
pub mod types;
pub mod writer;


// Re-export main components for easier access
pub use batch::{BatchClassifier, BatchStatistics};
pub use catalog::Catalog;
pub use classify::{Modality, SubjectTable};
pub use compose::{generate_new_path, NewPathParts, QUARANTINE_PREFIX};
pub use config::Config;
pub use error::{BidsortError, Result};
pub use record::{build_record, build_record_with_placeholder};
pub use report::{ReportFormat, Reporter, RunReport};
pub use types::{FileRecord, Overrides};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
