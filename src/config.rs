/*!
 * Configuration handling for bidsort
 */

use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::classify::{SubjectTable, SUBJECT_PLACEHOLDER};
use crate::error::Result;
use crate::storage::{
    DropboxBackend, ListOptions, LocalBackend, StorageBackend, SOURCE_DIR, TOKEN_ENV,
};
use crate::types::Overrides;
use crate::{bail, ensure};

/// Where source files live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackendKind {
    /// A directory on this machine
    #[default]
    Local,
    /// A Dropbox account
    Dropbox,
}

/// Command-line arguments for bidsort
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "bidsort",
    version = env!("CARGO_PKG_VERSION"),
    about = "Classify medical-imaging files and reorganize them into a BIDS-like layout",
    long_about = "Derives subject, modality, category, segmentation target and sequence from raw scan filenames, computes a canonical path for each file and copies files into that layout."
)]
pub struct Args {
    /// Number of threads to use for classification
    #[clap(long, default_value = "4", global = true)]
    pub threads: usize,

    #[clap(subcommand)]
    pub command: Command,
}

/// Storage backend selection
#[derive(ClapArgs, Debug, Clone)]
pub struct BackendArgs {
    /// Storage backend to list and copy with
    #[clap(long, value_enum, default_value_t = BackendKind::default())]
    pub backend: BackendKind,

    /// Dropbox access token
    #[clap(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Directory that local storage paths are relative to
    #[clap(long, default_value = ".")]
    pub local_base: PathBuf,

    /// Comma-separated glob patterns of file names to skip (local backend)
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}

impl BackendArgs {
    /// Build the selected backend
    pub fn build(&self) -> Result<Box<dyn StorageBackend>> {
        match self.backend {
            BackendKind::Local => {
                ensure!(
                    self.local_base.is_dir(),
                    PathNotFound,
                    "Local base directory not found: {}",
                    self.local_base.display()
                );
                Ok(Box::new(
                    LocalBackend::new(&self.local_base).with_exclude_patterns(self.exclude.clone()),
                ))
            }
            BackendKind::Dropbox => {
                let token = self.token.clone().unwrap_or_default();
                Ok(Box::new(DropboxBackend::connect(token)?))
            }
        }
    }
}

/// Batch subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List every file under a storage root
    List {
        #[clap(flatten)]
        backend: BackendArgs,

        /// Directory to list
        #[clap(long, default_value = SOURCE_DIR)]
        root: String,

        /// Source tree root, removed from recursively listed paths
        #[clap(long, default_value = SOURCE_DIR)]
        source_dir: String,

        /// Only list direct children, directories included
        #[clap(long)]
        no_recursive: bool,

        /// Keep the root in the returned paths
        #[clap(long)]
        keep_root: bool,

        /// Output JSON file
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Build a file-info record for every listed path
    Classify {
        /// Path list, JSON array or one path per line
        #[clap(short, long)]
        input: PathBuf,

        /// Subject table, JSON object of raw prefix to subject code
        #[clap(long)]
        subjects: Option<PathBuf>,

        /// Subject code for files without a known prefix
        #[clap(long, default_value = SUBJECT_PLACEHOLDER)]
        unknown_subject: String,

        /// Force a field on every record, as field=value (repeatable)
        #[clap(long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<String>,

        /// Output file-info JSON
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Recompute new paths after records were edited
    Refresh {
        #[clap(short, long)]
        input: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
    },

    /// List records sharing the same new path
    FlagDuplicates {
        #[clap(short, long)]
        input: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Number the members of every flagged group
    RenameDuplicates {
        #[clap(short, long)]
        input: PathBuf,
        /// Groups written by flag-duplicates
        #[clap(long)]
        flagged: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Pair JSON sidecars with the data files they describe
    MatchSidecars {
        #[clap(short, long)]
        input: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Copy data file metadata onto their sidecars
    CorrectSidecars {
        #[clap(short, long)]
        input: PathBuf,
        /// Matches written by match-sidecars
        #[clap(long)]
        matches: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Write an `~old, ~/new` line per record
    WritePaths {
        #[clap(short, long)]
        input: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
        #[clap(long, default_value = "")]
        old_prefix: String,
        #[clap(long, default_value = "")]
        new_prefix: String,
        /// Append instead of replacing the output
        #[clap(long)]
        append: bool,
    },

    /// Group new paths by subject and type
    Recap {
        #[clap(short, long)]
        input: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
        #[clap(long, default_value = "")]
        new_prefix: String,
    },

    /// Merge several recap files
    MergeRecaps {
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Copy every file to its new path
    Sort {
        #[clap(flatten)]
        backend: BackendArgs,

        #[clap(short, long)]
        input: PathBuf,

        #[clap(long, default_value = SOURCE_DIR)]
        source_dir: String,

        #[clap(long, default_value = "/target/")]
        target_dir: String,

        /// Log the planned copies without copying
        #[clap(long)]
        dry_run: bool,
    },

    /// Generate shell completions
    Completions {
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of threads to use for classification
    pub num_threads: usize,

    /// Command to run
    pub command: Command,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            num_threads: args.threads,
            command: args.command,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.num_threads > 0,
            InvalidArgument,
            "--threads must be at least 1"
        );

        match &self.command {
            Command::Classify {
                input,
                subjects,
                overrides,
                ..
            } => {
                require_file(input)?;
                if let Some(subjects) = subjects {
                    require_file(subjects)?;
                }
                parse_overrides(overrides)?;
            }
            Command::Refresh { input, .. }
            | Command::FlagDuplicates { input, .. }
            | Command::MatchSidecars { input, .. }
            | Command::WritePaths { input, .. }
            | Command::Recap { input, .. }
            | Command::Sort { input, .. } => require_file(input)?,
            Command::RenameDuplicates { input, flagged, .. } => {
                require_file(input)?;
                require_file(flagged)?;
            }
            Command::CorrectSidecars { input, matches, .. } => {
                require_file(input)?;
                require_file(matches)?;
            }
            Command::MergeRecaps { inputs, .. } => {
                for input in inputs {
                    require_file(input)?;
                }
            }
            Command::List { .. } | Command::Completions { .. } => {}
        }

        Ok(())
    }
}

impl Command {
    /// Listing options of a `list` command
    pub fn list_options(
        no_recursive: bool,
        keep_root: bool,
        source_dir: &str,
    ) -> ListOptions<'_> {
        ListOptions {
            recursive: !no_recursive,
            strip_root: !keep_root,
            source_dir,
        }
    }
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!(PathNotFound, "Input file not found: {}", path.display());
    }
    Ok(())
}

/// Parse `field=value` assignments into overrides
pub fn parse_overrides(assignments: &[String]) -> Result<Overrides> {
    let mut overrides = Overrides::default();
    for assignment in assignments {
        overrides.apply_assignment(assignment)?;
    }
    Ok(overrides)
}

/// Default location of the subject table
pub fn default_subject_table_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bidsort").join("subjects.json"))
}

/// Load the given subject table, or the default one if it exists
///
/// Without any table every subject resolves to the placeholder.
pub fn load_subject_table(path: Option<&Path>) -> Result<SubjectTable> {
    if let Some(path) = path {
        return SubjectTable::load(path);
    }

    match default_subject_table_path() {
        Some(path) if path.is_file() => SubjectTable::load(&path),
        _ => {
            tracing::warn!("no subject table found, every subject will be the placeholder");
            Ok(SubjectTable::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BidsortError;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_classify_with_overrides() {
        let args = Args::try_parse_from([
            "bidsort",
            "classify",
            "-i",
            "paths.json",
            "--set",
            "type=misc",
            "--set",
            "is_other=true",
            "-o",
            "out.json",
        ])
        .unwrap();

        let Command::Classify {
            overrides,
            unknown_subject,
            ..
        } = &args.command
        else {
            panic!("expected classify");
        };
        assert_eq!(unknown_subject, "sub-unknown");
        let overrides = parse_overrides(overrides).unwrap();
        assert_eq!(overrides.kind.as_deref(), Some("misc"));
        assert_eq!(overrides.is_other, Some(true));
    }

    #[test]
    fn missing_input_fails_validation() {
        let args = Args::try_parse_from([
            "bidsort",
            "refresh",
            "-i",
            "/definitely/not/here.json",
            "-o",
            "out.json",
        ])
        .unwrap();
        let err = Config::from_args(args).validate().unwrap_err();
        assert!(matches!(err, BidsortError::PathNotFound(_)));
    }

    #[test]
    fn zero_threads_fails_validation() {
        let args = Args::try_parse_from(["bidsort", "--threads", "0", "completions", "bash"]).unwrap();
        assert!(Config::from_args(args).validate().is_err());
    }

    #[test]
    fn list_defaults() {
        let options = Command::list_options(false, false, SOURCE_DIR);
        assert_eq!(options, ListOptions::default());
        assert!(!Command::list_options(true, true, SOURCE_DIR).recursive);

        let args = Args::try_parse_from([
            "bidsort",
            "list",
            "--root",
            "/data/study",
            "--source-dir",
            "/data",
            "-o",
            "paths.json",
        ])
        .unwrap();
        let Command::List { root, source_dir, .. } = &args.command else {
            panic!("expected list");
        };
        assert_eq!(root, "/data/study");
        assert_eq!(Command::list_options(false, false, source_dir).source_dir, "/data");
    }

    #[test]
    fn explicit_subject_table_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subjects.json");
        std::fs::write(&path, r#"{"P01": "sub-01"}"#).unwrap();
        let table = load_subject_table(Some(&path)).unwrap();
        assert_eq!(table.get("P01"), Some("sub-01"));
    }
}
