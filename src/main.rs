/*!
 * Command-line interface for bidsort
 */

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bidsort::batch::BatchClassifier;
use bidsort::catalog::{read_json, read_path_list, write_json, Catalog};
use bidsort::config::{load_subject_table, parse_overrides, Args, Command, Config};
use bidsort::duplicates::{flag_potential_duplicates, rename_duplicates, DuplicateGroups};
use bidsort::error::Result;
use bidsort::report::{ReportFormat, Reporter, RunReport};
use bidsort::sidecar::{correct_with_matching_metadata, match_sidecars, SidecarMatches};
use bidsort::storage::sort_source_to_target;
use bidsort::writer::{merge_recap_files, write_paths_file, write_recap, PathsFileOptions};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bidsort=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_args(Args::parse());

    if let Err(e) = config.validate().and_then(|()| run(&config)) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        warn!("Failed to set thread pool size: {}", e);
    }

    let start_time = Instant::now();
    let report = match &config.command {
        Command::List {
            backend,
            root,
            source_dir,
            no_recursive,
            keep_root,
            output,
        } => {
            let backend = backend.build()?;
            let options = Command::list_options(*no_recursive, *keep_root, source_dir);
            info!(root = %root, recursive = options.recursive, "listing files");
            let paths = backend.list_paths(root, options)?;
            write_json(output, &paths)?;
            output_report("list", start_time.elapsed(), output).metric("📄 Paths", paths.len())
        }

        Command::Classify {
            input,
            subjects,
            unknown_subject,
            overrides,
            output,
        } => {
            let paths = read_path_list(input)?;
            let table = load_subject_table(subjects.as_deref())?;
            let overrides = parse_overrides(overrides)?;

            let progress = progress_bar(paths.len() as u64);
            let classifier = BatchClassifier::new(table, Arc::new(progress.clone()))
                .with_overrides(overrides)
                .with_placeholder(unknown_subject.clone());
            let catalog = classifier.classify(&paths);
            progress.finish_and_clear();

            catalog.save(output)?;
            output_report("classify", start_time.elapsed(), output)
                .with_batch(&classifier.get_statistics())
        }

        Command::Refresh { input, output } => {
            let mut catalog = Catalog::load(input)?;
            let changed = catalog.refresh();
            catalog.save(output)?;
            output_report("refresh", start_time.elapsed(), output)
                .metric("📄 Records", catalog.len())
                .metric("✏️ Changed", changed)
        }

        Command::FlagDuplicates { input, output } => {
            let catalog = Catalog::load(input)?;
            let groups = flag_potential_duplicates(&catalog);
            write_json(output, &groups)?;
            output_report("flag duplicates", start_time.elapsed(), output)
                .metric("📄 Records", catalog.len())
                .metric("👯 Groups", groups.len())
                .metric("🔁 Flagged Files", groups.values().map(Vec::len).sum::<usize>())
        }

        Command::RenameDuplicates {
            input,
            flagged,
            output,
        } => {
            let catalog = Catalog::load(input)?;
            let groups: DuplicateGroups = read_json(flagged)?;
            let renamed = rename_duplicates(&catalog, &groups)?;
            renamed.save(output)?;
            output_report("rename duplicates", start_time.elapsed(), output)
                .metric("👯 Groups", groups.len())
        }

        Command::MatchSidecars { input, output } => {
            let catalog = Catalog::load(input)?;
            let matches = match_sidecars(&catalog);
            write_json(output, &matches)?;
            let unmatched = matches.values().filter(|m| m.is_empty()).count();
            let ambiguous = matches.values().filter(|m| m.len() > 1).count();
            output_report("match sidecars", start_time.elapsed(), output)
                .metric("🧾 Sidecars", matches.len())
                .metric("❓ Unmatched", unmatched)
                .metric("⚠️ Ambiguous", ambiguous)
        }

        Command::CorrectSidecars {
            input,
            matches,
            output,
        } => {
            let catalog = Catalog::load(input)?;
            let matches: SidecarMatches = read_json(matches)?;
            let corrected = correct_with_matching_metadata(&catalog, &matches)?;
            corrected.save(output)?;
            output_report("correct sidecars", start_time.elapsed(), output)
                .metric("📄 Records", corrected.len())
        }

        Command::WritePaths {
            input,
            output,
            old_prefix,
            new_prefix,
            append,
        } => {
            let catalog = Catalog::load(input)?;
            let options = PathsFileOptions {
                old_prefix: old_prefix.clone(),
                new_prefix: new_prefix.clone(),
                append: *append,
            };
            write_paths_file(&catalog, output, &options)?;
            output_report("write paths", start_time.elapsed(), output).metric("📝 Lines", catalog.len())
        }

        Command::Recap {
            input,
            output,
            new_prefix,
        } => {
            let catalog = Catalog::load(input)?;
            let recap = write_recap(&catalog, output, new_prefix)?;
            output_report("recap", start_time.elapsed(), output).metric("🧑 Subjects", recap.len())
        }

        Command::MergeRecaps { inputs, output } => {
            let merged = merge_recap_files(inputs, output)?;
            output_report("merge recaps", start_time.elapsed(), output)
                .metric("📚 Inputs", inputs.len())
                .metric("🧑 Subjects", merged.len())
        }

        Command::Sort {
            backend,
            input,
            source_dir,
            target_dir,
            dry_run,
        } => {
            let catalog = Catalog::load(input)?;
            let backend = backend.build()?;
            let summary =
                sort_source_to_target(&catalog, backend.as_ref(), source_dir, target_dir, *dry_run);
            for (old_path, reason) in &summary.failed {
                error!(%old_path, %reason, "not copied");
            }
            RunReport::new("sort", start_time.elapsed())
                .metric("📦 Copied", summary.copied)
                .metric("❌ Failed", summary.failed.len())
                .metric("🧪 Dry Run", dry_run)
        }

        Command::Completions { shell } => {
            let mut command = Args::command();
            let name = command.get_name().to_string();
            clap_complete::generate(*shell, &mut command, name, &mut io::stdout());
            return Ok(());
        }
    };

    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    Ok(())
}

fn output_report(command: &str, duration: Duration, output: &Path) -> RunReport {
    RunReport::new(command, duration).with_output(output.display().to_string())
}

fn progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}  Remaining: {eta_precise}",
    ) {
        progress.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
    }
    progress.set_prefix("🗂️ Classifying");
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
