/*!
 * Reporting functionality for bidsort
 *
 * Provides console summaries of batch commands using the tabled library.
 */

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Local};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::batch::BatchStatistics;

/// Summary of one batch command
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Command that produced the report
    pub command: String,
    /// Output file path, if any
    pub output_file: Option<String>,
    /// Time taken
    pub duration: Duration,
    /// When the command finished
    pub finished_at: DateTime<Local>,
    /// Free-form metrics, in display order
    pub metrics: Vec<(String, String)>,
    /// Record counts per modality type
    pub by_type: BTreeMap<String, usize>,
}

impl RunReport {
    pub fn new(command: impl Into<String>, duration: Duration) -> Self {
        Self {
            command: command.into(),
            output_file: None,
            duration,
            finished_at: Local::now(),
            metrics: Vec::new(),
            by_type: BTreeMap::new(),
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output_file = Some(output.into());
        self
    }

    pub fn metric(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metrics.push((key.into(), value.to_string()));
        self
    }

    /// Add the counters of a classification batch
    pub fn with_batch(self, stats: &BatchStatistics) -> Self {
        let mut report = self
            .metric("📄 Records", stats.records)
            .metric("❓ Unresolved Subjects", stats.unresolved_subjects)
            .metric("🔎 Unclassified", stats.unclassified())
            .metric("🧩 Segmentations", stats.segmentations)
            .metric("🗑️ Temporary", stats.temporary);
        if stats.repeated_inputs > 0 {
            report = report.metric("🔁 Repeated Inputs", stats.repeated_inputs);
        }
        report.by_type = stats.by_type.clone();
        report
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for command results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    pub fn format_number(num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &RunReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn styled(mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = Vec::new();

        if let Some(output) = &report.output_file {
            rows.push(SummaryRow {
                key: "📂 Output File".to_string(),
                value: output.clone(),
            });
        }

        rows.push(SummaryRow {
            key: "⏱️ Process Time".to_string(),
            value: format!("{:.4?}", report.duration),
        });

        rows.push(SummaryRow {
            key: "🕒 Finished".to_string(),
            value: report.finished_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        });

        rows.extend(report.metrics.iter().map(|(key, value)| SummaryRow {
            key: key.clone(),
            value: value.clone(),
        }));

        Self::styled(Table::new(rows))
    }

    fn create_types_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct TypeRow {
            #[tabled(rename = "Type")]
            kind: String,

            #[tabled(rename = "Records")]
            count: String,
        }

        let mut types: Vec<_> = report.by_type.iter().collect();
        types.sort_by(|(_, a), (_, b)| b.cmp(a));

        let rows: Vec<TypeRow> = types
            .into_iter()
            .map(|(kind, count)| TypeRow {
                kind: if kind.is_empty() {
                    "(unclassified)".to_string()
                } else {
                    kind.clone()
                },
                count: Self::format_number(*count),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    fn generate_console_report(&self, report: &RunReport) -> String {
        let summary_title = format!("✅  {} COMPLETE", report.command.to_uppercase());
        let summary_table = self.create_summary_table(report);

        if report.by_type.is_empty() {
            return format!("{}\n{}", summary_title, summary_table);
        }

        format!(
            "{}\n{}\n\n{}\n{}",
            "📋  RECORDS BY TYPE",
            self.create_types_table(report),
            summary_title,
            summary_table
        )
    }
}
