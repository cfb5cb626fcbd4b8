pub mod analyze;
pub mod init;
pub mod inspect;
pub mod report;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::models::NormalizeStats;
use crate::repair::RepairStrategy;

/// Every command repairs mojibake unless told otherwise.
pub(crate) fn strategy_for(no_repair: bool) -> RepairStrategy {
    if no_repair {
        RepairStrategy::None
    } else {
        RepairStrategy::Mojibake
    }
}

/// Anomaly counts are part of every run's output; bad rows are never
/// swallowed silently.
pub(crate) fn print_anomalies(stats: &NormalizeStats) {
    println!(
        "{} rows read, {} normalized, {} dropped",
        stats.input_rows, stats.normalized, stats.dropped_rows
    );
    if stats.repaired_fields > 0 {
        println!("  {} garbled fields repaired", stats.repaired_fields);
    }
    if !stats.has_anomalies() {
        return;
    }
    println!("{}", "Anomalies:".yellow().bold());
    for (count, label) in [
        (stats.dropped_rows, "rows dropped (no usable key fields)"),
        (stats.repair_failures, "fields left garbled (repair failed)"),
        (stats.quantity_defaults, "quantities defaulted to zero"),
        (stats.price_defaults, "unit prices defaulted to zero"),
        (stats.date_failures, "receipt dates unparseable"),
        (stats.unknown_codes, "classification codes not in the table"),
    ] {
        if count > 0 {
            println!("  {} {}", count.to_string().yellow(), label);
        }
    }
}

#[derive(Parser)]
#[command(name = "shiire", about = "Purchasing-export normalizer and spend report generator.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the settings file with current defaults.
    Init {
        /// Default output directory for reports
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
        /// Unknown-code fallback: source-name or label
        #[arg(long)]
        fallback: Option<String>,
    },
    /// Normalize an export and write detail/summary reports.
    Report {
        /// Path to the purchasing export (.xls or .xlsx)
        #[arg(long)]
        data: String,
        /// Path to the shaping-list export (required with --filtered)
        #[arg(long)]
        shaping: Option<String>,
        /// Keep only classification codes present in the shaping list
        #[arg(long)]
        filtered: bool,
        /// Output directory (default from settings)
        #[arg(long = "out-dir")]
        out_dir: Option<String>,
        /// Also write the detail CSV
        #[arg(long)]
        csv: bool,
        /// Skip mojibake repair (export is already clean)
        #[arg(long = "no-repair")]
        no_repair: bool,
    },
    /// Rank one file number's purchases (category → supplier → product)
    /// and write the HTML report.
    Analyze {
        /// Path to the purchasing export (.xls or .xlsx)
        #[arg(long)]
        data: String,
        /// File number to analyze; omit to list available file numbers
        #[arg(long = "file-no")]
        file_no: Option<String>,
        /// Output directory (default from settings)
        #[arg(long = "out-dir")]
        out_dir: Option<String>,
        /// Skip mojibake repair (export is already clean)
        #[arg(long = "no-repair")]
        no_repair: bool,
    },
    /// Show what the pipeline sees: columns, file numbers, the translation
    /// table, and anomaly counts. Writes nothing.
    Inspect {
        /// Path to the purchasing export (.xls or .xlsx)
        #[arg(long)]
        data: String,
        /// Path to the shaping-list export
        #[arg(long)]
        shaping: Option<String>,
        /// Skip mojibake repair (export is already clean)
        #[arg(long = "no-repair")]
        no_repair: bool,
    },
}
