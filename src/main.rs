mod aggregate;
mod allowlist;
mod amount;
mod cli;
mod error;
mod fmt;
mod html;
mod mapping;
mod models;
mod normalizer;
mod ranking;
mod reader;
mod repair;
mod settings;
mod stats;
mod writer;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            output_dir,
            fallback,
        } => cli::init::run(output_dir.as_deref(), fallback.as_deref()),
        Commands::Report {
            data,
            shaping,
            filtered,
            out_dir,
            csv,
            no_repair,
        } => cli::report::run(
            &data,
            shaping.as_deref(),
            filtered,
            out_dir.as_deref(),
            csv,
            no_repair,
        ),
        Commands::Analyze {
            data,
            file_no,
            out_dir,
            no_repair,
        } => cli::analyze::run(&data, file_no.as_deref(), out_dir.as_deref(), no_repair),
        Commands::Inspect {
            data,
            shaping,
            no_repair,
        } => cli::inspect::run(&data, shaping.as_deref(), no_repair),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
