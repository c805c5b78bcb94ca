//! Apex debug log analyzer CLI.
//!
//! Provides the `apexlog` binary. Currently supports `analyze`, which runs
//! the full analysis pipeline over a log file and prints the report as JSON.
//!
//! Uses the same `apexlog_analyze::analyze()` pipeline as the HTTP server
//! endpoint, ensuring identical analysis behavior from both entry points.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use apexlog_analyze::analyze;
use apexlog_core::AnalyzeConfig;

/// Apex debug log analyzer and tools.
#[derive(Parser)]
#[command(name = "apexlog", about = "Apex debug log analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Analyze a debug log file and print the report as JSON.
    Analyze {
        /// Path to the debug log file.
        #[arg(short, long)]
        file: PathBuf,

        /// Pretty-print the JSON report.
        #[arg(long)]
        pretty: bool,

        /// Limit usage ratio at which a warning finding is produced.
        #[arg(long, default_value_t = 0.8)]
        warning_ratio: f64,

        /// Limit usage ratio at which a critical finding is produced.
        #[arg(long, default_value_t = 1.0)]
        critical_ratio: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            pretty,
            warning_ratio,
            critical_ratio,
        } => {
            let exit_code = run_analyze(&file, pretty, warning_ratio, critical_ratio);
            process::exit(exit_code);
        }
    }
}

/// Execute the analyze subcommand.
///
/// Returns exit code: 0 = success, 1 = analysis error, 3 = I/O error.
fn run_analyze(file: &Path, pretty: bool, warning_ratio: f64, critical_ratio: f64) -> i32 {
    let text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", file.display(), e);
            return 3;
        }
    };

    let config = AnalyzeConfig {
        warning_limit_ratio: warning_ratio,
        critical_limit_ratio: critical_ratio,
        ..AnalyzeConfig::default()
    };

    match analyze(&text, &config) {
        Ok(report) => {
            let json = if pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            };
            let json = json.unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize report: {}\"}}", e)
            });
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Analysis error: {}", e);
            1
        }
    }
}
