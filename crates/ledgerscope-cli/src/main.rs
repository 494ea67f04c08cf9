//! Ledgerscope CLI.
//!
//! Reads a JSON array of raw transaction records, runs the forensic
//! analysis pipeline, and writes the result bundle as JSON.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use ledgerscope::core::config::AnalysisConfig;
use ledgerscope::core::progress::ProgressReporter;
use ledgerscope::core::record::RawRecord;
use ledgerscope::engine::{AnalyzeOptions, ForensicsEngine};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ledgerscope")]
#[command(version, about = "Financial-transactions forensic analyzer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON array of transaction records
    Analyze {
        /// Input file path, or `-` for stdin
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,

        /// Override configuration from a JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default analysis configuration as JSON
    Defaults,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            pretty,
            config,
        } => {
            let records = read_records(&input)?;
            ensure_schema(&records)?;

            let config = match config {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("reading config {}", path.display()))?;
                    serde_json::from_str::<AnalysisConfig>(&text)
                        .with_context(|| format!("parsing config {}", path.display()))?
                }
                None => AnalysisConfig::default(),
            };

            let engine = ForensicsEngine::new(config)?;
            let options = AnalyzeOptions::default().with_progress(ProgressReporter::new(
                |label, fraction| tracing::info!(progress = fraction, "{label}"),
            ));
            let report = engine.analyze(records, &options)?;

            let rendered = if pretty {
                report.to_json_pretty()?
            } else {
                report.to_json()?
            };
            match output {
                Some(path) => fs::write(&path, rendered)
                    .with_context(|| format!("writing report to {}", path.display()))?,
                None => println!("{rendered}"),
            }
        }

        Commands::Defaults => {
            println!(
                "{}",
                serde_json::to_string_pretty(&AnalysisConfig::default())?
            );
        }
    }

    Ok(())
}

fn read_records(input: &PathBuf) -> anyhow::Result<Vec<RawRecord>> {
    let text = if input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        buffer
    } else {
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?
    };
    serde_json::from_str(&text).context("parsing input records")
}

/// Reject streams that lack a required column entirely; per-row gaps are
/// repaired downstream by the normalizer.
fn ensure_schema(records: &[RawRecord]) -> anyhow::Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    for (column, present) in [
        ("sender_id", records.iter().any(|r| r.sender_id.is_some())),
        ("receiver_id", records.iter().any(|r| r.receiver_id.is_some())),
        ("amount", records.iter().any(|r| r.amount.is_some())),
    ] {
        if !present {
            bail!(ledgerscope::core::error::EngineError::schema_missing(
                column
            ));
        }
    }
    Ok(())
}
