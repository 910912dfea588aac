//! Binary entry point for nirs-bids.
//!
//! Loads the study configuration, installs logging and runs one command.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use nirs_bids::bids::dyad_pairs;
use nirs_bids::config::CONFIG_FILE;
use nirs_bids::io::SnirfBackend;
use nirs_bids::lookup::{DyadTable, load_dyad_grouping};
use nirs_bids::observability::{self, LogFormat, LoggingConfig};
use nirs_bids::pipeline::{self, Selection};
use nirs_bids::{Category, Error, FilenameParser, LoggingObserver, ParseMode, StudyConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// nirs-bids - Organize a study's fNIRS recordings and artifacts into BIDS.
#[derive(Parser)]
#[command(name = "nirs-bids")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the study configuration file.
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log format: pretty or json.
    #[arg(long, global = true, default_value = "pretty")]
    log_format: String,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Check that the configured source folders exist.
    Inventory,

    /// Convert source folders into the output layout.
    Convert {
        /// Categories to convert (comma-separated: nirs, art, coord, mocap).
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
    },

    /// Parse a single file or folder name and print its identifiers.
    Parse {
        /// The name to parse.
        name: String,

        /// Parsing mode: standard, artwork, coordinates or mocap.
        #[arg(short, long, default_value = "standard")]
        mode: String,
    },

    /// List paired recordings of each dyad in the converted dataset.
    Pairs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(format) = LogFormat::parse(&cli.log_format) else {
        eprintln!("Unknown log format: {}", cli.log_format);
        return ExitCode::FAILURE;
    };
    let logging = LoggingConfig::new(cli.verbose)
        .with_format(format)
        .with_file(cli.log_file.clone());
    if let Err(e) = observability::init(logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Aborted");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Inventory => cmd_inventory(&StudyConfig::load(&cli.config)?),
        Commands::Convert { only } => cmd_convert(&StudyConfig::load(&cli.config)?, only),
        Commands::Parse { name, mode } => cmd_parse(&cli.config, &name, &mode),
        Commands::Pairs => cmd_pairs(&StudyConfig::load(&cli.config)?),
    }
}

fn cmd_inventory(config: &StudyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let entries = pipeline::inventory(config);
    if entries.is_empty() {
        println!("No sources configured.");
    }
    for entry in entries {
        let status = if entry.exists { "found" } else { "missing" };
        println!(
            "{:<8} {:<24} {:<8} {} items",
            entry.key, entry.folder, status, entry.items
        );
    }
    Ok(())
}

fn cmd_convert(config: &StudyConfig, only: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let selection = if only.is_empty() {
        Selection::All
    } else {
        let categories = only
            .iter()
            .map(|s| {
                Category::parse(s).ok_or_else(|| Error::InvalidInput(format!("unknown category: {s}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Selection::Only(categories)
    };

    cmd_inventory(config)?;
    let reports = pipeline::run(config, &selection, &SnirfBackend::new(), &mut LoggingObserver)?;

    for report in &reports {
        println!(
            "{:<6} success: {}, failures: {}, skipped: {}",
            report.category.config_key(),
            report.succeeded, report.failed, report.skipped
        );
    }
    Ok(())
}

fn cmd_parse(config_path: &Path, name: &str, mode: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mode = ParseMode::parse(mode)
        .ok_or_else(|| Error::InvalidInput(format!("unknown parse mode: {mode}")))?;

    let dyads = match StudyConfig::load(config_path) {
        Ok(config) => DyadTable::load(&config.dyad_list_path()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Parsing without dyad list");
            DyadTable::default()
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Parsing without study config");
            DyadTable::default()
        },
    };

    let parser = FilenameParser::new(&dyads);
    match parser.parse(mode, name) {
        Some(identifier) => println!("{}", serde_json::to_string_pretty(&identifier)?),
        None => println!("null"),
    }
    Ok(())
}

fn cmd_pairs(config: &StudyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let grouping = load_dyad_grouping(&config.dyad_list_path());
    let root = config.output_path(Category::Nirs.config_key())?;
    let pairs = dyad_pairs(&root, &grouping, &config.task_name)?;
    println!("{}", serde_json::to_string_pretty(&pairs)?);
    Ok(())
}
