//! Rasscope - inspect HEC-RAS HDF5 files from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rasscope::config::ScopeConfig;
use rasscope::data::{Container, ContainerReader};
use rasscope::patterns::{file_metadata, hecras_patterns, resolve, ExtractionReport, FileMetadata};
use rasscope::{classify, explorer, sampling, util, RasscopeError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[cfg(feature = "hdf5")]
const BACKENDS: &str = "Reads HDF5 files (.hdf, .h5) and JSON snapshots (.json).";
#[cfg(not(feature = "hdf5"))]
const BACKENDS: &str = "This build reads JSON snapshots (.json) only. \
    Rebuild with `--features hdf5` to open HDF5 files.";

#[derive(Parser, Debug)]
#[command(name = "rasscope")]
#[command(about = "Inspect the structure and contents of HEC-RAS HDF5 files", long_about = None)]
#[command(after_help = BACKENDS)]
struct Args {
    /// Enable logging to specified file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// TOML file with query limits
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print trees and dataset listings as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the group/dataset tree
    Tree {
        /// Container file (.hdf, .h5, or a .json snapshot)
        file: PathBuf,
        /// Deepest level to expand (root is 0)
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// List every dataset, largest first
    Datasets {
        /// Container file
        file: PathBuf,
        /// Only show the largest N datasets
        #[arg(long)]
        top: Option<usize>,
    },
    /// Resolve the HEC-RAS extraction patterns
    Extract {
        /// Container file
        file: PathBuf,
        /// Values sampled per matched dataset
        #[arg(long)]
        max_samples: Option<usize>,
    },
    /// Tag datasets with mesh and result roles
    Classify {
        /// Container file
        file: PathBuf,
    },
    /// Print a bounded sample of one dataset
    Sample {
        /// Container file
        file: PathBuf,
        /// Dataset path inside the file
        path: String,
        /// Number of values to sample
        #[arg(long)]
        max_samples: Option<usize>,
    },
    /// Print the leading rows of one dataset as a table
    Preview {
        /// Container file
        file: PathBuf,
        /// Dataset path inside the file
        path: String,
        /// Row limit
        #[arg(long)]
        max_rows: Option<usize>,
    },
    /// Summarize a file: size, modification time, node counts
    Info {
        /// Container file
        file: PathBuf,
    },
    /// Run every query and print the combined report
    Analyze {
        /// Container file
        file: PathBuf,
        /// Number of largest datasets to include
        #[arg(long)]
        top: Option<usize>,
        /// Values sampled per matched dataset
        #[arg(long)]
        max_samples: Option<usize>,
    },
}

#[derive(Serialize)]
struct ExtractOutput {
    metadata: FileMetadata,
    #[serde(flatten)]
    extraction: ExtractionReport,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    let mut config = match &args.config {
        Some(path) => ScopeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScopeConfig::default(),
    };

    match args.command {
        Command::Tree { file, max_depth } => {
            if let Some(depth) = max_depth {
                config.max_depth = depth;
            }
            let container = open(&file)?;
            let report = explorer::explore(container.as_ref(), config.max_depth);
            if args.json {
                print_json(&report)?;
            } else {
                let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
                print!("{}", util::render_tree(&report, name.as_deref()));
            }
        }
        Command::Datasets { file, top } => {
            let container = open(&file)?;
            let mut inventory = explorer::list_datasets(container.as_ref());
            if let Some(n) = top {
                inventory.datasets.truncate(n);
            }
            if args.json {
                print_json(&inventory)?;
            } else {
                print!("{}", util::render_dataset_table(&inventory.datasets));
                for (path, error) in &inventory.unreadable {
                    println!("Skipped {}: {}", path, error);
                }
                if let Some(ref error) = inventory.error {
                    println!("Listing stopped early: {}", error);
                }
            }
        }
        Command::Extract { file, max_samples } => {
            if let Some(n) = max_samples {
                config.max_samples = n;
            }
            let container = open(&file)?;
            let extraction = resolve(container.as_ref(), &hecras_patterns()?, config.max_samples);
            print_json(&ExtractOutput {
                metadata: file_metadata(container.as_ref()),
                extraction,
            })?;
        }
        Command::Classify { file } => {
            let container = open(&file)?;
            print_json(&classify::classify(container.as_ref()))?;
        }
        Command::Sample {
            file,
            path,
            max_samples,
        } => {
            if let Some(n) = max_samples {
                config.max_samples = n;
            }
            let container = open(&file)?;
            ensure_exists(container.as_ref(), &path)?;
            print_json(&sampling::sample(container.as_ref(), &path, config.max_samples))?;
        }
        Command::Preview {
            file,
            path,
            max_rows,
        } => {
            if let Some(n) = max_rows {
                config.max_rows = n;
            }
            let container = open(&file)?;
            let table = sampling::preview_table(container.as_ref(), &path, config.max_rows)?;
            print_json(&table)?;
        }
        Command::Info { file } => {
            print_json(&explorer::summarize_file(&file)?)?;
        }
        Command::Analyze {
            file,
            top,
            max_samples,
        } => {
            if let Some(n) = top {
                config.top_datasets = n;
            }
            if let Some(n) = max_samples {
                config.max_samples = n;
            }
            let container = open(&file)?;
            print_json(&explorer::analyze(container.as_ref(), &config)?)?;
        }
    }

    Ok(())
}

fn init_logging(log_path: Option<&Path>) -> Result<()> {
    // Set up logging to a file if --log is provided, otherwise to stderr via RUST_LOG
    if let Some(log_path) = log_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Rasscope");
    } else {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn open(path: &Path) -> Result<Box<dyn Container>> {
    ContainerReader::open(path).with_context(|| format!("Cannot open {}", path.display()))
}

fn ensure_exists(container: &dyn Container, path: &str) -> Result<()> {
    if container.exists(path) {
        Ok(())
    } else {
        Err(RasscopeError::not_found(path).into())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
