//! deephash command line tool
//!
//! Hashes and diffs JSON documents with the structural engine:
//! - Object key order never affects digests or diffs
//! - `null` values contribute nothing
//! - Differences are reported as field paths
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DEEPHASH_SEED`: xxh64 seed (default: 0), also `--seed`
//! - `RUST_LOG`: Log level filter (default: warn)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin deephash --features cli -- hash a.json b.json
//! cargo run --bin deephash --features cli -- diff a.json b.json --label config
//! ```
//!
//! `diff` exits with status 1 when the documents differ.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deephash::{DeepHasher, HashConfig};

#[derive(Parser, Debug)]
#[command(name = "deephash", version, about = "Structural hashing and diffing of JSON documents")]
struct Cli {
    /// Seed for the xxh64 accumulator
    #[arg(long, env = "DEEPHASH_SEED", default_value_t = 0, global = true)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the digest of each document
    Hash {
        /// JSON files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the field paths that differ between two documents
    Diff {
        /// Left-hand document
        left: PathBuf,
        /// Right-hand document
        right: PathBuf,
        /// Label for the document root
        #[arg(long, default_value = "")]
        label: String,
    },
    /// Print the canonical byte stream of a document in hex
    Bytes {
        /// JSON file to encode
        file: PathBuf,
    },
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn load(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("{}: {e}", path.display()))?;
    debug!(path = %path.display(), "document loaded");
    Ok(value)
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let hasher = DeepHasher::new(HashConfig {
        seed: cli.seed,
        ..HashConfig::default()
    });

    match cli.command {
        Command::Hash { files } => {
            for file in &files {
                let value = load(file)?;
                println!("{}  {}", hasher.hash(&value), file.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Diff { left, right, label } => {
            let left_value = load(&left)?;
            let right_value = load(&right)?;
            let differences = hasher.diff(&label, &left_value, &right_value)?;

            info!(
                left = %left.display(),
                right = %right.display(),
                differences = differences.len(),
                "documents compared"
            );

            for line in &differences {
                println!("{line}");
            }

            if differences.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }
        Command::Bytes { file } => {
            let value = load(&file)?;
            println!("{}", hex::encode(hasher.canonical_bytes(&value)));
            Ok(ExitCode::SUCCESS)
        }
    }
}
