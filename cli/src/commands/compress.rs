//! # dirzip Compress Command
//!
//! File: cli/src/commands/compress.rs
//!
//! ## Overview
//!
//! Implements the one thing dirzip does: compress the file or directory given
//! as the single positional argument into `<name>.zip`.
//!
//! ## Architecture
//!
//! 1. Load configuration (`.dirzip.toml`, user `config.toml`)
//! 2. Apply `--level` / `--output-dir` (or their environment variables) on top
//! 3. Hand off to `common::archive::compress_path`
//!
//! ## Examples
//!
//! ```bash
//! # Creates ./proj.zip with entries proj/...
//! dirzip path/to/proj
//!
//! # Creates /tmp/notes.txt.zip with a single entry notes.txt
//! dirzip --output-dir /tmp --level 9 notes.txt
//! ```
//!
use crate::common::archive::{compress_path, ArchiveOptions};
use crate::core::config::{self, Config};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// # Compress Arguments (`CompressArgs`)
///
/// Exactly one input path plus optional overrides for the configured output
/// directory and deflate level.
#[derive(Parser, Debug)]
pub struct CompressArgs {
    /// File or directory to compress.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Deflate level from 0 (fastest) to 9 (smallest).
    #[arg(
        short,
        long,
        env = "DIRZIP_LEVEL",
        value_parser = clap::value_parser!(i64).range(0..=config::MAX_COMPRESSION_LEVEL)
    )]
    pub level: Option<i64>,

    /// Directory to write the archive into. Defaults to the current directory.
    #[arg(short, long, env = "DIRZIP_OUTPUT_DIR", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl CompressArgs {
    /// Merges command-line overrides over the loaded configuration.
    fn archive_options(&self, cfg: &Config) -> ArchiveOptions {
        let defaults = ArchiveOptions::default();
        ArchiveOptions {
            output_dir: self
                .output_dir
                .clone()
                .or_else(|| cfg.archive.output_dir.as_ref().map(PathBuf::from))
                .unwrap_or(defaults.output_dir),
            compression_level: self.level.or(cfg.archive.compression_level),
        }
    }
}

/// # Handle Compress Command (`handle_compress`)
///
/// Builds the archive for `args.input`. On failure the incomplete archive has
/// already been removed by the time the error is returned.
pub fn handle_compress(args: CompressArgs) -> Result<()> {
    let cfg = config::load_config().context("Failed to load dirzip configuration")?;
    let options = args.archive_options(&cfg);
    debug!("Archive options: {:?}", options);

    let summary = compress_path(&args.input, &options)
        .with_context(|| format!("Failed to compress '{}'", args.input.display()))?;

    if summary.skipped > 0 {
        warn!(
            "{} path(s) could not be read and were left out of {}",
            summary.skipped,
            summary.output.display()
        );
    }
    info!(
        "Wrote {} ({} entries)",
        summary.output.display(),
        summary.entries
    );
    Ok(())
}
