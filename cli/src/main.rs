//! # dirzip Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the dirzip CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Running the compress command and mapping failures to an exit status
//!
//! ## Examples
//!
//! ```bash
//! # Compress a directory into ./proj.zip
//! dirzip proj
//!
//! # Same, with progress details on stderr
//! dirzip -vv proj
//! ```
//!
//! Exit status: 0 on success, 1 when archiving fails, 2 for usage errors
//! (reported by Clap before any file is touched).
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers.
mod common; // Archive pipeline.
mod core; // Errors and configuration.

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "dirzip",
    about = "Compress file or directory INPUT, appending '.zip' to the name of the compressed file",
    long_about = "Compress file or directory INPUT into INPUT.zip in the current directory.\n\
                  Directories are stored as <name>/<relative path> entries; every entry is\n\
                  deflate-compressed and stamped 2000-01-01 so identical input gives\n\
                  identical archives.",
    version
)]
struct Cli {
    #[command(flatten)]
    args: commands::compress::CompressArgs,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::compress::handle_compress(cli.args) {
        tracing::debug!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
