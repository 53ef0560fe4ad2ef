//! # dirzip Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout dirzip. Failures in the
//! archive pipeline are raised as specific `DirzipError` variants and carried
//! inside `anyhow::Error`, so callers can add context with `anyhow::Context`
//! while tests and the walk loop can still inspect the concrete kind with
//! `downcast_ref`.
//!
//! ## Architecture
//!
//! - `DirzipError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! Only `DirzipError::Enumeration` is recovered locally (the tree walker logs it
//! and keeps going). Every other variant is fatal: it propagates to `main`, the
//! partially written archive is removed, and the process exits non-zero.
//!
//! ## Examples
//!
//! ```rust
//! let file = File::open(path).map_err(|source| DirzipError::Open {
//!     path: path.to_path_buf(),
//!     source,
//! })?;
//!
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<DirzipError>(), Some(DirzipError::Stat { .. })) => {
//!         println!("input does not exist");
//!     }
//!     other => other?,
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the dirzip application.
#[derive(Error, Debug)]
pub enum DirzipError {
    #[error("Cannot inspect input '{}': {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output archive '{}': {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open '{}' for reading: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not add {}: {source}", .path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create archive entry '{name}': {reason}")]
    EntryCreation { name: String, reason: String },

    #[error("compressing file {name}: {source}")]
    Copy {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot finalize archive '{}': {reason}", .path.display())]
    Finalize { path: PathBuf, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
