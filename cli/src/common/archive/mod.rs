//! # dirzip Archive Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Everything needed to turn a file or directory tree into a reproducible
//! deflate ZIP archive.
//!
//! ## Architecture
//!
//! Submodules, leaves first:
//!
//! - **`entry`**: Entry Encoder. Normalized per-entry header (deflate, fixed
//!   2000-01-01 timestamp) and forward-slash entry names.
//! - **`stream`**: File Streamer. Copies one source file into one entry.
//! - **`walk`**: Tree Walker. Lazy depth-first traversal plus the loop that
//!   tolerates enumeration errors and aborts on streaming errors.
//! - **`session`**: Archive Session. Owns the ZIP writer and its lifecycle.
//! - **`cleanup`**: Failure policy. Removes incomplete output on drop.
//! - **`pipeline`**: Ties the above together behind `compress_path`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{compress_path, ArchiveOptions};
//! use std::path::Path;
//!
//! # fn run() -> anyhow::Result<()> {
//! let summary = compress_path(Path::new("./my_project"), &ArchiveOptions::default())?;
//! println!("{} entries in {}", summary.entries, summary.output.display());
//! # Ok(())
//! # }
//! ```
//!

pub mod cleanup;
pub mod entry;
pub mod pipeline;
pub mod session;
pub mod stream;
pub mod walk;

pub use pipeline::{compress_path, ArchiveOptions};
