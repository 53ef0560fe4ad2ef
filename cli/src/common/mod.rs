//! # dirzip Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared functionality used by the command handlers. Today that is only the
//! archive pipeline; command-specific glue stays in `commands::`, foundational
//! infrastructure (errors, configuration) in `core::`.
//!

/// Creating ZIP archives from files and directory trees.
pub mod archive;
