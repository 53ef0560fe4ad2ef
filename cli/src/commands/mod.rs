//! # dirzip Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! dirzip has a single command, so `main.rs` flattens its arguments into the
//! top-level parser instead of routing through subcommands. The handler still
//! lives here, next to its argument struct, so adding a second command later
//! only means adding a sibling module.
//!

/// Compress a file or directory into `<name>.zip`.
pub mod compress;
