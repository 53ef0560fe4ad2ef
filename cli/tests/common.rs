//! # dirzip CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each `.rs` file
//! in this directory (other than this module) is compiled as a separate test
//! crate that runs the built `dirzip` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// # Get dirzip Command (`dirzip_cmd`)
///
/// An `assert_cmd::Command` for the compiled `dirzip` binary.
///
/// ## Panics
/// Panics if the `dirzip` binary cannot be found via `Command::cargo_bin`.
pub fn dirzip_cmd() -> Command {
    Command::cargo_bin("dirzip").expect("Failed to find dirzip binary for testing")
}

/// # dirzip Command in a Working Directory (`dirzip_in`)
///
/// Runs from `dir` with configuration isolated to `dir`: the user config
/// directory points inside it and the `DIRZIP_*` variables are cleared.
pub fn dirzip_in(dir: &Path) -> Command {
    let mut cmd = dirzip_cmd();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("DIRZIP_LEVEL")
        .env_remove("DIRZIP_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Entry names of the archive at `path`, in central directory order.
pub fn entry_names(path: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(File::open(path).expect("open archive"))
        .expect("read archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect()
}

/// Decompressed bytes of entry `name` in the archive at `path`.
pub fn entry_bytes(path: &Path, name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(File::open(path).expect("open archive"))
        .expect("read archive");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut content = Vec::new();
    entry.read_to_end(&mut content).expect("read entry");
    content
}
