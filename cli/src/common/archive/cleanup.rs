//! # dirzip Failure Cleanup (`common::archive::cleanup`)
//!
//! File: cli/src/common/archive/cleanup.rs
//!
//! ## Overview
//!
//! `OutputGuard` removes a partially written archive when an archiving run
//! fails. The guard is armed as soon as the output file has been created and
//! disarmed only after the session has been finalized and closed. Dropping an
//! armed guard deletes the file, so every early return (`?`) and unwinding
//! panic leaves no truncated archive behind.
//!
//! The guard must be declared *before* the session that owns the output
//! handle: locals drop in reverse order, so the handle is closed before the
//! file is removed.
//!
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Deletes `path` on drop unless [`OutputGuard::disarm`] was called.
#[derive(Debug)]
pub struct OutputGuard {
    path: PathBuf,
    armed: bool,
}

impl OutputGuard {
    pub fn arm(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keeps the file. Called once the archive is complete.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed incomplete archive {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Could not remove incomplete archive {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
