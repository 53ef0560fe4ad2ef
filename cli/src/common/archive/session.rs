//! # dirzip Archive Session (`common::archive::session`)
//!
//! File: cli/src/common/archive/session.rs
//!
//! ## Overview
//!
//! An `ArchiveSession` is one output archive under construction. It owns the
//! ZIP writer (which owns the output handle) and tracks the lifecycle:
//!
//! ```text
//! Created -> Populating -> Finalized -> Closed
//!    |            |            |
//!    +------------+------------+--> Failed
//! ```
//!
//! `Closed` and `Failed` are terminal. Finalizing writes the central
//! directory first and only then flushes and closes the output handle. A
//! failure to close (for example a delayed write error surfaced by `fsync`)
//! fails the session like any other finalization error.
//!
//! The session never deletes anything itself; removing a half-written file is
//! the job of the [`OutputGuard`](super::cleanup::OutputGuard) held by the
//! caller.
//!
use super::entry::EntryDescriptor;
use crate::core::error::{DirzipError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipWriter;

/// Lifecycle of an [`ArchiveSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Populating,
    Finalized,
    Closed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Failed)
    }
}

/// Destination of an archive.
///
/// `close` consumes the handle once the central directory is written and
/// reports anything the OS only notices at that point.
pub trait ArchiveOutput: Write + Seek {
    fn close(self) -> io::Result<()>;
}

impl ArchiveOutput for File {
    fn close(self) -> io::Result<()> {
        self.sync_all()
    }
}

impl ArchiveOutput for BufWriter<File> {
    fn close(self) -> io::Result<()> {
        self.into_inner().map_err(|e| e.into_error())?.sync_all()
    }
}

impl<T> ArchiveOutput for Cursor<T>
where
    Cursor<T>: Write + Seek,
{
    fn close(self) -> io::Result<()> {
        Ok(())
    }
}

/// One output archive being written to `W`.
pub struct ArchiveSession<W: ArchiveOutput> {
    output_path: PathBuf,
    writer: Option<ZipWriter<W>>,
    state: SessionState,
    compression_level: Option<i64>,
    entries: usize,
}

impl<W: ArchiveOutput> ArchiveSession<W> {
    /// Wraps an already created output handle. `output_path` is only used for
    /// messages and to recognize the archive if it appears inside the tree.
    pub fn new(
        output_path: impl Into<PathBuf>,
        output: W,
        compression_level: Option<i64>,
    ) -> Self {
        let output_path = output_path.into();
        debug!("Opened archive session for {}", output_path.display());
        Self {
            output_path,
            writer: Some(ZipWriter::new(output)),
            state: SessionState::Created,
            compression_level,
            entries: 0,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of entries started so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Marks the session as failed. The writer is kept so it is released
    /// when the session is dropped.
    pub fn fail(&mut self) {
        if self.state != SessionState::Closed {
            self.state = SessionState::Failed;
        }
    }

    /// # Start Archive Entry (`start_entry`)
    ///
    /// Adds the local header for `descriptor` and returns the writer its
    /// contents go to. Moves the session to `Populating`.
    ///
    /// ## Arguments
    ///
    /// * `descriptor` - Name, method, timestamp and size hint of the entry.
    ///
    /// ## Returns
    ///
    /// * `Result<&mut ZipWriter<W>>` - Writer positioned at the entry's data.
    ///
    /// ## Errors
    ///
    /// Returns `DirzipError::EntryCreation` if the session is finalized, closed
    /// or failed, or if the ZIP writer rejects the entry. A rejected entry also
    /// fails the session.
    pub fn start_entry(&mut self, descriptor: &EntryDescriptor) -> Result<&mut ZipWriter<W>> {
        if !matches!(self.state, SessionState::Created | SessionState::Populating) {
            return Err(DirzipError::EntryCreation {
                name: descriptor.name.clone(),
                reason: format!("archive session is {:?}", self.state),
            }
            .into());
        }
        let options = descriptor.file_options(self.compression_level);
        let Some(writer) = self.writer.as_mut() else {
            self.state = SessionState::Failed;
            return Err(DirzipError::EntryCreation {
                name: descriptor.name.clone(),
                reason: "archive writer already released".to_string(),
            }
            .into());
        };
        if let Err(e) = writer.start_file(descriptor.name.as_str(), options) {
            self.state = SessionState::Failed;
            return Err(DirzipError::EntryCreation {
                name: descriptor.name.clone(),
                reason: e.to_string(),
            }
            .into());
        }
        self.state = SessionState::Populating;
        self.entries += 1;
        Ok(writer)
    }

    /// # Finalize Archive (`finish`)
    ///
    /// Writes the central directory, then flushes and closes the output.
    ///
    /// ## Returns
    ///
    /// * `Result<usize>` - Number of entries in the finished archive.
    ///
    /// ## Errors
    ///
    /// Returns `DirzipError::Finalize` if the session cannot be finalized from
    /// its current state, or if writing the central directory, flushing, or
    /// closing the output fails. The session ends `Failed` in the latter cases.
    pub fn finish(&mut self) -> Result<usize> {
        if self.state.is_terminal() || self.state == SessionState::Finalized {
            return Err(self.finalize_error(format!("archive session is {:?}", self.state)));
        }
        let Some(writer) = self.writer.take() else {
            return Err(self.finalize_error("archive writer already released".to_string()));
        };

        let mut output = match writer.finish() {
            Ok(output) => output,
            Err(e) => {
                self.state = SessionState::Failed;
                return Err(self.finalize_error(e.to_string()));
            }
        };
        self.state = SessionState::Finalized;

        if let Err(e) = output.flush() {
            self.state = SessionState::Failed;
            return Err(self.finalize_error(e.to_string()));
        }
        if let Err(e) = output.close() {
            self.state = SessionState::Failed;
            return Err(self.finalize_error(e.to_string()));
        }
        self.state = SessionState::Closed;
        info!(
            "Finalized {} with {} entries",
            self.output_path.display(),
            self.entries
        );
        Ok(self.entries)
    }

    fn finalize_error(&self, reason: String) -> anyhow::Error {
        DirzipError::Finalize {
            path: self.output_path.clone(),
            reason,
        }
        .into()
    }
}
