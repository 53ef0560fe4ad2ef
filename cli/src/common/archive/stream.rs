//! # dirzip File Streamer (`common::archive::stream`)
//!
//! File: cli/src/common/archive/stream.rs
//!
//! ## Overview
//!
//! Copies one source file into a new deflate entry of an open
//! [`ArchiveSession`]. The source is opened before the entry is created, so a
//! missing or unreadable file never leaves an empty entry behind.
//!
//! Every failure here is fatal for the whole run:
//! - `DirzipError::Open` when the source cannot be opened
//! - `DirzipError::EntryCreation` when the session refuses the entry
//! - `DirzipError::Copy` when streaming stops partway
//!
use super::entry::EntryDescriptor;
use super::session::{ArchiveOutput, ArchiveSession};
use crate::core::error::{DirzipError, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// # Stream File Into Archive (`stream_file`)
///
/// Opens `source` and copies its bytes into a new entry called `name`. The
/// source size is read up front so files of 4 GiB or more get zip64 headers.
///
/// ## Arguments
///
/// * `source` - Path of the file to read.
/// * `name` - Entry name inside the archive.
/// * `session` - The open archive session receiving the entry.
///
/// ## Returns
///
/// * `Result<u64>` - Number of uncompressed bytes copied. The source handle is
///   dropped before returning on every path.
///
/// ## Errors
///
/// - `DirzipError::Open` when the source cannot be opened or inspected.
/// - `DirzipError::EntryCreation` when the session refuses the entry.
/// - `DirzipError::Copy` when reading or compressing stops partway.
pub fn stream_file<W: ArchiveOutput>(
    source: &Path,
    name: &str,
    session: &mut ArchiveSession<W>,
) -> Result<u64> {
    let opened = File::open(source).and_then(|file| {
        let len = file.metadata()?.len();
        Ok((file, len))
    });
    let (mut file_in, len) = opened.map_err(|e| {
        session.fail();
        DirzipError::Open {
            path: source.to_path_buf(),
            source: e,
        }
    })?;

    let descriptor = EntryDescriptor::new(name).with_size(len);
    let result = match session.start_entry(&descriptor) {
        Ok(entry) => io::copy(&mut file_in, entry),
        Err(e) => return Err(e),
    };

    match result {
        Ok(bytes) => {
            debug!("Added {} ({} bytes)", name, bytes);
            Ok(bytes)
        }
        Err(e) => {
            session.fail();
            Err(DirzipError::Copy {
                name: name.to_string(),
                source: e,
            }
            .into())
        }
    }
}
