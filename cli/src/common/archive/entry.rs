//! # dirzip Entry Encoder (`common::archive::entry`)
//!
//! File: cli/src/common/archive/entry.rs
//!
//! ## Overview
//!
//! Builds the normalized header for every entry written to an archive. All
//! entries use deflate and carry the same modification time, 2000-01-01
//! 00:00:00, regardless of the source file's metadata. Two builds of the same
//! tree therefore produce byte-identical archives.
//!
//! This module also turns a traversal-relative path into the forward-slash
//! name stored in the archive (`<root>/<dir>/<file>`).
//!
use crate::core::error::{DirzipError, Result};
use std::path::{Component, Path};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime};

/// Calendar date stamped on every entry: (year, month, day).
pub const FIXED_MODIFIED_DATE: (u16, u8, u8) = (2000, 1, 1);

/// Sources this large or larger need zip64 size fields.
pub const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Header fields for one archive entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDescriptor {
    pub name: String,
    pub method: CompressionMethod,
    pub modified: DateTime,
    /// Uncompressed size of the source, when known before writing.
    pub size: u64,
}

impl EntryDescriptor {
    /// Creates a descriptor for `name` with deflate and the fixed timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: CompressionMethod::Deflated,
            modified: fixed_modified_time(),
            size: 0,
        }
    }

    /// Records the source size so large entries get zip64 headers.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn needs_zip64(&self) -> bool {
        self.size >= ZIP64_THRESHOLD
    }

    /// Per-entry writer options. `level` of `None` keeps the deflate default.
    ///
    /// Only entries at or above [`ZIP64_THRESHOLD`] are marked as large files,
    /// so ordinary archives keep their plain 32-bit headers.
    pub fn file_options(&self, level: Option<i64>) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.method)
            .compression_level(level)
            .last_modified_time(self.modified)
            .large_file(self.needs_zip64())
    }
}

/// 2000-01-01 00:00:00 as a DOS timestamp.
pub fn fixed_modified_time() -> DateTime {
    let (year, month, day) = FIXED_MODIFIED_DATE;
    // 2000-01-01 is inside the DOS date range (1980-2107).
    DateTime::from_date_and_time(year, month, day, 0, 0, 0).unwrap_or_default()
}

/// # Build Archive Entry Name (`archive_name`)
///
/// Joins `root_name` and every normal component of `relative` with `/`.
/// `.` components are dropped, so `./x.txt` under `proj` becomes `proj/x.txt`.
///
/// ## Arguments
///
/// * `root_name` - Base name of the archived input, used as the first component.
/// * `relative` - Path of the node relative to the traversal root. May be empty.
///
/// ## Returns
///
/// * `Result<String>` - The forward-slash entry name.
///
/// ## Errors
///
/// Returns `DirzipError::EntryCreation` when a component is not valid UTF-8 or
/// when the result would be empty.
pub fn archive_name(root_name: &str, relative: &Path) -> Result<String> {
    let mut name = String::from(root_name);
    for component in relative.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        let part = part.to_str().ok_or_else(|| DirzipError::EntryCreation {
            name: format!("{}/{}", root_name, relative.display()),
            reason: "path is not valid UTF-8".to_string(),
        })?;
        if !name.is_empty() {
            name.push('/');
        }
        name.push_str(part);
    }
    if name.is_empty() {
        return Err(DirzipError::EntryCreation {
            name,
            reason: "entry name is empty".to_string(),
        }
        .into());
    }
    Ok(name)
}
