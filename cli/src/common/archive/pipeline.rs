//! # dirzip Archive Pipeline (`common::archive::pipeline`)
//!
//! File: cli/src/common/archive/pipeline.rs
//!
//! ## Overview
//!
//! `compress_path` is the single entry point used by the CLI. For one input
//! path it:
//!
//! 1. derives the root name from the input's last path component and the
//!    output path `<output_dir>/<root name>.zip`,
//! 2. creates the output file and arms an [`OutputGuard`] for it,
//! 3. inspects the input and either walks the directory or streams the
//!    single file,
//! 4. finalizes the archive and disarms the guard.
//!
//! Any error after step 2 drops the session (closing the output handle) and
//! then the guard (deleting the incomplete archive) before it reaches the
//! caller.
//!
use super::cleanup::OutputGuard;
use super::session::{ArchiveOutput, ArchiveSession};
use super::stream::stream_file;
use super::walk::archive_tree;
use crate::core::error::{DirzipError, Result};
use anyhow::Context;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension appended to the root name to form the archive file name.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Knobs for a single archiving run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Directory the archive is created in.
    pub output_dir: PathBuf,
    /// Deflate level; `None` keeps the library default.
    pub compression_level: Option<i64>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            compression_level: None,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub output: PathBuf,
    pub entries: usize,
    /// Paths that could not be enumerated and were left out.
    pub skipped: usize,
}

/// Name used for the archive file and as the prefix of every entry.
///
/// Uses the last component of `input`; inputs without one (`.`, `..`) are
/// canonicalized first.
pub fn root_name(input: &Path) -> Result<String> {
    let resolved;
    let file_name = match input.file_name() {
        Some(name) => name,
        None => {
            resolved = fs::canonicalize(input).map_err(|source| DirzipError::Stat {
                path: input.to_path_buf(),
                source,
            })?;
            resolved.file_name().ok_or_else(|| {
                DirzipError::InvalidInput(format!(
                    "'{}' has no final path component to name the archive after",
                    input.display()
                ))
            })?
        }
    };
    file_name.to_str().map(str::to_owned).ok_or_else(|| {
        DirzipError::InvalidInput(format!("'{}' is not valid UTF-8", input.display())).into()
    })
}

/// `<output_dir>/<root_name>.zip`
pub fn output_path_for(root_name: &str, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", root_name, ARCHIVE_EXTENSION))
}

/// # Compress Path (`compress_path`)
///
/// Archives the file or directory `input` into `<output_dir>/<name>.zip`,
/// writing through a buffered file that is synced to disk before success is
/// reported.
///
/// ## Arguments
///
/// * `input` - File or directory to archive.
/// * `options` - Output directory and deflate level.
///
/// ## Returns
///
/// * `Result<ArchiveSummary>` - Output path, entry count and skipped paths.
///
/// ## Errors
///
/// Returns the first fatal `DirzipError` (`Stat`, `CreateOutput`, `Open`,
/// `EntryCreation`, `Copy`, `Finalize`, `InvalidInput`). When the output file
/// was already created it is removed before the error is returned.
pub fn compress_path(input: &Path, options: &ArchiveOptions) -> Result<ArchiveSummary> {
    compress_path_with(input, options, |path| File::create(path).map(BufWriter::new))
}

/// Same as [`compress_path`], with the output handle produced by `create`.
pub fn compress_path_with<W, F>(
    input: &Path,
    options: &ArchiveOptions,
    create: F,
) -> Result<ArchiveSummary>
where
    W: ArchiveOutput,
    F: FnOnce(&Path) -> io::Result<W>,
{
    let root_name = root_name(input)?;
    let output_path = output_path_for(&root_name, &options.output_dir);
    info!(
        "Archiving {} into {}",
        input.display(),
        output_path.display()
    );

    let output = create(&output_path).map_err(|source| DirzipError::CreateOutput {
        path: output_path.clone(),
        source,
    })?;
    // Declared before the session so the handle is closed before removal.
    let guard = OutputGuard::arm(&output_path);
    debug!("Created {}", guard.path().display());
    let mut session = ArchiveSession::new(&output_path, output, options.compression_level);

    let skipped = match populate(input, &root_name, &mut session) {
        Ok(skipped) => skipped,
        Err(e) => {
            session.fail();
            debug!(
                "Archive session ended {:?} after {} entries",
                session.state(),
                session.entries()
            );
            return Err(e);
        }
    };
    let entries = session.finish()?;
    drop(session);
    guard.disarm();

    Ok(ArchiveSummary {
        output: output_path,
        entries,
        skipped,
    })
}

/// Fills the session from `input`. Returns the number of skipped paths.
fn populate<W: ArchiveOutput>(
    input: &Path,
    root_name: &str,
    session: &mut ArchiveSession<W>,
) -> Result<usize> {
    let metadata = fs::metadata(input).map_err(|source| DirzipError::Stat {
        path: input.to_path_buf(),
        source,
    })?;

    if metadata.is_dir() {
        // Walk the resolved path so node paths compare equal to the resolved output path.
        let walk_root = fs::canonicalize(input).unwrap_or_else(|_| input.to_path_buf());
        let own_output = own_output_path(session.output_path());
        let stats = archive_tree(&walk_root, root_name, session, own_output.as_deref())
            .with_context(|| format!("Failed to archive directory '{}'", input.display()))?;
        debug!("Walked {}: {:?}", input.display(), stats);
        Ok(stats.skipped)
    } else {
        println!("{}", root_name);
        stream_file(input, root_name, session)?;
        Ok(0)
    }
}

/// The output file's path as it would appear in a walk of the tree it may sit
/// in. Only resolvable once the file exists.
fn own_output_path(output: &Path) -> Option<PathBuf> {
    fs::canonicalize(output).ok()
}
