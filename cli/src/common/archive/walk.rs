//! # dirzip Tree Walker (`common::archive::walk`)
//!
//! File: cli/src/common/archive/walk.rs
//!
//! ## Overview
//!
//! Archives every file below a directory root. Traversal is depth-first and
//! sorted by file name at each level, so a directory's contents are written
//! before its next sibling and the entry order is stable across runs.
//!
//! ## Architecture
//!
//! The walk is split in two:
//!
//! - **`traverse`** is a lazy iterator over the tree that yields either a
//!   [`TraversalNode`] or a `DirzipError::Enumeration` for a path the
//!   filesystem would not let us list. A failure to list the root itself is
//!   logged at debug level and dropped; the archive then simply has no entries.
//! - **`archive_nodes`** consumes any such iterator and applies the two failure
//!   policies: enumeration errors are logged as warnings and skipped, while
//!   any error from the file streamer aborts the walk.
//!
//! [`archive_tree`] connects the two for a directory on disk. Directories never
//! become entries; only leaf nodes are streamed.
//!
use super::entry::archive_name;
use super::session::{ArchiveOutput, ArchiveSession};
use super::stream::stream_file;
use crate::core::error::{DirzipError, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One filesystem node seen during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalNode {
    /// Path on disk, rooted at the traversal root.
    pub path: PathBuf,
    /// Path relative to the traversal root. Empty for the root itself.
    pub relative: PathBuf,
    pub depth: usize,
    pub is_dir: bool,
}

impl TraversalNode {
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// Counters reported by [`archive_nodes`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub files: usize,
    pub skipped: usize,
}

/// Item produced by [`traverse`].
pub type TraversalItem = std::result::Result<TraversalNode, DirzipError>;

/// Lazily enumerates `root` depth-first in file-name order.
///
/// Symbolic links are reported as they are and not followed.
pub fn traverse(root: &Path) -> impl Iterator<Item = TraversalItem> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |item| match item {
            Ok(entry) => {
                let relative = entry
                    .path()
                    .strip_prefix(root)
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                Some(Ok(TraversalNode {
                    is_dir: entry.file_type().is_dir(),
                    depth: entry.depth(),
                    relative,
                    path: entry.into_path(),
                }))
            }
            Err(err) if err.depth() == 0 => {
                debug!("Ignoring enumeration error on root {}: {}", root.display(), err);
                None
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                Some(Err(DirzipError::Enumeration {
                    path,
                    source: io::Error::from(err),
                }))
            }
        })
}

/// # Archive Traversal Nodes (`archive_nodes`)
///
/// Streams every non-root, non-directory node of `nodes` into `session` as
/// `<root_name>/<relative>` and prints each archived name to stdout.
///
/// ## Arguments
///
/// * `nodes` - Traversal results, normally from [`traverse`].
/// * `root_name` - First component of every entry name.
/// * `session` - The open archive session.
/// * `skip` - A path that must never be added, normally the archive being
///   written when it lives inside the tree.
///
/// ## Returns
///
/// * `Result<WalkStats>` - Files written and enumeration errors skipped.
///
/// ## Errors
///
/// `DirzipError::Enumeration` items are logged with `warn!`, counted in
/// `skipped` and do not stop the walk. Any error from naming or streaming a
/// node (`EntryCreation`, `Open`, `Copy`) is returned immediately.
pub fn archive_nodes<W, I>(
    nodes: I,
    root_name: &str,
    session: &mut ArchiveSession<W>,
    skip: Option<&Path>,
) -> Result<WalkStats>
where
    W: ArchiveOutput,
    I: IntoIterator<Item = TraversalItem>,
{
    let mut stats = WalkStats::default();

    for item in nodes {
        let node = match item {
            Ok(node) => node,
            Err(e @ DirzipError::Enumeration { .. }) => {
                warn!("{}", e);
                stats.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if node.is_root() || node.is_dir {
            continue;
        }
        if skip.is_some_and(|skip| skip == node.path) {
            debug!("Skipping the archive being written: {}", node.path.display());
            continue;
        }

        let name = archive_name(root_name, &node.relative)?;
        println!("{}", name);
        stream_file(&node.path, &name, session)?;
        stats.files += 1;
    }

    Ok(stats)
}

/// Walks the directory `root` and archives it with [`archive_nodes`].
pub fn archive_tree<W: ArchiveOutput>(
    root: &Path,
    root_name: &str,
    session: &mut ArchiveSession<W>,
    skip: Option<&Path>,
) -> Result<WalkStats> {
    archive_nodes(traverse(root), root_name, session, skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn build_tree(root: &Path) -> std::io::Result<()> {
        fs::create_dir_all(root.join("sub/deeper"))?;
        fs::create_dir_all(root.join("empty"))?;
        fs::write(root.join("x.txt"), "x")?;
        fs::write(root.join("b.txt"), "b")?;
        fs::write(root.join("sub/y.txt"), "y")?;
        fs::write(root.join("sub/deeper/z.txt"), "z")?;
        fs::write(root.join("zz.txt"), "zz")?;
        Ok(())
    }

    fn file_node(root: &Path, relative: &str) -> TraversalItem {
        let relative = PathBuf::from(relative);
        Ok(TraversalNode {
            path: root.join(&relative),
            depth: relative.components().count(),
            relative,
            is_dir: false,
        })
    }

    fn unlistable(root: &Path, relative: &str) -> TraversalItem {
        Err(DirzipError::Enumeration {
            path: root.join(relative),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        })
    }

    fn entry_names(buffer: Vec<u8>) -> Result<Vec<String>> {
        let mut archive = ZipArchive::new(Cursor::new(buffer))?;
        let mut names = Vec::new();
        for i in 0..archive.len() {
            names.push(archive.by_index(i)?.name().to_string());
        }
        Ok(names)
    }

    #[test]
    fn test_traverse_is_depth_first_and_sorted() -> Result<()> {
        let temp_dir = tempdir()?;
        build_tree(temp_dir.path())?;

        let relatives: Vec<String> = traverse(temp_dir.path())
            .map(|item| item.map(|node| node.relative.to_string_lossy().replace('\\', "/")))
            .collect::<std::result::Result<_, _>>()?;
        assert_eq!(
            relatives,
            vec![
                "",
                "b.txt",
                "empty",
                "sub",
                "sub/deeper",
                "sub/deeper/z.txt",
                "sub/y.txt",
                "x.txt",
                "zz.txt",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_traverse_drops_root_enumeration_error() {
        let temp_dir = tempdir().expect("temp dir");
        let missing = temp_dir.path().join("gone");
        assert_eq!(traverse(&missing).count(), 0);
    }

    #[test]
    fn test_traverse_marks_root_and_directories() -> Result<()> {
        let temp_dir = tempdir()?;
        build_tree(temp_dir.path())?;

        let nodes: Vec<TraversalNode> =
            traverse(temp_dir.path()).collect::<std::result::Result<_, _>>()?;
        assert!(nodes[0].is_root());
        assert!(nodes[0].is_dir);
        let sub = nodes
            .iter()
            .find(|n| n.relative == Path::new("sub"))
            .expect("sub directory visited");
        assert!(sub.is_dir);
        assert_eq!(sub.depth, 1);
        Ok(())
    }

    #[test]
    fn test_archive_tree_writes_only_files() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path().join("proj");
        build_tree(&root)?;

        let mut buffer = Vec::new();
        let stats = {
            let mut session = ArchiveSession::new("proj.zip", Cursor::new(&mut buffer), None);
            let stats = archive_tree(&root, "proj", &mut session, None)?;
            session.finish()?;
            stats
        };

        assert_eq!(stats, WalkStats { files: 5, skipped: 0 });
        assert_eq!(
            entry_names(buffer)?,
            vec![
                "proj/b.txt",
                "proj/sub/deeper/z.txt",
                "proj/sub/y.txt",
                "proj/x.txt",
                "proj/zz.txt",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_archive_tree_skips_output_path() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path().join("proj");
        build_tree(&root)?;
        let own_output = root.join("proj.zip");
        fs::write(&own_output, "not yet an archive")?;

        let mut buffer = Vec::new();
        {
            let mut session = ArchiveSession::new(&own_output, Cursor::new(&mut buffer), None);
            archive_tree(&root, "proj", &mut session, Some(&own_output))?;
            session.finish()?;
        }
        assert!(!entry_names(buffer)?.contains(&"proj/proj.zip".to_string()));
        Ok(())
    }

    #[test]
    fn test_empty_directory_produces_empty_archive() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut buffer = Vec::new();
        {
            let mut session = ArchiveSession::new("e.zip", Cursor::new(&mut buffer), None);
            let stats = archive_tree(temp_dir.path(), "e", &mut session, None)?;
            assert_eq!(stats, WalkStats::default());
            session.finish()?;
        }
        assert!(entry_names(buffer)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_enumeration_error_is_skipped_and_counted() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "a")?;
        fs::write(root.join("z.txt"), "z")?;

        let nodes = vec![
            file_node(root, "a.txt"),
            unlistable(root, "locked"),
            file_node(root, "z.txt"),
        ];
        let mut buffer = Vec::new();
        let stats = {
            let mut session = ArchiveSession::new("proj.zip", Cursor::new(&mut buffer), None);
            let stats = archive_nodes(nodes, "proj", &mut session, None)?;
            session.finish()?;
            stats
        };

        assert_eq!(stats, WalkStats { files: 2, skipped: 1 });
        assert_eq!(entry_names(buffer)?, vec!["proj/a.txt", "proj/z.txt"]);
        Ok(())
    }

    #[test]
    fn test_every_enumeration_error_is_tolerated() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();

        let nodes = vec![unlistable(root, "one"), unlistable(root, "two")];
        let mut buffer = Vec::new();
        {
            let mut session = ArchiveSession::new("e.zip", Cursor::new(&mut buffer), None);
            let stats = archive_nodes(nodes, "e", &mut session, None)?;
            assert_eq!(stats, WalkStats { files: 0, skipped: 2 });
            session.finish()?;
        }
        assert!(entry_names(buffer)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unopenable_file_aborts_walk() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::write(root.join("b.txt"), "b")?;
        fs::write(root.join("d.txt"), "d")?;

        // c.txt is listed but gone by the time it is opened.
        let nodes = vec![
            file_node(root, "b.txt"),
            file_node(root, "c.txt"),
            file_node(root, "d.txt"),
        ];
        let mut session = ArchiveSession::new("proj.zip", Cursor::new(Vec::new()), None);
        let err = archive_nodes(nodes, "proj", &mut session, None).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DirzipError>(),
            Some(DirzipError::Open { path, .. }) if path.ends_with("c.txt")
        ));
        assert_eq!(session.entries(), 1);
        Ok(())
    }

    #[test]
    fn test_non_enumeration_item_error_aborts_walk() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "a")?;

        let nodes = vec![
            Err(DirzipError::InvalidInput("broken node".to_string())),
            file_node(root, "a.txt"),
        ];
        let mut session = ArchiveSession::new("proj.zip", Cursor::new(Vec::new()), None);
        assert!(archive_nodes(nodes, "proj", &mut session, None).is_err());
        assert_eq!(session.entries(), 0);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir()?;
        let root = temp_dir.path().join("proj");
        build_tree(&root)?;
        let locked = root.join("locked");
        fs::create_dir(&locked)?;
        fs::write(locked.join("secret.txt"), "secret")?;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

        // Root ignores permission bits; the policy itself is covered above.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
            return Ok(());
        }

        let mut buffer = Vec::new();
        let result = {
            let mut session = ArchiveSession::new("proj.zip", Cursor::new(&mut buffer), None);
            let result = archive_tree(&root, "proj", &mut session, None);
            if result.is_ok() {
                session.finish()?;
            }
            result
        };
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;

        let stats = result?;
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.files, 5);
        let names = entry_names(buffer)?;
        assert!(names.contains(&"proj/x.txt".to_string()));
        assert!(!names.iter().any(|n| n.contains("secret")));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_aborts_walk() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path().join("proj");
        build_tree(&root)?;
        std::os::unix::fs::symlink(root.join("missing"), root.join("c_link"))?;

        let mut session = ArchiveSession::new("proj.zip", Cursor::new(Vec::new()), None);
        let err = archive_tree(&root, "proj", &mut session, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DirzipError>(),
            Some(DirzipError::Open { .. })
        ));
        // b.txt sorts before c_link and was already written.
        assert_eq!(session.entries(), 1);
        Ok(())
    }
}
