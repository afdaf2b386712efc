//! Walker - lazy pre-order traversal of a path

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FinfoError, Result};

use super::config::WalkerConfig;
use super::utils::should_include_path;

/// One step of a walk: a path and how deep it sits below the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub depth: usize,
    /// Symlink whose target is one of its own ancestors; never descended.
    pub is_cycle: bool,
    /// Why the directory listing could not be read, if it could not.
    pub list_error: Option<String>,
}

impl WalkEntry {
    fn new(path: PathBuf, depth: usize) -> Self {
        Self {
            path,
            depth,
            is_cycle: false,
            list_error: None,
        }
    }
}

/// Walks a root path according to a [`WalkerConfig`].
///
/// The walker only holds configuration; every call to [`Walker::walk`]
/// starts an independent traversal.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Start walking `root`. Fails if the root itself cannot be stat'ed.
    pub fn walk(&self, root: &Path) -> Result<Walk> {
        root.symlink_metadata()
            .map_err(|e| FinfoError::from_io(root, e))?;

        Ok(Walk {
            config: self.config.clone(),
            pending_root: Some(root.to_path_buf()),
            stack: Vec::new(),
        })
    }
}

/// Walk `root` with default settings and an optional depth limit.
pub fn walk(root: &Path, max_depth: Option<usize>) -> Result<Walk> {
    Walker::new(WalkerConfig {
        max_depth,
        ..Default::default()
    })
    .walk(root)
}

/// A directory whose children are still being yielded.
struct Frame {
    children: std::vec::IntoIter<PathBuf>,
    depth: usize,
    canonical: Option<PathBuf>,
}

/// Lazy iterator over a walk. Parents come before their children and
/// siblings come in lexical order.
///
/// Listings are read in full when their directory is yielded, so no
/// directory handle stays open between calls to `next`.
pub struct Walk {
    config: WalkerConfig,
    pending_root: Option<PathBuf>,
    stack: Vec<Frame>,
}

impl Walk {
    fn at_max_depth(&self, depth: usize) -> bool {
        self.config.max_depth.is_some_and(|max| depth >= max)
    }

    fn is_ancestor(&self, canonical: &Path) -> bool {
        self.stack
            .iter()
            .any(|frame| frame.canonical.as_deref() == Some(canonical))
    }

    fn visit(&mut self, path: PathBuf, depth: usize) -> WalkEntry {
        let mut entry = WalkEntry::new(path, depth);

        let Ok(link_meta) = entry.path.symlink_metadata() else {
            return entry;
        };
        let is_symlink = link_meta.file_type().is_symlink();

        // The root is always followed; below it only when configured.
        let is_dir = if is_symlink {
            (depth == 0 || self.config.follow_symlinks) && entry.path.is_dir()
        } else {
            link_meta.is_dir()
        };

        if !is_dir || self.at_max_depth(depth) {
            return entry;
        }

        let canonical = fs::canonicalize(&entry.path).ok();
        if is_symlink {
            match canonical.as_deref() {
                Some(target) if self.is_ancestor(target) => {
                    debug!(path = %entry.path.display(), "symlink cycle, not descending");
                    entry.is_cycle = true;
                    return entry;
                }
                Some(_) => {}
                None => return entry,
            }
        }

        match read_children(&entry.path, &self.config) {
            Ok(children) => self.stack.push(Frame {
                children: children.into_iter(),
                depth,
                canonical,
            }),
            Err(err) => {
                debug!(path = %entry.path.display(), error = %err, "cannot list directory");
                entry.list_error = Some(FinfoError::from_io(&entry.path, err).reason());
            }
        }

        entry
    }
}

impl Iterator for Walk {
    type Item = WalkEntry;

    fn next(&mut self) -> Option<WalkEntry> {
        if let Some(root) = self.pending_root.take() {
            return Some(self.visit(root, 0));
        }

        loop {
            let frame = self.stack.last_mut()?;
            match frame.children.next() {
                Some(child) => {
                    let depth = frame.depth + 1;
                    return Some(self.visit(child, depth));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Read, filter, and sort the children of a directory.
fn read_children(path: &Path, config: &WalkerConfig) -> io::Result<Vec<PathBuf>> {
    let (mut entries, skipped) = readable_entries(fs::read_dir(path)?, path);
    if skipped > 0 {
        debug!(dir = %path.display(), skipped, "listing had unreadable entries");
    }
    entries.sort_by_key(|a| a.file_name());

    Ok(entries
        .into_iter()
        .map(|entry| entry.path())
        .filter(|child| should_include_path(child, child.is_dir(), config))
        .collect())
}

/// Keep the readable entries of a listing and count the rest.
fn readable_entries<T>(listing: impl Iterator<Item = io::Result<T>>, dir: &Path) -> (Vec<T>, usize) {
    let mut entries = Vec::new();
    let mut skipped = 0;
    for entry in listing {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "skipping directory entry");
                skipped += 1;
            }
        }
    }
    (entries, skipped)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn names(entries: &[WalkEntry], root: &Path) -> Vec<(String, usize)> {
        entries
            .iter()
            .map(|e| {
                let rel = e.path.strip_prefix(root).unwrap();
                (rel.to_string_lossy().to_string(), e.depth)
            })
            .collect()
    }

    fn sample_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/c/d")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b/c/d/deep.txt"), "deep").unwrap();
        fs::write(dir.path().join("b/z.txt"), "z").unwrap();
        fs::write(dir.path().join("c.txt"), "c").unwrap();
        dir
    }

    #[test]
    fn test_single_file_yields_one_entry() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("hello");
        fs::write(&file, "hello").unwrap();

        let entries: Vec<_> = walk(&file, None).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, file);
        assert_eq!(entries[0].depth, 0);
    }

    #[test]
    fn test_preorder_lexical_order() {
        let dir = sample_dir();
        let entries: Vec<_> = walk(dir.path(), None).unwrap().collect();

        assert_eq!(
            names(&entries, dir.path()),
            vec![
                ("".to_string(), 0),
                ("a.txt".to_string(), 1),
                ("b".to_string(), 1),
                ("b/c".to_string(), 2),
                ("b/c/d".to_string(), 3),
                ("b/c/d/deep.txt".to_string(), 4),
                ("b/z.txt".to_string(), 2),
                ("c.txt".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_child_depth_is_parent_plus_one() {
        let dir = sample_dir();
        let entries: Vec<_> = walk(dir.path(), None).unwrap().collect();

        for entry in entries.iter().skip(1) {
            let parent = entry.path.parent().unwrap();
            let parent_entry = entries.iter().find(|e| e.path == parent).unwrap();
            assert_eq!(entry.depth, parent_entry.depth + 1);
        }
        assert!(entries.iter().any(|e| e.depth >= 3));
    }

    #[test]
    fn test_max_depth_limits_descent() {
        let dir = sample_dir();
        let entries: Vec<_> = walk(dir.path(), Some(1)).unwrap().collect();

        assert!(entries.iter().all(|e| e.depth <= 1));
        assert_eq!(entries.len(), 4);

        let root_only: Vec<_> = walk(dir.path(), Some(0)).unwrap().collect();
        assert_eq!(root_only.len(), 1);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let entries: Vec<_> = walk(dir.path(), None).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].list_error.is_none());
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = walk(&dir.path().join("missing"), None);
        assert!(matches!(result, Err(FinfoError::NotFound(_))));
    }

    #[test]
    fn test_walk_is_restartable() {
        let dir = sample_dir();
        let walker = Walker::default();
        let first: Vec<_> = walker.walk(dir.path()).unwrap().collect();
        let second: Vec<_> = walker.walk(dir.path()).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ignore_patterns_and_dirs_only() {
        let dir = sample_dir();
        let walker = Walker::new(WalkerConfig {
            ignore_patterns: vec!["c*".to_string()],
            ..Default::default()
        });
        let entries: Vec<_> = walker.walk(dir.path()).unwrap().collect();
        assert_eq!(
            names(&entries, dir.path()),
            vec![
                ("".to_string(), 0),
                ("a.txt".to_string(), 1),
                ("b".to_string(), 1),
                ("b/z.txt".to_string(), 2),
            ]
        );

        let walker = Walker::new(WalkerConfig {
            dirs_only: true,
            ..Default::default()
        });
        let entries: Vec<_> = walker.walk(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.path.is_dir()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_yielded_not_descended() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/file.txt"), "x").unwrap();
        symlink("..", dir.path().join("sub/parent")).unwrap();

        let entries: Vec<_> = walk(dir.path(), None).unwrap().collect();
        let link = entries
            .iter()
            .find(|e| e.path.ends_with("parent"))
            .expect("symlink should be yielded");
        assert!(link.is_cycle);
        assert_eq!(entries.len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_sibling_dir_is_followed() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("real/inner.txt"), "x").unwrap();
        symlink(dir.path().join("real"), dir.path().join("zlink")).unwrap();

        let entries: Vec<_> = walk(dir.path(), None).unwrap().collect();
        assert!(
            entries
                .iter()
                .any(|e| e.path.ends_with("zlink/inner.txt") && e.depth == 2)
        );

        let walker = Walker::new(WalkerConfig {
            follow_symlinks: false,
            ..Default::default()
        });
        let entries: Vec<_> = walker.walk(dir.path()).unwrap().collect();
        assert!(!entries.iter().any(|e| e.path.ends_with("zlink/inner.txt")));
        assert!(entries.iter().any(|e| e.path.ends_with("zlink")));
    }

    #[test]
    fn test_unreadable_listing_entries_are_counted() {
        let listing = vec![
            Ok("a"),
            Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            Ok("b"),
        ];
        let (entries, skipped) = readable_entries(listing.into_iter(), Path::new("/d"));
        assert_eq!(entries, vec!["a", "b"]);
        assert_eq!(skipped, 1);
    }
}
