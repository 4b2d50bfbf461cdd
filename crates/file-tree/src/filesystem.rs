//! Filesystem tree provider
//!
//! Walks a directory and produces the [`TreeNode`] forest consumed by the
//! filter. Paths are absolute strings; directories always carry a children
//! list (possibly empty) and files never do.

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::node::TreeNode;

/// Directory names that are never listed
const ALWAYS_SKIPPED: &[&str] = &[".git"];

/// Options controlling a directory scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Include entries whose names start with a dot
    pub show_hidden: bool,
    /// Deepest level to descend into (0 = only the root's children)
    pub max_depth: Option<usize>,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include or exclude hidden entries.
    pub fn show_hidden(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }

    /// Limit the scan depth.
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Scan `root` and return its children as a forest (depth 0 at the top).
///
/// # Errors
///
/// Returns an error if the root doesn't exist or isn't a directory.
/// Unreadable subdirectories are logged and listed without children.
pub fn scan_directory(root: impl AsRef<Path>, options: &ScanOptions) -> Result<Vec<TreeNode>> {
    let root = absolute(root.as_ref())?;
    let metadata = fs::metadata(&root)
        .with_context(|| format!("Failed to read metadata for {}", root.display()))?;
    if !metadata.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let nodes = load_children(&root, 0, options)
        .with_context(|| format!("Failed to list {}", root.display()))?;
    debug!("Scanned {} top-level entries under {}", nodes.len(), root.display());
    Ok(nodes)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to resolve the current directory")?
            .join(path)
    };
    Ok(path.clean())
}

fn load_children(dir: &Path, depth: usize, options: &ScanOptions) -> Result<Vec<TreeNode>> {
    let mut nodes = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        if ALWAYS_SKIPPED.contains(&name.as_str()) {
            continue;
        }
        if !options.show_hidden && name.starts_with('.') {
            continue;
        }

        let entry_path = entry.path();
        let path = entry_path.to_string_lossy().to_string();
        let is_dir = entry.file_type()?.is_dir();

        if !is_dir {
            nodes.push(TreeNode::file(path, depth));
            continue;
        }

        let children = if options.max_depth.is_some_and(|max| depth >= max) {
            Vec::new()
        } else {
            match load_children(&entry_path, depth + 1, options) {
                Ok(children) => children,
                Err(e) => {
                    warn!("Skipping contents of {}: {:#}", entry_path.display(), e);
                    Vec::new()
                }
            }
        };
        nodes.push(TreeNode::directory(path, depth, children));
    }

    // Directories first, then files, alphabetically within each group
    nodes.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::walk_forest;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        // root/
        //   file1.txt
        //   .hidden
        //   dir1/
        //     file2.txt
        //     dir2/
        //       file3.txt
        fs::write(root.join("file1.txt"), "content1").unwrap();
        fs::write(root.join(".hidden"), "secret").unwrap();
        fs::create_dir(root.join("dir1")).unwrap();
        fs::write(root.join("dir1/file2.txt"), "content2").unwrap();
        fs::create_dir(root.join("dir1/dir2")).unwrap();
        fs::write(root.join("dir1/dir2/file3.txt"), "content3").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();

        temp
    }

    #[test]
    fn test_scan_structure() {
        let temp = create_test_tree();
        let nodes = scan_directory(temp.path(), &ScanOptions::new()).unwrap();

        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["dir1", "file1.txt"]);

        let dir1 = &nodes[0];
        assert!(dir1.is_directory);
        assert_eq!(dir1.depth, 0);
        assert_eq!(dir1.children[0].name, "dir2");
        assert_eq!(dir1.children[0].depth, 1);
        assert_eq!(dir1.children[0].children[0].depth, 2);
        assert_eq!(walk_forest(&nodes).count(), 5);
    }

    #[test]
    fn test_paths_are_absolute_and_prefixed() {
        let temp = create_test_tree();
        let nodes = scan_directory(temp.path(), &ScanOptions::new()).unwrap();

        for node in walk_forest(&nodes) {
            assert!(Path::new(&node.path).is_absolute());
            for child in &node.children {
                assert!(child.path.starts_with(&node.path));
            }
        }
    }

    #[test]
    fn test_hidden_entries() {
        let temp = create_test_tree();
        let nodes = scan_directory(temp.path(), &ScanOptions::new().show_hidden(true)).unwrap();

        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["dir1", ".hidden", "file1.txt"]);
    }

    #[test]
    fn test_max_depth() {
        let temp = create_test_tree();
        let nodes = scan_directory(temp.path(), &ScanOptions::new().max_depth(Some(0))).unwrap();

        let dir1 = &nodes[0];
        assert!(dir1.is_directory);
        assert!(dir1.children.is_empty());
    }

    #[test]
    fn test_scan_rejects_file() {
        let temp = create_test_tree();
        assert!(scan_directory(temp.path().join("file1.txt"), &ScanOptions::new()).is_err());
        assert!(scan_directory(temp.path().join("missing"), &ScanOptions::new()).is_err());
    }
}
