//! File and directory nodes of a project listing

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::path;

/// The type/kind of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A directory - can have children
    Directory,
    /// A file - never has children
    File,
}

impl NodeKind {
    pub const fn is_directory(self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    pub const fn is_file(self) -> bool {
        matches!(self, NodeKind::File)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Directory => write!(f, "Directory"),
            NodeKind::File => write!(f, "File"),
        }
    }
}

/// A file or directory in a tree snapshot
///
/// Paths are unique within one snapshot. A directory's children are expected
/// to be prefixed by the directory's path plus a separator; this is supplied
/// by the tree provider and not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Absolute or project-relative path
    pub path: String,
    /// Display name (last path segment)
    pub name: String,
    pub is_directory: bool,
    /// Distance from the tree root
    pub depth: usize,
    /// Children in display order; always empty for files
    #[serde(default, deserialize_with = "lenient_children")]
    pub children: Vec<TreeNode>,
    /// Synthetic node for a path git reports as deleted but which is not on disk
    #[serde(default)]
    pub is_deleted: bool,
}

/// Accept a missing, null or non-array `children` value as "no children"
fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<TreeNode>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeChildren {
        List(Vec<TreeNode>),
        Other(IgnoredAny),
    }

    Ok(match MaybeChildren::deserialize(deserializer)? {
        MaybeChildren::List(children) => children,
        MaybeChildren::Other(_) => Vec::new(),
    })
}

impl TreeNode {
    /// Create a file node; the name is taken from the path
    pub fn file(path: impl Into<String>, depth: usize) -> Self {
        let path = path.into();
        Self {
            name: path::file_name(&path).to_string(),
            path,
            is_directory: false,
            depth,
            children: Vec::new(),
            is_deleted: false,
        }
    }

    /// Create a directory node with the given children
    pub fn directory(path: impl Into<String>, depth: usize, children: Vec<TreeNode>) -> Self {
        let path = path.into();
        Self {
            name: path::file_name(&path).to_string(),
            path,
            is_directory: true,
            depth,
            children,
            is_deleted: false,
        }
    }

    /// Create a synthetic file node for a path deleted from disk
    pub fn deleted(path: impl Into<String>, depth: usize) -> Self {
        Self {
            is_deleted: true,
            ..Self::file(path, depth)
        }
    }

    pub fn kind(&self) -> NodeKind {
        if self.is_directory {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }

    /// Copy of this node with a replaced child list
    pub fn with_children(&self, children: Vec<TreeNode>) -> Self {
        Self {
            path: self.path.clone(),
            name: self.name.clone(),
            is_directory: self.is_directory,
            depth: self.depth,
            children,
            is_deleted: self.is_deleted,
        }
    }

    /// Pre-order iterator over this node and its descendants
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Find a node by normalized path in this subtree
    pub fn find(&self, target: &str) -> Option<&TreeNode> {
        let target = path::normalize(target);
        self.walk().find(|n| path::normalize(&n.path) == target)
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind())?;
        if self.is_deleted {
            write!(f, " [deleted]")?;
        }
        Ok(())
    }
}

/// Pre-order walk over a forest
pub fn walk_forest(nodes: &[TreeNode]) -> Walk<'_> {
    Walk {
        stack: nodes.iter().rev().collect(),
    }
}

/// Iterator returned by [`TreeNode::walk`] and [`walk_forest`]
pub struct Walk<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if node.is_directory {
            self.stack.extend(node.children.iter().rev());
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind() {
        assert!(NodeKind::Directory.is_directory());
        assert!(!NodeKind::Directory.is_file());
        assert!(NodeKind::File.is_file());
        assert_eq!(NodeKind::File.to_string(), "File");
    }

    #[test]
    fn test_constructors() {
        let file = TreeNode::file("/repo/src/main.ts", 1);
        assert_eq!(file.name, "main.ts");
        assert_eq!(file.kind(), NodeKind::File);

        let dir = TreeNode::directory("/repo/src/", 0, vec![file]);
        assert_eq!(dir.name, "src");
        assert!(dir.is_directory);

        let gone = TreeNode::deleted("/repo/old.ts", 0);
        assert!(gone.is_deleted);
        assert!(!gone.is_directory);
        assert_eq!(gone.to_string(), "old.ts (File) [deleted]");
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = TreeNode::directory(
            "/r/a",
            0,
            vec![
                TreeNode::directory("/r/a/b", 1, vec![TreeNode::file("/r/a/b/c", 2)]),
                TreeNode::file("/r/a/d", 1),
            ],
        );

        let names: Vec<_> = tree.walk().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.find("/r/a/b/").map(|n| n.depth), Some(1));
    }

    #[test]
    fn test_walk_forest() {
        let forest = vec![
            TreeNode::directory("x", 0, vec![TreeNode::file("x/y", 1)]),
            TreeNode::file("z", 0),
        ];
        let paths: Vec<_> = walk_forest(&forest).map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["x", "x/y", "z"]);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "path": "/repo/src",
            "name": "src",
            "isDirectory": true,
            "depth": 0,
            "children": [
                {"path": "/repo/src/a.ts", "name": "a.ts", "isDirectory": false, "depth": 1}
            ]
        }"#;
        let node: TreeNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.children.len(), 1);
        assert!(!node.children[0].is_deleted);
    }

    #[test]
    fn test_deserialize_malformed_children() {
        let json = r#"{"path": "/d", "name": "d", "isDirectory": true, "depth": 0, "children": "oops"}"#;
        let node: TreeNode = serde_json::from_str(json).unwrap();
        assert!(node.is_directory);
        assert!(node.children.is_empty());

        let json = r#"{"path": "/d", "name": "d", "isDirectory": true, "depth": 0, "children": null}"#;
        let node: TreeNode = serde_json::from_str(json).unwrap();
        assert!(node.children.is_empty());
    }
}
