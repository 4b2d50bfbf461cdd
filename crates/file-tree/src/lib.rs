//! File tree library
//!
//! Represents a project listing as a forest of [`TreeNode`]s and prunes it
//! down to the files git reports as changed.
//!
//! # Core Concepts
//!
//! - **TreeNode**: a file or directory, with synthetic nodes for deletions
//! - **normalize**: the trailing-separator-insensitive key used for every
//!   path comparison
//! - **filter_by_git_changes**: keeps changed files and the directories
//!   leading to them
//!
//! # Example
//!
//! ```no_run
//! use file_tree::prelude::*;
//! use git::Repository;
//!
//! let nodes = scan_directory(".", &ScanOptions::new()).expect("Failed to scan directory");
//! let stats = Repository::open(".").and_then(|r| r.stats()).unwrap_or_default();
//!
//! for node in walk_forest(&filter_by_git_changes(&nodes, &stats)) {
//!     println!("{:indent$}{}", "", node.name, indent = node.depth * 2);
//! }
//! ```

pub mod filesystem;
mod filter;
mod node;
pub mod path;

pub use filesystem::{scan_directory, ScanOptions};
pub use filter::{filter_by_git_changes, filter_by_git_changes_in};
pub use node::{walk_forest, NodeKind, TreeNode, Walk};
pub use path::{file_name, normalize, parent_dir};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        filter_by_git_changes, normalize, scan_directory, walk_forest, ScanOptions, TreeNode,
    };
}
