//! CLI example that scans a directory and displays only the files git
//! reports as changed
//!
//! Usage:
//!   cargo run --example list_changes [path]
//!
//! If no path is provided, uses the current directory.

use file_tree::prelude::*;
use git::Repository;
use std::env;

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| ".".to_string());

    let nodes = match scan_directory(&path, &ScanOptions::new()) {
        Ok(nodes) => nodes,
        Err(e) => {
            eprintln!("Error loading directory: {:#}", e);
            std::process::exit(1);
        }
    };

    let stats = match Repository::open(&path).and_then(|repo| repo.stats()) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("No git data: {:#}", e);
            Default::default()
        }
    };

    let filtered = filter_by_git_changes(&nodes, &stats);
    println!(
        "{} of {} nodes changed",
        walk_forest(&filtered).filter(|n| !n.is_directory).count(),
        walk_forest(&nodes).count()
    );
    println!();

    for node in walk_forest(&filtered) {
        let marker = if node.is_deleted { " (deleted)" } else { "" };
        let suffix = if node.is_directory { "/" } else { "" };
        println!("{:indent$}{}{}{}", "", node.name, suffix, marker, indent = node.depth * 2);
    }
}
