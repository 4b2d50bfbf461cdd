//! Plain-text rendering of trees, stats and analyses

use file_tree::{normalize, walk_forest, TreeNode};
use git::{GitStatsEntry, GitStatsMap};
use std::fmt::Write;
use symbols::{Analysis, SymbolDigest};

const INDENT: &str = "  ";

/// Render a forest with one line per node.
///
/// Files carry their status indicator and, when non-zero, `+added -deleted`
/// line counts. Directories end in `/`.
pub fn render_tree(nodes: &[TreeNode], stats: &GitStatsMap) -> String {
    let stats = stats.rekeyed(normalize);
    let base = nodes.iter().map(|n| n.depth).min().unwrap_or(0);
    let mut out = String::new();

    for node in walk_forest(nodes) {
        let indent = INDENT.repeat(node.depth.saturating_sub(base));
        if node.is_directory {
            let _ = writeln!(out, "{}{}/", indent, node.name);
            continue;
        }

        let entry = stats.get(&normalize(&node.path));
        let indicator = entry.map(|e| e.status.indicator()).unwrap_or("");
        let indicator = if indicator.is_empty() { " " } else { indicator };
        let _ = writeln!(
            out,
            "{}{} {}{}",
            indent,
            indicator,
            node.name,
            entry.map(line_counts).unwrap_or_default()
        );
    }
    out
}

fn line_counts(entry: &GitStatsEntry) -> String {
    if entry.added == 0 && entry.deleted == 0 {
        String::new()
    } else {
        format!(" +{} -{}", entry.added, entry.deleted)
    }
}

/// One-line summary of a stats map
pub fn render_summary(stats: &GitStatsMap) -> String {
    let (added, deleted) = stats.line_totals();
    let files = if stats.len() == 1 { "file" } else { "files" };
    format!("{} changed {}, +{} -{}", stats.len(), files, added, deleted)
}

/// Render the analysis of one file under a header line
pub fn render_analysis(label: &str, analysis: &Analysis) -> String {
    let mut out = format!("{}\n", label);

    if let Some(error) = analysis.error() {
        let _ = writeln!(out, "{}error: {}", INDENT, error);
        return out;
    }

    match analysis {
        Analysis::Symbols(digest) => render_digest(&mut out, digest),
        Analysis::Outline(outline) => {
            for line in &outline.lines {
                let _ = writeln!(out, "{}{}", INDENT, line);
            }
        }
    }
    out
}

fn render_digest(out: &mut String, digest: &SymbolDigest) {
    let sections = [
        ("components", &digest.defined_components),
        ("renders", &digest.used_components),
        ("hooks", &digest.hooks),
        ("functions", &digest.functions),
    ];
    for (title, names) in sections {
        if !names.is_empty() {
            let _ = writeln!(out, "{}{}: {}", INDENT, title, names.join(", "));
        }
    }
}
