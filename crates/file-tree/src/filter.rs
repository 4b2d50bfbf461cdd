//! Pruning a tree down to the paths git reports as changed
//!
//! The output is always a freshly built forest: input nodes are never
//! mutated. Order is stable: surviving children keep their relative order and
//! synthetic deleted entries follow them in git-stats iteration order.

use git::{GitStatsMap, GitStatus};
use log::debug;
use std::collections::{HashMap, HashSet};

use crate::node::{walk_forest, TreeNode};
use crate::path::{normalize, parent_dir};

/// Keep only changed files and the directories leading to them.
///
/// The root directory is taken to be the parent of the first top-level node
/// (or `""` for an empty forest); deleted files directly under it are appended
/// after the filtered top-level nodes.
pub fn filter_by_git_changes(nodes: &[TreeNode], stats: &GitStatsMap) -> Vec<TreeNode> {
    let root_dir = nodes
        .first()
        .map(|n| parent_dir(&n.path))
        .unwrap_or_default();
    filter_by_git_changes_in(&root_dir, nodes, stats)
}

/// [`filter_by_git_changes`] with an explicit root directory
pub fn filter_by_git_changes_in(
    root_dir: &str,
    nodes: &[TreeNode],
    stats: &GitStatsMap,
) -> Vec<TreeNode> {
    let stats = stats.rekeyed(normalize);
    let root_dir = normalize(root_dir);
    let live: HashSet<String> = walk_forest(nodes).map(|n| normalize(&n.path)).collect();
    let synthetic = SyntheticDeletions::collect(&stats, &live, &root_dir);

    let filter = Filter {
        stats: &stats,
        synthetic: &synthetic,
    };

    let root_depth = nodes.first().map(|n| n.depth).unwrap_or(0);
    let mut result: Vec<TreeNode> = nodes.iter().filter_map(|n| filter.node(n)).collect();
    result.extend(synthetic.materialize(&root_dir, root_depth));

    debug!(
        "Filtered {} live nodes against {} stats entries ({} synthetic deletions)",
        live.len(),
        stats.len(),
        synthetic.file_count
    );
    result
}

struct Filter<'a> {
    stats: &'a GitStatsMap,
    synthetic: &'a SyntheticDeletions,
}

impl Filter<'_> {
    fn node(&self, node: &TreeNode) -> Option<TreeNode> {
        let key = normalize(&node.path);

        if !node.is_directory {
            return self
                .stats
                .contains(&key)
                .then(|| node.with_children(Vec::new()));
        }

        let mut children: Vec<TreeNode> =
            node.children.iter().filter_map(|c| self.node(c)).collect();
        children.extend(self.synthetic.materialize(&key, node.depth + 1));

        (!children.is_empty()).then(|| node.with_children(children))
    }
}

enum Synthetic {
    File(String),
    Dir(String),
}

/// Deleted entries missing from the live tree, grouped by parent directory
struct SyntheticDeletions {
    groups: HashMap<String, Vec<Synthetic>>,
    file_count: usize,
}

impl SyntheticDeletions {
    /// Group deleted, non-live entries by normalized parent. A parent that is
    /// itself missing gets a synthetic directory, chained upward until a live
    /// path or the root is reached.
    fn collect(stats: &GitStatsMap, live: &HashSet<String>, root_dir: &str) -> Self {
        let mut groups: HashMap<String, Vec<Synthetic>> = HashMap::new();
        let mut synthetic_dirs: HashSet<String> = HashSet::new();
        let mut file_count = 0;

        for entry in stats.with_status(GitStatus::Deleted) {
            if live.contains(&entry.path) {
                continue;
            }
            file_count += 1;

            let parent = parent_dir(&entry.path);
            groups
                .entry(parent.clone())
                .or_default()
                .push(Synthetic::File(entry.path.clone()));

            let mut dir = parent;
            while !dir.is_empty()
                && dir != root_dir
                && !live.contains(&dir)
                && synthetic_dirs.insert(dir.clone())
            {
                let up = parent_dir(&dir);
                groups
                    .entry(up.clone())
                    .or_default()
                    .push(Synthetic::Dir(dir));
                dir = up;
            }
        }

        Self { groups, file_count }
    }

    fn materialize(&self, dir: &str, depth: usize) -> Vec<TreeNode> {
        let Some(items) = self.groups.get(dir) else {
            return Vec::new();
        };

        items
            .iter()
            .map(|item| match item {
                Synthetic::File(path) => TreeNode::deleted(path.clone(), depth),
                Synthetic::Dir(path) => TreeNode {
                    is_deleted: true,
                    ..TreeNode::directory(path.clone(), depth, self.materialize(path, depth + 1))
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git::GitStatsEntry;

    fn stats(entries: &[(&str, GitStatus)]) -> GitStatsMap {
        entries
            .iter()
            .map(|(p, s)| GitStatsEntry::new(*p, *s))
            .collect()
    }

    #[test]
    fn test_synthetic_groups_follow_stats_order() {
        let stats = stats(&[
            ("/r/b.ts", GitStatus::Deleted),
            ("/r/a.ts", GitStatus::Modified),
            ("/r/c.ts", GitStatus::Deleted),
        ]);
        let live = HashSet::new();
        let synthetic = SyntheticDeletions::collect(&stats, &live, "/r");

        let paths: Vec<_> = synthetic
            .materialize("/r", 0)
            .into_iter()
            .map(|n| n.path)
            .collect();
        assert_eq!(paths, vec!["/r/b.ts", "/r/c.ts"]);
        assert_eq!(synthetic.file_count, 2);
    }

    #[test]
    fn test_live_deleted_entry_is_not_synthesized() {
        let stats = stats(&[("/r/a.ts", GitStatus::Deleted)]);
        let live: HashSet<String> = ["/r/a.ts".to_string()].into_iter().collect();
        let synthetic = SyntheticDeletions::collect(&stats, &live, "/r");
        assert!(synthetic.materialize("/r", 0).is_empty());
    }

    #[test]
    fn test_missing_parents_are_chained() {
        let stats = stats(&[("/r/gone/deeper/x.ts", GitStatus::Deleted)]);
        let synthetic = SyntheticDeletions::collect(&stats, &HashSet::new(), "/r");

        let top = synthetic.materialize("/r", 0);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].path, "/r/gone");
        assert!(top[0].is_directory && top[0].is_deleted);
        assert_eq!(top[0].children[0].path, "/r/gone/deeper");
        assert_eq!(top[0].children[0].children[0].path, "/r/gone/deeper/x.ts");
        assert_eq!(top[0].children[0].children[0].depth, 2);
    }
}
