use derive_more::Display;
use git2::Status as Git2Status;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status of a changed file as reported by the git status provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitStatus {
    /// The file has been modified
    #[display(fmt = "modified")]
    Modified,
    /// The file is new in the index
    #[display(fmt = "added")]
    Added,
    /// The file has been deleted
    #[display(fmt = "deleted")]
    Deleted,
    /// The file has been renamed
    #[display(fmt = "renamed")]
    Renamed,
    /// The file is untracked in the working directory
    #[display(fmt = "untracked")]
    Untracked,
    /// Line counts are known but no status was reported
    #[default]
    #[display(fmt = "none")]
    None,
}

impl GitStatus {
    /// Parse a status string from a provider payload.
    ///
    /// Unknown or empty strings map to [`GitStatus::None`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "modified" | "m" => GitStatus::Modified,
            "added" | "a" => GitStatus::Added,
            "deleted" | "d" => GitStatus::Deleted,
            "renamed" | "r" => GitStatus::Renamed,
            "untracked" | "?" | "??" => GitStatus::Untracked,
            _ => GitStatus::None,
        }
    }

    /// Convert from git2::Status to GitStatus
    pub fn from_git2_status(status: Git2Status) -> Self {
        if status.is_index_new() {
            return GitStatus::Added;
        }
        if status.is_index_deleted() || status.is_wt_deleted() {
            return GitStatus::Deleted;
        }
        if status.is_index_renamed() || status.is_wt_renamed() {
            return GitStatus::Renamed;
        }
        if status.is_index_modified()
            || status.is_index_typechange()
            || status.is_wt_modified()
            || status.is_wt_typechange()
        {
            return GitStatus::Modified;
        }
        if status.is_wt_new() {
            return GitStatus::Untracked;
        }

        GitStatus::None
    }

    /// Single character indicator for compact display
    pub fn indicator(self) -> &'static str {
        match self {
            GitStatus::Modified => "M",
            GitStatus::Added => "A",
            GitStatus::Deleted => "D",
            GitStatus::Renamed => "R",
            GitStatus::Untracked => "?",
            GitStatus::None => "",
        }
    }
}

/// Line-change counts and status for one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitStatsEntry {
    /// Path as reported by the provider (may be non-normalized)
    pub path: String,
    /// Number of added lines
    pub added: usize,
    /// Number of deleted lines
    pub deleted: usize,
    /// Status of the file
    #[serde(default)]
    pub status: GitStatus,
}

impl GitStatsEntry {
    pub fn new(path: impl Into<String>, status: GitStatus) -> Self {
        Self {
            path: path.into(),
            added: 0,
            deleted: 0,
            status,
        }
    }

    /// Set the added/deleted line counts
    pub fn with_lines(mut self, added: usize, deleted: usize) -> Self {
        self.added = added;
        self.deleted = deleted;
        self
    }
}

/// Insertion-ordered map from path to [`GitStatsEntry`].
///
/// Iteration follows insertion order. Re-inserting an existing path replaces
/// the entry in place without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatsMap {
    entries: Vec<GitStatsEntry>,
    index: HashMap<String, usize>,
}

impl GitStatsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry keyed by its own path, returning the replaced entry
    pub fn insert(&mut self, entry: GitStatsEntry) -> Option<GitStatsEntry> {
        match self.index.get(&entry.path) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot], entry)),
            None => {
                self.index.insert(entry.path.clone(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&GitStatsEntry> {
        self.index.get(path).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, GitStatsEntry> {
        self.entries.iter()
    }

    /// Build a copy whose keys are rewritten by `key`.
    ///
    /// Entries whose rewritten keys collide keep the first position and the
    /// last value, matching repeated inserts into a fresh map.
    pub fn rekeyed<F>(&self, key: F) -> GitStatsMap
    where
        F: Fn(&str) -> String,
    {
        self.entries
            .iter()
            .map(|entry| GitStatsEntry {
                path: key(&entry.path),
                ..entry.clone()
            })
            .collect()
    }

    /// Entries with the given status, in insertion order
    pub fn with_status(&self, status: GitStatus) -> impl Iterator<Item = &GitStatsEntry> {
        self.entries.iter().filter(move |e| e.status == status)
    }

    /// Total added and deleted lines across all entries
    pub fn line_totals(&self) -> (usize, usize) {
        self.entries
            .iter()
            .fold((0, 0), |(a, d), e| (a + e.added, d + e.deleted))
    }
}

impl FromIterator<GitStatsEntry> for GitStatsMap {
    fn from_iter<I: IntoIterator<Item = GitStatsEntry>>(iter: I) -> Self {
        let mut map = GitStatsMap::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}

impl<'a> IntoIterator for &'a GitStatsMap {
    type Item = &'a GitStatsEntry;
    type IntoIter = std::slice::Iter<'a, GitStatsEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(GitStatus::parse("modified"), GitStatus::Modified);
        assert_eq!(GitStatus::parse("Deleted"), GitStatus::Deleted);
        assert_eq!(GitStatus::parse("??"), GitStatus::Untracked);
        assert_eq!(GitStatus::parse(""), GitStatus::None);
        assert_eq!(GitStatus::parse("copied"), GitStatus::None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(GitStatus::Renamed.to_string(), "renamed");
        assert_eq!(GitStatus::None.to_string(), "none");
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let map: GitStatsMap = ["c", "a", "b"]
            .iter()
            .map(|p| GitStatsEntry::new(*p, GitStatus::Modified))
            .collect();

        let paths: Vec<_> = map.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_map_replaces_in_place() {
        let mut map = GitStatsMap::new();
        map.insert(GitStatsEntry::new("a", GitStatus::Modified));
        map.insert(GitStatsEntry::new("b", GitStatus::Added));
        let old = map.insert(GitStatsEntry::new("a", GitStatus::Deleted).with_lines(0, 4));

        assert_eq!(old.map(|e| e.status), Some(GitStatus::Modified));
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next().map(|e| e.status), Some(GitStatus::Deleted));
        assert_eq!(map.get("a").map(|e| e.deleted), Some(4));
    }

    #[test]
    fn test_rekeyed_merges_collisions() {
        let map: GitStatsMap = vec![
            GitStatsEntry::new("src/", GitStatus::Modified),
            GitStatsEntry::new("lib", GitStatus::Added),
            GitStatsEntry::new("src", GitStatus::Deleted),
        ]
        .into_iter()
        .collect();

        let rekeyed = map.rekeyed(|p| p.trim_end_matches('/').to_string());
        let paths: Vec<_> = rekeyed.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["src", "lib"]);
        assert_eq!(rekeyed.get("src").map(|e| e.status), Some(GitStatus::Deleted));
    }

    #[test]
    fn test_entry_deserializes_without_status() {
        let entry: GitStatsEntry =
            serde_json::from_str(r#"{"path":"a.ts","added":3,"deleted":1}"#).unwrap();
        assert_eq!(entry.status, GitStatus::None);
        assert_eq!(entry.added, 3);
    }

    #[test]
    fn test_line_totals() {
        let map: GitStatsMap = vec![
            GitStatsEntry::new("a", GitStatus::Modified).with_lines(3, 1),
            GitStatsEntry::new("b", GitStatus::Added).with_lines(10, 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(map.line_totals(), (13, 1));
        assert_eq!(map.with_status(GitStatus::Added).count(), 1);
    }
}
