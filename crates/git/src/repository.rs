use anyhow::{anyhow, Context, Result};
use git2::{
    DiffFindOptions, DiffOptions, Patch, Repository as Git2Repository, StatusEntry, StatusOptions,
};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::status::{GitStatsEntry, GitStatsMap, GitStatus};

/// A wrapper around git2::Repository that reports per-file change stats
pub struct Repository {
    /// The underlying git2 repository
    inner: Git2Repository,
    /// The repository's working directory
    work_dir: PathBuf,
}

impl Repository {
    /// Open the git repository containing the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repository::discover(path)
            .with_context(|| format!("Failed to discover git repository at {}", path.display()))?;

        let work_dir = repo
            .workdir()
            .ok_or_else(|| anyhow!("Repository has no working directory"))?
            .to_path_buf();

        Ok(Self {
            inner: repo,
            work_dir,
        })
    }

    /// Get the repository's working directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Absolute path string for a workdir-relative git path
    fn absolute(&self, relative: &str) -> String {
        self.work_dir.join(relative).to_string_lossy().into_owned()
    }

    /// Status and line counts for every changed file, keyed by absolute path
    pub fn stats(&self) -> Result<GitStatsMap> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .renames_head_to_index(true)
            .renames_index_to_workdir(true);

        let statuses = self
            .inner
            .statuses(Some(&mut opts))
            .context("Failed to read repository status")?;
        let counts = self.line_counts()?;

        let mut map = GitStatsMap::new();
        for entry in statuses.iter() {
            let status = GitStatus::from_git2_status(entry.status());
            if status == GitStatus::None {
                continue;
            }
            let relative = match status {
                GitStatus::Renamed => renamed_to(&entry).and_then(|p| p.to_str()),
                _ => entry.path(),
            };
            let Some(relative) = relative else {
                continue;
            };
            let (added, deleted) = counts.get(relative).copied().unwrap_or((0, 0));
            map.insert(GitStatsEntry::new(self.absolute(relative), status).with_lines(added, deleted));
        }

        debug!(
            "Collected stats for {} changed files in {}",
            map.len(),
            self.work_dir.display()
        );
        Ok(map)
    }

    /// Added/deleted line counts per workdir-relative path, HEAD against the
    /// working tree (through the index). Untracked file contents count as
    /// added lines.
    fn line_counts(&self) -> Result<HashMap<String, (usize, usize)>> {
        // An unborn HEAD diffs against the empty tree
        let head_tree = match self.inner.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(_) => None,
        };

        let mut diff_opts = DiffOptions::new();
        diff_opts
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .show_untracked_content(true);

        let mut diff = self
            .inner
            .diff_tree_to_workdir_with_index(head_tree.as_ref(), Some(&mut diff_opts))
            .context("Failed to diff HEAD against the working directory")?;

        // Pair deletions with additions so renamed files are counted under
        // their new path
        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true).for_untracked(true);
        diff.find_similar(Some(&mut find_opts))
            .context("Failed to detect renames")?;

        let mut counts = HashMap::new();
        for idx in 0..diff.deltas().len() {
            let Some(patch) = Patch::from_diff(&diff, idx)? else {
                continue;
            };
            let (_, added, deleted) = patch.line_stats()?;
            let delta = patch.delta();
            let path = delta.new_file().path().or_else(|| delta.old_file().path());
            if let Some(path) = path {
                counts.insert(path.to_string_lossy().into_owned(), (added, deleted));
            }
        }

        Ok(counts)
    }
}

/// Path a renamed entry now lives at; the working tree side wins over the
/// index when both record a rename
fn renamed_to<'s>(entry: &StatusEntry<'s>) -> Option<&'s Path> {
    entry
        .index_to_workdir()
        .and_then(|delta| delta.new_file().path())
        .or_else(|| entry.head_to_index().and_then(|delta| delta.new_file().path()))
}
