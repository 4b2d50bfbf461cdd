//! One-shot and watch modes

use anyhow::{Context, Result};
use file_tree::{filter_by_git_changes_in, scan_directory, TreeNode};
use git::{
    GitStatsMap, GitStatsPoller, GitStatus, RepositoryStatsProvider, SnapshotState, StatsProvider,
};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;
use symbols::{is_supported, AnalysisMode, FileAnalyzer};

use crate::cache::AnalysisCache;
use crate::options::ScopeOptions;
use crate::render::{render_analysis, render_summary, render_tree};
use crate::watcher::TreeWatcher;

/// How often the watch loop checks for file events between snapshots
const WATCH_TICK: Duration = Duration::from_millis(200);

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Which nodes of the tree are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Only changed files and their ancestors, plus deletions
    #[default]
    Changes,
    /// The whole tree, annotated with status
    All,
}

/// A directory being inspected
pub struct Scope {
    root: PathBuf,
    options: ScopeOptions,
    view: View,
    analysis: Option<AnalysisMode>,
    analyzer: FileAnalyzer,
    cache: RefCell<AnalysisCache>,
}

impl Scope {
    pub fn new(root: impl AsRef<Path>, options: ScopeOptions) -> Result<Self> {
        let root = root.as_ref();
        let root = fs::canonicalize(root)
            .with_context(|| format!("Failed to resolve {}", root.display()))?;
        let analyzer = FileAnalyzer::new(options.analyzer_options());

        Ok(Self {
            root,
            options,
            view: View::default(),
            analysis: None,
            analyzer,
            cache: RefCell::new(AnalysisCache::new()),
        })
    }

    pub fn view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    /// Analyze every changed source file in the given mode
    pub fn analysis(mut self, mode: Option<AnalysisMode>) -> Self {
        self.analysis = mode;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan(&self) -> Result<Vec<TreeNode>> {
        scan_directory(&self.root, &self.options.scan_options())
    }

    /// Scan once, fetch stats once and print the result
    pub fn run_once(&self) -> Result<()> {
        let stats = RepositoryStatsProvider
            .fetch(&self.root)
            .unwrap_or_else(|e| {
                warn!("No git stats for {}: {:#}", self.root.display(), e);
                GitStatsMap::new()
            });
        let nodes = self.scan()?;
        print!("{}", self.render(&nodes, &stats));
        Ok(())
    }

    /// Re-render whenever the poller publishes or the tree changes on disk.
    ///
    /// Runs until the process is interrupted.
    pub fn run_watch(&self) -> Result<()> {
        let (poller, updates) =
            GitStatsPoller::new(RepositoryStatsProvider, self.options.poll_interval());
        let watcher = TreeWatcher::new(&self.root)?;

        let mut nodes = self.scan()?;
        let mut stats = Arc::new(GitStatsMap::new());
        let mut last_output = String::new();
        let mut dirty = true;

        poller.watch(&self.root);
        info!("Watching {}; press Ctrl-C to stop", self.root.display());

        loop {
            match updates.recv_timeout(WATCH_TICK) {
                Ok(snapshot) => {
                    if snapshot.state == SnapshotState::Failed {
                        debug!("Showing empty stats after a failed fetch");
                    }
                    stats = snapshot.stats;
                    dirty = true;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if watcher.poll_changes() {
                match self.scan() {
                    Ok(rescanned) => nodes = rescanned,
                    Err(e) => warn!("Keeping the previous tree: {:#}", e),
                }
                dirty = true;
            }

            if !dirty {
                continue;
            }
            dirty = false;

            let output = self.render(&nodes, &stats);
            if output != last_output {
                print!("{}{}", CLEAR_SCREEN, output);
                last_output = output;
            }
        }

        Ok(())
    }

    /// Tree, summary and (optionally) per-file analyses
    pub fn render(&self, nodes: &[TreeNode], stats: &GitStatsMap) -> String {
        let shown = match self.view {
            View::Changes => {
                filter_by_git_changes_in(&self.root.to_string_lossy(), nodes, stats)
            }
            View::All => nodes.to_vec(),
        };

        let mut out = if shown.is_empty() {
            "No changes\n".to_string()
        } else {
            render_tree(&shown, stats)
        };
        out.push_str(&render_summary(&self.under_root(stats)));
        out.push('\n');

        if let Some(mode) = self.analysis {
            let mut cache = self.cache.borrow_mut();
            let paths: Vec<&Path> = self.analyzable(stats).collect();
            cache.retain_paths(&paths.iter().copied().collect::<HashSet<_>>());

            for path in paths {
                let label = path.strip_prefix(&self.root).unwrap_or(path);
                let analysis = cache.analyze(&self.analyzer, path, mode);
                out.push('\n');
                out.push_str(&render_analysis(&label.display().to_string(), &analysis));
            }
        }
        out
    }

    /// Entries for files inside the root
    fn under_root(&self, stats: &GitStatsMap) -> GitStatsMap {
        stats
            .iter()
            .filter(|entry| Path::new(entry.path.as_str()).starts_with(&self.root))
            .cloned()
            .collect()
    }

    /// Changed, still present source files under the root
    fn analyzable<'a>(&'a self, stats: &'a GitStatsMap) -> impl Iterator<Item = &'a Path> {
        stats
            .iter()
            .filter(|entry| entry.status != GitStatus::Deleted)
            .map(|entry| Path::new(entry.path.as_str()))
            .filter(move |path| path.starts_with(&self.root) && is_supported(path))
    }
}
