//! Per-file analysis results reused across renders

use log::debug;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use symbols::{Analysis, AnalysisMode, FileAnalyzer};

/// What a cached result was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl Stamp {
    fn of(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

#[derive(Debug)]
struct Cached {
    stamp: Stamp,
    mode: AnalysisMode,
    analysis: Analysis,
}

/// Analyses keyed by path, reused while the file's size and mtime are unchanged
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<PathBuf, Cached>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cached analysis of `path`, re-running `analyzer` when the file changed
    pub fn analyze(
        &mut self,
        analyzer: &FileAnalyzer,
        path: &Path,
        mode: AnalysisMode,
    ) -> Analysis {
        let Some(stamp) = Stamp::of(path) else {
            // Unreadable files are reported by the analyzer and never cached
            self.entries.remove(path);
            return analyzer.analyze(path, mode);
        };

        if let Some(cached) = self.entries.get(path) {
            if cached.stamp == stamp && cached.mode == mode {
                return cached.analysis.clone();
            }
        }

        debug!("Analysis cache miss for {}", path.display());
        let analysis = analyzer.analyze(path, mode);
        self.entries.insert(
            path.to_path_buf(),
            Cached {
                stamp,
                mode,
                analysis: analysis.clone(),
            },
        );
        analysis
    }

    /// Drop entries for paths no longer being shown
    pub fn retain_paths(&mut self, keep: &HashSet<&Path>) {
        self.entries.retain(|path, _| keep.contains(path.as_path()));
    }
}
