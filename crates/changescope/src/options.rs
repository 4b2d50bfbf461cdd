//! Configuration for changescope.

use anyhow::{Context, Result};
use file_tree::ScanOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use symbols::{AnalyzerOptions, DEFAULT_MAX_FILE_BYTES};

/// Configuration options for a changescope run.
///
/// Loaded from a TOML file; every key is optional and command line flags
/// override whatever the file sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeOptions {
    /// Delay between two git stats fetches in watch mode, in milliseconds.
    pub poll_interval_ms: u64,

    /// Files larger than this are not analyzed.
    pub max_analyze_bytes: u64,

    /// Whether to list dot-files and dot-directories.
    pub show_hidden: bool,

    /// Deepest directory level to scan (unlimited when unset).
    pub max_depth: Option<usize>,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_analyze_bytes: DEFAULT_MAX_FILE_BYTES,
            show_hidden: false,
            max_depth: None,
        }
    }
}

impl ScopeOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Set the poll interval in milliseconds.
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the analysis size ceiling.
    pub fn max_analyze_bytes(mut self, bytes: u64) -> Self {
        self.max_analyze_bytes = bytes;
        self
    }

    /// Show or hide dot-files.
    pub fn show_hidden(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }

    /// Limit the scan depth.
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new()
            .show_hidden(self.show_hidden)
            .max_depth(self.max_depth)
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions::new().max_file_bytes(self.max_analyze_bytes)
    }
}
