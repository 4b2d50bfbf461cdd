//! Reading source files from disk and dispatching to the extractors
//!
//! Every failure (unreadable file, oversized file, non-UTF-8 content,
//! unsupported extension) is reported inside the result, never as a panic or
//! an `Err`, so one bad file cannot abort a listing.

use anyhow::{bail, Context, Result};
use derive_more::Display;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::digest::SymbolDigest;
use crate::extract::extract_symbols;
use crate::outline::{extract_signatures, extract_skeleton, Outline};

/// Extensions handled by the TSX parser
pub const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Default ceiling on the size of an analyzed file
pub const DEFAULT_MAX_FILE_BYTES: u64 = 512 * 1024;

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`]
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// What to extract from a file
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    #[display(fmt = "symbols")]
    Symbols,
    #[display(fmt = "signatures")]
    Signatures,
    #[display(fmt = "skeleton")]
    Skeleton,
}

impl FromStr for AnalysisMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "symbols" => Ok(Self::Symbols),
            "signatures" => Ok(Self::Signatures),
            "skeleton" => Ok(Self::Skeleton),
            other => bail!("unknown analysis mode `{}`", other),
        }
    }
}

/// Result of analyzing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    Symbols(SymbolDigest),
    Outline(Outline),
}

impl Analysis {
    fn failed(mode: AnalysisMode, error: String) -> Self {
        match mode {
            AnalysisMode::Symbols => Self::Symbols(SymbolDigest::failed(error)),
            AnalysisMode::Signatures | AnalysisMode::Skeleton => {
                Self::Outline(Outline::failed(error))
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Symbols(digest) => digest.error.as_deref(),
            Self::Outline(outline) => outline.error.as_deref(),
        }
    }
}

/// Limits applied before a file is parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    pub max_file_bytes: u64,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl AnalyzerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest file that will be parsed.
    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }
}

/// Analyzes source files on disk
#[derive(Debug, Clone, Default)]
pub struct FileAnalyzer {
    options: AnalyzerOptions,
}

impl FileAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Read `path` as UTF-8 source, enforcing the extension and size limits
    pub fn read_source(&self, path: &Path) -> Result<String> {
        if !is_supported(path) {
            bail!("{}: unsupported file type", path.display());
        }

        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read metadata for {}", path.display()))?;
        if metadata.len() > self.options.max_file_bytes {
            bail!(
                "{}: file is {} bytes, larger than the {} byte limit",
                path.display(),
                metadata.len(),
                self.options.max_file_bytes
            );
        }

        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        String::from_utf8(bytes).with_context(|| format!("{}: not valid UTF-8", path.display()))
    }

    /// Analyze one file in the given mode
    pub fn analyze(&self, path: &Path, mode: AnalysisMode) -> Analysis {
        let source = match self.read_source(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping analysis of {}: {:#}", path.display(), e);
                return Analysis::failed(mode, format!("{:#}", e));
            }
        };

        let file_path = path.to_string_lossy();
        debug!("Analyzing {} ({})", file_path, mode);
        match mode {
            AnalysisMode::Symbols => Analysis::Symbols(extract_symbols(&source, &file_path)),
            AnalysisMode::Signatures => {
                Analysis::Outline(extract_signatures(&source, &file_path))
            }
            AnalysisMode::Skeleton => Analysis::Outline(extract_skeleton(&source, &file_path)),
        }
    }

    /// Symbol digest for one file
    pub fn symbols(&self, path: &Path) -> SymbolDigest {
        match self.read_source(path) {
            Ok(source) => extract_symbols(&source, &path.to_string_lossy()),
            Err(e) => {
                warn!("Skipping analysis of {}: {:#}", path.display(), e);
                SymbolDigest::failed(format!("{:#}", e))
            }
        }
    }
}
