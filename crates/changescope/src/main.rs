//! changescope: show what changed in a working tree

mod app;
mod cache;
mod options;
mod render;
mod watcher;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::debug;
use std::path::{Path, PathBuf};
use symbols::AnalysisMode;

use crate::app::{Scope, View};
use crate::options::ScopeOptions;

/// Config file picked up from the inspected directory when no --config is given
const DEFAULT_CONFIG_FILE: &str = ".changescope.toml";

/// Show the files git reports as changed, as a tree
#[derive(Parser, Debug)]
#[command(name = "changescope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to inspect
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Keep running and refresh on every change
    #[arg(short, long)]
    watch: bool,

    /// List hooks, components and functions of changed source files
    #[arg(short, long, conflicts_with = "outline")]
    symbols: bool,

    /// Print an outline of changed source files
    #[arg(long, value_name = "MODE")]
    outline: Option<OutlineMode>,

    /// Read options from this TOML file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Milliseconds between git stats fetches in watch mode
    #[arg(long, value_name = "N")]
    interval_ms: Option<u64>,

    /// Print the whole tree instead of only the changes
    #[arg(short, long)]
    all: bool,

    /// Include dot-files
    #[arg(long)]
    hidden: bool,

    /// Deepest directory level to scan
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutlineMode {
    Signatures,
    Skeleton,
}

impl From<OutlineMode> for AnalysisMode {
    fn from(mode: OutlineMode) -> Self {
        match mode {
            OutlineMode::Signatures => AnalysisMode::Signatures,
            OutlineMode::Skeleton => AnalysisMode::Skeleton,
        }
    }
}

impl Cli {
    fn analysis(&self) -> Option<AnalysisMode> {
        if self.symbols {
            Some(AnalysisMode::Symbols)
        } else {
            self.outline.map(AnalysisMode::from)
        }
    }

    /// File options with command line overrides applied
    fn options(&self) -> Result<ScopeOptions> {
        let mut options = match &self.config {
            Some(path) => ScopeOptions::load(path)?,
            None => {
                let default = self.dir.join(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    debug!("Using config file {}", default.display());
                    ScopeOptions::load(&default)?
                } else {
                    ScopeOptions::default()
                }
            }
        };

        if let Some(ms) = self.interval_ms {
            options = options.poll_interval_ms(ms);
        }
        if self.hidden {
            options = options.show_hidden(true);
        }
        if self.max_depth.is_some() {
            options = options.max_depth(self.max_depth);
        }
        Ok(options)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.options()?;
    let view = if cli.all { View::All } else { View::Changes };
    let scope = Scope::new(Path::new(&cli.dir), options)?
        .view(view)
        .analysis(cli.analysis());

    if cli.watch {
        scope.run_watch()
    } else {
        scope.run_once()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    debug!("{:?}", cli);
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["changescope"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(!cli.watch && !cli.all);
        assert_eq!(cli.analysis(), None);
    }

    #[test]
    fn test_analysis_flags() {
        let cli = Cli::try_parse_from(["changescope", "--outline", "skeleton", "src"]).unwrap();
        assert_eq!(cli.analysis(), Some(AnalysisMode::Skeleton));
        assert_eq!(cli.dir, PathBuf::from("src"));

        let cli = Cli::try_parse_from(["changescope", "-s"]).unwrap();
        assert_eq!(cli.analysis(), Some(AnalysisMode::Symbols));

        assert!(Cli::try_parse_from(["changescope", "--outline", "tokens"]).is_err());
        assert!(Cli::try_parse_from(["changescope", "-s", "--outline", "skeleton"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "poll_interval_ms = 5000\nshow_hidden = false\nmax_depth = 2\n",
        )
        .unwrap();
        let dir_arg = dir.path().to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["changescope", dir_arg.as_str(), "--interval-ms", "50", "--hidden"])
            .unwrap();
        let options = cli.options().unwrap();
        assert_eq!(options.poll_interval_ms, 50);
        assert!(options.show_hidden);
        assert_eq!(options.max_depth, Some(2));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let cli = Cli::try_parse_from(["changescope", "--config", "/nonexistent/changescope.toml"])
            .unwrap();
        assert!(cli.options().is_err());
    }
}
