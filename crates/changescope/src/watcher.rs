//! File system watcher for the scanned tree
//!
//! Git stats are refreshed by the poller; this only tells the watch loop when
//! the set of files on disk may have changed so the tree can be rescanned.

use anyhow::{Context, Result};
use log::{debug, info, trace, warn};
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Watches a directory tree and reports structural changes
pub struct TreeWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<Result<Event, notify::Error>>,
}

impl TreeWatcher {
    /// Start watching `root` recursively
    pub fn new(root: &Path) -> Result<Self> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(500)),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;
        info!("Watching {} for file changes", root.display());

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain pending events; true if any of them may change the tree
    pub fn poll_changes(&self) -> bool {
        let mut changed = false;

        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(event) => {
                    if Self::affects_tree(&event) {
                        debug!("File event {:?}: {:?}", event.kind, event.paths);
                        changed = true;
                    } else {
                        trace!("Ignoring fs event: {:?}", event);
                    }
                }
                Err(e) => warn!("File watcher error: {:?}", e),
            }
        }

        changed
    }

    /// Creations, removals and renames outside `.git`
    fn affects_tree(event: &Event) -> bool {
        let structural = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
        );
        structural && event.paths.iter().any(|p| !in_git_dir(p))
    }
}

fn in_git_dir(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == ".git")
}
