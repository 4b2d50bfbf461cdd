//! Fixed-interval polling of git change stats
//!
//! A [`GitStatsPoller`] owns at most one background worker. The worker fetches
//! immediately on subscription and then once per interval, publishing every
//! result as a full replacement snapshot.

use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::repository::Repository;
use crate::status::GitStatsMap;

/// Default delay between two fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Source of git change stats for a directory
pub trait StatsProvider: Send + Sync + 'static {
    /// Fetch the full path -> stats map for `dir`
    fn fetch(&self, dir: &Path) -> Result<GitStatsMap>;
}

impl<F> StatsProvider for F
where
    F: Fn(&Path) -> Result<GitStatsMap> + Send + Sync + 'static,
{
    fn fetch(&self, dir: &Path) -> Result<GitStatsMap> {
        self(dir)
    }
}

/// Provider backed by the local repository containing the directory.
///
/// The repository is reopened on every fetch so no handle outlives a tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryStatsProvider;

impl StatsProvider for RepositoryStatsProvider {
    fn fetch(&self, dir: &Path) -> Result<GitStatsMap> {
        Repository::open(dir)?.stats()
    }
}

/// Outcome of the fetch that produced a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    /// No fetch has completed for the current subscription yet
    Pending,
    /// The last fetch succeeded
    Fresh,
    /// The last fetch failed; the map is empty
    Failed,
}

/// One published value of the poller
#[derive(Debug, Clone)]
pub struct GitSnapshot {
    /// Directory the stats were fetched for
    pub path: PathBuf,
    /// The complete stats map (never merged with a previous tick)
    pub stats: Arc<GitStatsMap>,
    pub state: SnapshotState,
}

impl GitSnapshot {
    fn pending(path: PathBuf) -> Self {
        Self {
            path,
            stats: Arc::new(GitStatsMap::new()),
            state: SnapshotState::Pending,
        }
    }
}

struct Subscription {
    path: PathBuf,
    stop_tx: Sender<()>,
}

struct PollerState {
    /// Bumped on every subscribe and stop; workers only publish while their
    /// generation is current
    generation: u64,
    current: GitSnapshot,
    subscription: Option<Subscription>,
}

struct Shared {
    state: Mutex<PollerState>,
    updates: Mutex<Sender<GitSnapshot>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Publish a snapshot on behalf of worker `generation`.
    ///
    /// Returns false once the worker has been superseded; nothing is
    /// published in that case.
    fn publish(&self, generation: u64, snapshot: GitSnapshot) -> bool {
        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }
        state.current = snapshot.clone();
        // Sent while holding the state lock so stop() cannot interleave
        let updates = self
            .updates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if updates.send(snapshot).is_err() {
            debug!("Snapshot receiver dropped; keeping pull-only access");
        }
        true
    }
}

/// Polls a [`StatsProvider`] for one directory at a time
pub struct GitStatsPoller {
    provider: Arc<dyn StatsProvider>,
    interval: Duration,
    shared: Arc<Shared>,
}

impl GitStatsPoller {
    /// Create a poller and the receiver on which snapshots are delivered
    pub fn new<P: StatsProvider>(provider: P, interval: Duration) -> (Self, Receiver<GitSnapshot>) {
        let (tx, rx) = channel();
        let shared = Arc::new(Shared {
            state: Mutex::new(PollerState {
                generation: 0,
                current: GitSnapshot::pending(PathBuf::new()),
                subscription: None,
            }),
            updates: Mutex::new(tx),
        });

        let poller = Self {
            provider: Arc::new(provider),
            interval,
            shared,
        };
        (poller, rx)
    }

    /// Poller over the local repository with the default one second interval
    pub fn for_repository() -> (Self, Receiver<GitSnapshot>) {
        Self::new(RepositoryStatsProvider, DEFAULT_POLL_INTERVAL)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Path currently being watched, if any
    pub fn watched_path(&self) -> Option<PathBuf> {
        self.shared
            .lock()
            .subscription
            .as_ref()
            .map(|s| s.path.clone())
    }

    /// Latest published snapshot
    pub fn current(&self) -> GitSnapshot {
        self.shared.lock().current.clone()
    }

    /// Start polling `path`, replacing any previous subscription.
    ///
    /// Watching the path that is already watched does nothing.
    pub fn watch(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let (stop_tx, stop_rx) = channel();

        let generation = {
            let mut state = self.shared.lock();
            if state.subscription.as_ref().is_some_and(|s| s.path == path) {
                return;
            }
            Self::teardown(&mut state);
            state.generation += 1;
            state.current = GitSnapshot::pending(path.clone());
            state.subscription = Some(Subscription {
                path: path.clone(),
                stop_tx,
            });
            state.generation
        };

        info!("Polling git stats for {} every {:?}", path.display(), self.interval);

        let worker = Worker {
            provider: Arc::clone(&self.provider),
            shared: Arc::clone(&self.shared),
            interval: self.interval,
            generation,
            path,
        };
        thread::spawn(move || worker.run(stop_rx));
    }

    /// Stop polling. No snapshot is delivered after this returns.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        if state.subscription.is_some() {
            Self::teardown(&mut state);
            state.generation += 1;
        }
    }

    fn teardown(state: &mut PollerState) {
        if let Some(subscription) = state.subscription.take() {
            debug!("Stopping git stats polling for {}", subscription.path.display());
            // The worker may already be gone
            let _ = subscription.stop_tx.send(());
        }
    }
}

impl Drop for GitStatsPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker {
    provider: Arc<dyn StatsProvider>,
    shared: Arc<Shared>,
    interval: Duration,
    generation: u64,
    path: PathBuf,
}

impl Worker {
    /// Fetch, publish, wait; until stopped or superseded.
    ///
    /// Fetches are serialized: the next one starts only after the previous
    /// result has been published and the interval has elapsed.
    fn run(self, stop_rx: Receiver<()>) {
        loop {
            let snapshot = match self.provider.fetch(&self.path) {
                Ok(stats) => GitSnapshot {
                    path: self.path.clone(),
                    stats: Arc::new(stats),
                    state: SnapshotState::Fresh,
                },
                Err(e) => {
                    warn!("Failed to fetch git stats for {}: {:#}", self.path.display(), e);
                    GitSnapshot {
                        path: self.path.clone(),
                        stats: Arc::new(GitStatsMap::new()),
                        state: SnapshotState::Failed,
                    }
                }
            };

            if !self.shared.publish(self.generation, snapshot) {
                break;
            }

            match stop_rx.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("Git stats worker for {} exited", self.path.display());
    }
}
