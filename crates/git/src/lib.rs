// Git integration for changescope
// This crate reports per-file change stats for a working directory and keeps
// them refreshed on a fixed interval.

mod poller;
mod repository;
mod status;

pub use poller::{
    GitSnapshot, GitStatsPoller, RepositoryStatsProvider, SnapshotState, StatsProvider,
    DEFAULT_POLL_INTERVAL,
};
pub use repository::Repository;
pub use status::{GitStatsEntry, GitStatsMap, GitStatus};
