use git::{GitStatsPoller, SnapshotState};
use std::env;

fn main() {
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let (poller, updates) = GitStatsPoller::for_repository();
    poller.watch(&path);

    // Print the first five ticks, then stop
    for snapshot in updates.iter().take(5) {
        match snapshot.state {
            SnapshotState::Failed => println!("tick: no git data"),
            _ => println!("tick: {} changed files", snapshot.stats.len()),
        }
    }

    poller.stop();
}
