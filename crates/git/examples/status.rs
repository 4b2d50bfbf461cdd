use anyhow::Result;
use git::{GitStatus, Repository};
use std::env;

fn main() -> Result<()> {
    // Use current directory if no path provided
    let path = env::args().nth(1).unwrap_or_else(|| ".".to_string());

    let repo = Repository::open(&path)?;
    println!("Opened repository at: {}", repo.work_dir().display());

    let stats = repo.stats()?;

    println!("\nAll changed files:");
    for entry in &stats {
        println!(
            "{:>9} +{:<4} -{:<4} {}",
            entry.status.to_string(),
            entry.added,
            entry.deleted,
            entry.path
        );
    }

    let (added, deleted) = stats.line_totals();
    println!("\n{} files, +{} -{}", stats.len(), added, deleted);

    println!("\nDeleted files:");
    for entry in stats.with_status(GitStatus::Deleted) {
        println!("  {}", entry.path);
    }

    Ok(())
}
