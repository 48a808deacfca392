use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::fs::Filesystem;
use crate::journal::Journal;
use crate::plan::{Operation, Plan};
use crate::progress::Progress;

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Source no longer exists: {0}")]
    SourceMissing(PathBuf),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Failed to check {path}: {source}")]
    Lookup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to rename '{}' to '{}': {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExecuteError {
    /// The tree no longer looks like it did at plan time
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ExecuteError::SourceMissing(_) | ExecuteError::DestinationExists(_)
        )
    }
}

/// Execution stopped part-way. `journal` holds every rename applied before
/// operation `index`, so the caller can still roll them back.
#[derive(Error, Debug)]
#[error("Stopped at operation {index} of {total}: {error}")]
pub struct ExecutionFailure {
    #[source]
    pub error: ExecuteError,
    /// 1-based position of the failed operation in the plan
    pub index: usize,
    pub total: usize,
    pub journal: Journal,
}

/// Apply a plan strictly in order, journaling each successful rename.
///
/// The first failed precondition or rename stops the run; nothing after it is
/// attempted and nothing is retried.
pub fn execute<F: Filesystem + ?Sized>(
    plan: &Plan,
    fs: &F,
    progress: &mut Progress,
) -> Result<Journal, ExecutionFailure> {
    let total = plan.len();
    let mut journal = Journal::new();

    info!(total, "Executing plan");
    progress.execute_start(total);

    for (i, op) in plan.operations().iter().enumerate() {
        if let Err(error) = apply(fs, op) {
            error!(
                index = i + 1,
                applied = journal.len(),
                "Execution stopped: {}",
                error
            );
            progress.execute_complete(journal.len(), total);
            return Err(ExecutionFailure {
                error,
                index: i + 1,
                total,
                journal,
            });
        }

        journal.record(op.destination.clone(), op.source.clone(), op.kind);

        let from = plan.relative(&op.source);
        let to = plan.relative(&op.destination);
        info!("Renamed: {} -> {}", from, to);
        progress.rename_progress(i + 1, total, &from, &to);
    }

    progress.execute_complete(journal.len(), total);

    Ok(journal)
}

fn apply<F: Filesystem + ?Sized>(fs: &F, op: &Operation) -> Result<(), ExecuteError> {
    debug!(source = ?op.source, destination = ?op.destination, "Checking preconditions");

    if !path_exists(fs, &op.source)? {
        return Err(ExecuteError::SourceMissing(op.source.clone()));
    }

    if path_exists(fs, &op.destination)? {
        return Err(ExecuteError::DestinationExists(op.destination.clone()));
    }

    fs.rename(&op.source, &op.destination)
        .map_err(|source| ExecuteError::Rename {
            from: op.source.clone(),
            to: op.destination.clone(),
            source,
        })
}

fn path_exists<F: Filesystem + ?Sized>(fs: &F, path: &std::path::Path) -> Result<bool, ExecuteError> {
    fs.exists(path).map_err(|source| ExecuteError::Lookup {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::testing::FaultyFs;
    use crate::fs::{EntryKind, LocalFs};
    use crate::matcher::PatternTable;
    use crate::plan::build_plan;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn scenario(root: &Path) -> PathBuf {
        let season = root.join("SEASON.01");
        fs::create_dir(&season).unwrap();
        fs::write(season.join("ep01.mkv"), "1").unwrap();
        fs::write(season.join("ep02.mkv"), "2").unwrap();
        fs::write(season.join("notes.txt"), "n").unwrap();
        season
    }

    fn plan_for(root: &Path) -> Plan {
        build_plan(&LocalFs, root, "Foo", &PatternTable::default()).unwrap()
    }

    #[test]
    fn test_execute_full_plan() {
        let dir = tempdir().unwrap();
        scenario(dir.path());
        let plan = plan_for(dir.path());

        let journal = execute(&plan, &LocalFs, &mut Progress::silent()).unwrap();

        assert_eq!(journal.len(), 3);
        let renamed = dir.path().join("Foo_S01");
        assert!(renamed.join("Foo_S01E01.mkv").exists());
        assert!(renamed.join("Foo_S01E02.mkv").exists());
        assert!(renamed.join("notes.txt").exists());
        assert!(!dir.path().join("SEASON.01").exists());
    }

    #[test]
    fn test_journal_records_destination_then_source_in_order() {
        let dir = tempdir().unwrap();
        let season = scenario(dir.path());
        let plan = plan_for(dir.path());

        let journal = execute(&plan, &LocalFs, &mut Progress::silent()).unwrap();
        let entries = journal.entries();

        assert_eq!(entries[0].original, season.join("ep01.mkv"));
        assert_eq!(entries[0].applied, season.join("Foo_S01E01.mkv"));
        assert_eq!(entries[2].original, season);
        assert_eq!(entries[2].applied, dir.path().join("Foo_S01"));
        assert_eq!(entries[2].kind, EntryKind::Folder);
    }

    #[test]
    fn test_destination_appearing_stops_execution() {
        let dir = tempdir().unwrap();
        let season = scenario(dir.path());
        let plan = plan_for(dir.path());

        // Another process creates the second destination after planning
        fs::write(season.join("Foo_S01E02.mkv"), "intruder").unwrap();

        let failure = execute(&plan, &LocalFs, &mut Progress::silent()).unwrap_err();

        assert!(matches!(failure.error, ExecuteError::DestinationExists(_)));
        assert!(failure.error.is_precondition());
        assert_eq!(failure.index, 2);
        assert_eq!(failure.total, 3);
        assert_eq!(failure.journal.len(), 1);
        assert!(season.join("Foo_S01E01.mkv").exists());
        assert!(season.join("ep02.mkv").exists());
        assert!(season.exists());
    }

    #[test]
    fn test_vanished_source_stops_execution() {
        let dir = tempdir().unwrap();
        let season = scenario(dir.path());
        let plan = plan_for(dir.path());

        fs::remove_file(season.join("ep01.mkv")).unwrap();

        let failure = execute(&plan, &LocalFs, &mut Progress::silent()).unwrap_err();

        assert!(matches!(failure.error, ExecuteError::SourceMissing(_)));
        assert_eq!(failure.index, 1);
        assert!(failure.journal.is_empty());
        assert!(season.join("ep02.mkv").exists());
    }

    #[test]
    fn test_rename_failure_keeps_partial_journal() {
        let dir = tempdir().unwrap();
        let season = scenario(dir.path());
        let plan = plan_for(dir.path());
        let fs = FaultyFs::failing_on(season.clone());

        let failure = execute(&plan, &fs, &mut Progress::silent()).unwrap_err();

        assert!(matches!(failure.error, ExecuteError::Rename { .. }));
        assert!(!failure.error.is_precondition());
        assert_eq!(failure.index, 3);
        assert_eq!(failure.journal.len(), 2);
        assert_eq!(fs.renames.get(), 2);
    }

    #[test]
    fn test_failure_at_k_leaves_k_minus_one_applied() {
        for k in 1..=3 {
            let dir = tempdir().unwrap();
            scenario(dir.path());
            let plan = plan_for(dir.path());
            let fs = FaultyFs::failing_on(plan.operations()[k - 1].source.clone());

            let failure = execute(&plan, &fs, &mut Progress::silent()).unwrap_err();

            assert_eq!(failure.index, k);
            assert_eq!(failure.journal.len(), k - 1);
            for op in &plan.operations()[k - 1..] {
                assert!(op.source.exists(), "{:?} should be untouched", op.source);
            }
        }
    }

    #[test]
    fn test_empty_plan_yields_empty_journal() {
        let dir = tempdir().unwrap();
        let plan = plan_for(dir.path());

        let journal = execute(&plan, &LocalFs, &mut Progress::silent()).unwrap();
        assert!(journal.is_empty());
    }
}
