use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::fs::Filesystem;
use crate::journal::{Journal, JournalEntry};
use crate::plan::relative_to;
use crate::progress::Progress;

#[derive(Error, Debug)]
pub enum RollbackStepError {
    #[error("Renamed entry is missing: {0}")]
    AppliedMissing(PathBuf),

    #[error("Original name is already taken: {0}")]
    OriginalOccupied(PathBuf),

    #[error("Failed to check {path}: {source}")]
    Lookup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to rename '{}' back to '{}': {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Rollback could not finish. Every entry in `pending` is still in its
/// renamed state and needs manual attention.
#[derive(Error, Debug)]
#[error("Rollback stopped after restoring {restored} entries: {error}")]
pub struct RollbackError {
    #[source]
    pub error: RollbackStepError,
    pub restored: usize,
    /// Entries not reversed, in the order they would have been reversed
    pub pending: Vec<JournalEntry>,
}

/// Undo a journal, newest rename first. Returns the number of entries restored.
pub fn rollback<F: Filesystem + ?Sized>(
    journal: &Journal,
    root: &Path,
    fs: &F,
    progress: &mut Progress,
) -> Result<usize, RollbackError> {
    let total = journal.len();
    warn!(total, "Starting rollback");
    progress.rollback_start(total);

    let reversed: Vec<&JournalEntry> = journal.entries().iter().rev().collect();

    for (i, entry) in reversed.iter().enumerate() {
        if let Err(error) = reverse(fs, entry) {
            let pending: Vec<JournalEntry> = reversed[i..].iter().map(|e| (*e).clone()).collect();
            error!(
                restored = i,
                pending = pending.len(),
                "Rollback stopped: {}",
                error
            );
            return Err(RollbackError {
                error,
                restored: i,
                pending,
            });
        }

        let from = relative_to(root, &entry.applied);
        let to = relative_to(root, &entry.original);
        info!("Rolled back: {} -> {}", from, to);
        progress.rollback_progress(i + 1, total, &from, &to);
    }

    warn!(restored = total, "Rollback complete");
    progress.rollback_complete(total);

    Ok(total)
}

fn reverse<F: Filesystem + ?Sized>(fs: &F, entry: &JournalEntry) -> Result<(), RollbackStepError> {
    if !path_exists(fs, &entry.applied)? {
        return Err(RollbackStepError::AppliedMissing(entry.applied.clone()));
    }

    if path_exists(fs, &entry.original)? {
        return Err(RollbackStepError::OriginalOccupied(entry.original.clone()));
    }

    fs.rename(&entry.applied, &entry.original)
        .map_err(|source| RollbackStepError::Rename {
            from: entry.applied.clone(),
            to: entry.original.clone(),
            source,
        })
}

fn path_exists<F: Filesystem + ?Sized>(fs: &F, path: &Path) -> Result<bool, RollbackStepError> {
    fs.exists(path).map_err(|source| RollbackStepError::Lookup {
        path: path.to_path_buf(),
        source,
    })
}
