use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

use crate::fs::{EntryKind, Filesystem};

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Snapshot of a renameable candidate under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    /// Distance from the root: season folders are 1, episode files 2
    pub depth: usize,
    pub kind: EntryKind,
}

/// Make sure the root is an accessible directory before anything is planned
pub fn validate_root<F: Filesystem + ?Sized>(fs: &F, root: &Path) -> Result<(), ScannerError> {
    debug!(path = ?root, "Validating root");

    let is_dir = fs.is_dir(root).map_err(|e| map_read_error(root, e))?;
    if !is_dir {
        return Err(ScannerError::NotADirectory(root.to_path_buf()));
    }

    // A mount point can stat fine and still refuse listing
    fs.list_dir(root).map_err(|e| map_read_error(root, e))?;

    Ok(())
}

/// List the visible files and folders of `dir`, sorted by name
pub fn scan_entries<F: Filesystem + ?Sized>(
    fs: &F,
    dir: &Path,
    depth: usize,
) -> Result<Vec<Entry>, ScannerError> {
    debug!(path = ?dir, depth, "Scanning directory");

    let listing = fs.list_dir(dir).map_err(|e| map_read_error(dir, e))?;
    let mut entries = Vec::with_capacity(listing.len());

    for raw in listing {
        trace!(entry = ?raw.path, "Examining entry");

        if raw.name.starts_with('.') {
            trace!(name = %raw.name, "Skipping hidden entry");
            continue;
        }

        let Some(kind) = raw.kind else {
            trace!(name = %raw.name, "Skipping special entry");
            continue;
        };

        entries.push(Entry {
            name: raw.name,
            path: raw.path,
            depth,
            kind,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(count = entries.len(), "Scan complete");

    Ok(entries)
}

fn map_read_error(path: &Path, e: io::Error) -> ScannerError {
    match e.kind() {
        io::ErrorKind::NotFound => ScannerError::PathNotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => ScannerError::PermissionDenied(path.to_path_buf()),
        _ => ScannerError::IoError {
            path: path.to_path_buf(),
            source: e,
        },
    }
}
