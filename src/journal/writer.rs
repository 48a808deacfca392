use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::types::*;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("Failed to write journal file: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to serialize journal: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Failed to read journal file: {0}")]
    ReadError(String),

    #[error("Journal file version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// Write a journal file into `dir`, returning its path. Existing journals
/// are never overwritten.
pub fn write_journal(journal: &JournalFile, dir: &Path) -> Result<PathBuf, JournalError> {
    let file_path = dir.join(journal.generate_filename());

    if !file_path.exists() {
        return write_to_path(journal, &file_path);
    }

    warn!("Journal file already exists: {:?}", file_path);
    let stem = format!(
        "series-renamer-journal-{}-{}",
        journal.executed_at.format("%Y%m%d-%H%M%S"),
        journal.executed_at.timestamp_subsec_millis()
    );

    let mut unique = dir.join(format!("{}.json", stem));
    let mut attempt = 1;
    while unique.exists() {
        attempt += 1;
        unique = dir.join(format!("{}-{}.json", stem, attempt));
    }

    write_to_path(journal, &unique)
}

fn write_to_path(journal: &JournalFile, path: &Path) -> Result<PathBuf, JournalError> {
    let temp_path = path.with_extension("json.tmp");

    {
        let file = File::create(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, journal)?;
    }

    fs::rename(&temp_path, path)?;

    info!("Journal written to: {:?}", path);

    Ok(path.to_path_buf())
}
