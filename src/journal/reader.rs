use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path};

use super::types::*;
use super::writer::JournalError;

/// Read and parse a journal file
pub fn read_journal(path: &Path) -> Result<JournalFile, JournalError> {
    let file = File::open(path)
        .map_err(|e| JournalError::ReadError(format!("Cannot open file: {}", e)))?;

    let reader = BufReader::new(file);
    let journal: JournalFile = serde_json::from_reader(reader)
        .map_err(|e| JournalError::ReadError(format!("Invalid JSON: {}", e)))?;

    if journal.version != JOURNAL_VERSION {
        return Err(JournalError::VersionMismatch {
            expected: JOURNAL_VERSION.to_string(),
            found: journal.version,
        });
    }

    for entry in &journal.entries {
        check_entry_path(&entry.applied)?;
        check_entry_path(&entry.original)?;
    }

    Ok(journal)
}

/// Entry paths must stay inside the journal's root
fn check_entry_path(path: &str) -> Result<(), JournalError> {
    let escapes = Path::new(path).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if path.is_empty() || escapes {
        return Err(JournalError::ReadError(format!(
            "Entry path '{}' is not inside the journal root",
            path
        )));
    }

    Ok(())
}
