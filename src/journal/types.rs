use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fs::EntryKind;
use crate::plan::relative_to;

pub const JOURNAL_VERSION: &str = "1.0";

/// One rename that has actually been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Where the entry lives now
    pub applied: PathBuf,
    /// Where it lived before the rename
    pub original: PathBuf,
    pub kind: EntryKind,
}

/// Renames in the exact order they were applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, applied: PathBuf, original: PathBuf, kind: EntryKind) {
        self.entries.push(JournalEntry {
            applied,
            original,
            kind,
        });
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl From<Vec<JournalEntry>> for Journal {
    fn from(entries: Vec<JournalEntry>) -> Self {
        Self { entries }
    }
}

/// Whether the run that produced a journal applied its whole plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Complete,
    Partial,
}

/// On-disk form of a journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalFile {
    /// Schema version for compatibility
    pub version: String,

    /// When the renames were executed
    pub executed_at: DateTime<Utc>,

    pub outcome: Outcome,

    /// Root the entry paths are relative to
    pub root: PathBuf,

    /// Series token used for destination names
    pub series: String,

    /// Tool version that created this journal
    pub tool_version: String,

    pub entries: Vec<JournalFileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JournalFileEntry {
    pub applied: String,
    pub original: String,
    pub kind: EntryKind,
}

impl JournalFile {
    pub fn from_journal(journal: &Journal, root: &Path, series: &str, outcome: Outcome) -> Self {
        let entries = journal
            .entries()
            .iter()
            .map(|e| JournalFileEntry {
                applied: relative_to(root, &e.applied),
                original: relative_to(root, &e.original),
                kind: e.kind,
            })
            .collect();

        Self {
            version: JOURNAL_VERSION.to_string(),
            executed_at: Utc::now(),
            outcome,
            root: root.to_path_buf(),
            series: series.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            entries,
        }
    }

    /// Rebuild the in-memory journal with absolute paths under `root`
    pub fn to_journal(&self) -> Journal {
        self.entries
            .iter()
            .map(|e| JournalEntry {
                applied: self.root.join(&e.applied),
                original: self.root.join(&e.original),
                kind: e.kind,
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// Generate the filename for this journal
    pub fn generate_filename(&self) -> String {
        let timestamp = self.executed_at.format("%Y%m%d-%H%M%S");
        format!("series-renamer-journal-{}.json", timestamp)
    }
}
