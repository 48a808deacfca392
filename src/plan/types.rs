use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fs::EntryKind;
use crate::scanner::ScannerError;

/// A single planned rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Full path to the entry as it is now
    pub source: PathBuf,
    /// Full path after the rename; always in the same parent as `source`
    pub destination: PathBuf,
    pub kind: EntryKind,
    /// Distance from the root
    pub depth: usize,
}

impl Operation {
    pub fn new(source: PathBuf, destination_name: &str, kind: EntryKind, depth: usize) -> Self {
        let destination = source
            .parent()
            .map(|p| p.join(destination_name))
            .unwrap_or_else(|| PathBuf::from(destination_name));

        Self {
            source,
            destination,
            kind,
            depth,
        }
    }
}

/// Ordered rename batch. Descendants always come before their ancestors.
#[derive(Debug, Clone)]
pub struct Plan {
    root: PathBuf,
    operations: Vec<Operation>,
}

impl Plan {
    pub(crate) fn new(root: PathBuf, operations: Vec<Operation>) -> Self {
        let plan = Self { root, operations };
        debug_assert!(plan.is_dependency_ordered());
        plan
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn count_of(&self, kind: EntryKind) -> usize {
        self.operations.iter().filter(|op| op.kind == kind).count()
    }

    /// No operation touches a path below one that an earlier operation
    /// already renamed.
    pub fn is_dependency_ordered(&self) -> bool {
        self.operations.iter().enumerate().all(|(i, earlier)| {
            self.operations[i + 1..].iter().all(|later| {
                !is_strict_ancestor(&earlier.source, &later.source)
                    && !is_strict_ancestor(&earlier.source, &later.destination)
                    && !is_strict_ancestor(&earlier.destination, &later.source)
                    && !is_strict_ancestor(&earlier.destination, &later.destination)
            })
        })
    }

    /// Path relative to the plan root, for display
    pub fn relative(&self, path: &Path) -> String {
        relative_to(&self.root, path)
    }
}

pub fn relative_to(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn is_strict_ancestor(ancestor: &Path, path: &Path) -> bool {
    path != ancestor && path.starts_with(ancestor)
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScannerError),

    #[error("Naming collision in {directory}: {destination}")]
    Collision {
        directory: PathBuf,
        destination: String,
        sources: Vec<String>,
    },
}
