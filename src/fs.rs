//! Filesystem primitives the rename engine depends on.
//!
//! The engine only ever lists a directory, checks whether a path exists, and renames a path.
//! Checking that the root is a directory is the only other query.
//! Keeping those behind a trait lets tests inject failures at an exact step.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of a directory entry as reported by the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    File,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Folder => "folder",
            EntryKind::File => "file",
        }
    }
}

/// One raw listing result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub name: String,
    pub path: PathBuf,
    /// `None` for symlinks, sockets and anything else that is not a plain file or directory
    pub kind: Option<EntryKind>,
}

pub trait Filesystem {
    /// List the direct children of `dir`. Order is unspecified.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<FsEntry>>;

    /// Whether anything (file, directory or dangling symlink) occupies `path`.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Whether `path` resolves to a directory. Fails if nothing is there.
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// Rename within a single filesystem. Never falls back to copy + delete.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// The local (or locally mounted) filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<FsEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            let kind = if file_type.is_dir() {
                Some(EntryKind::Folder)
            } else if file_type.is_file() {
                Some(EntryKind::File)
            } else {
                None
            };

            entries.push(FsEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
                kind,
            });
        }

        Ok(entries)
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        match fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        fs::metadata(path).map(|m| m.is_dir())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_dir_reports_kinds() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Season 1")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let mut entries = LocalFs.list_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Season 1");
        assert_eq!(entries[0].kind, Some(EntryKind::Folder));
        assert_eq!(entries[1].name, "notes.txt");
        assert_eq!(entries[1].kind, Some(EntryKind::File));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_have_no_kind() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let entries = LocalFs.list_dir(dir.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.kind, None);
    }

    #[test]
    fn test_exists() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mkv");
        assert!(!LocalFs.exists(&file).unwrap());

        fs::write(&file, "x").unwrap();
        assert!(LocalFs.exists(&file).unwrap());
    }

    #[test]
    fn test_rename() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("a.mkv");
        let to = dir.path().join("b.mkv");
        fs::write(&from, "x").unwrap();

        LocalFs.rename(&from, &to).unwrap();

        assert!(!from.exists());
        assert!(to.exists());
    }

    #[test]
    fn test_is_dir() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mkv");
        fs::write(&file, "x").unwrap();

        assert!(LocalFs.is_dir(dir.path()).unwrap());
        assert!(!LocalFs.is_dir(&file).unwrap());
        let missing = LocalFs.is_dir(&dir.path().join("missing")).unwrap_err();
        assert_eq!(missing.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_list_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let result = LocalFs.list_dir(&dir.path().join("missing"));
        assert!(result.is_err());
    }
}
