//! Shallow directory listing over the archive tree.
//!
//! Only one directory level is read per call; availability queries never
//! need a recursive walk, and the archive is too large to walk casually.

use crate::error::{ErrorKind, Result};
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

/// A single child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Dir { name: String, path: PathBuf },
    File { name: String, path: PathBuf },
}
impl TreeEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Dir { name, .. } | Self::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Dir { path, .. } | Self::File { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Dir { .. })
    }
}

/// List the immediate children of `dir`, sorted by name.
///
/// A directory that does not exist lists as empty rather than failing: an
/// absent radar or year is an ordinary answer for the archive. Entries whose
/// names are not valid UTF-8, and anything that is neither a file nor a
/// directory (broken symlinks, sockets), are silently dropped.
pub fn list(dir: impl AsRef<Path>) -> Result<Vec<TreeEntry>> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => exn::bail!(ErrorKind::from_io(err, dir)),
    };
    let mut listed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ErrorKind::from_io(e, dir))?;
        if let Some(listing) = process_entry(&entry)? {
            listed.push(listing);
        }
    }
    listed.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(listed)
}

fn process_entry(entry: &DirEntry) -> Result<Option<TreeEntry>> {
    let path = entry.path();
    let Ok(name) = entry.file_name().into_string() else {
        return Ok(None);
    };
    // Follow symlinks: archive mounts commonly link year directories.
    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => exn::bail!(ErrorKind::from_io(err, &path)),
    };
    if metadata.is_dir() {
        return Ok(Some(TreeEntry::Dir { name, path }));
    }
    if metadata.is_file() {
        return Ok(Some(TreeEntry::File { name, path }));
    }
    Ok(None)
}

/// `true` if `path` exists and is a regular file. A single `stat`; never
/// lists a directory.
pub fn is_file(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list(dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_with_kinds() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("2025")).unwrap();
        fs::create_dir(dir.path().join("1993")).unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let listed = list(dir.path()).unwrap();
        let names: Vec<_> = listed.iter().map(TreeEntry::name).collect();
        assert_eq!(names, vec!["1993", "2025", "notes.txt"]);
        assert!(listed[0].is_dir());
        assert!(listed[1].is_dir());
        assert!(!listed[2].is_dir());
        assert_eq!(listed[2].path(), dir.path().join("notes.txt"));
    }

    #[test]
    fn test_is_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pvol.zip"), b"").unwrap();
        assert!(is_file(dir.path().join("a.pvol.zip")));
        assert!(!is_file(dir.path().join("b.pvol.zip")));
        assert!(!is_file(dir.path()));
    }
}
