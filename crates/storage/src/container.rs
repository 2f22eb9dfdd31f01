//! Read-only access to a per-day zip container.
//!
//! A [`Container`] owns an open file handle for as long as it lives. Callers
//! are expected to open one, do their work, and drop it; nothing in this crate
//! keeps a container open between calls.

use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use exn::ResultExt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::ZipArchive;
use zip::result::ZipError;

/// Upper bound on the buffer reserved up front for an entry. Sizes come from
/// the container's headers, which may be corrupt; larger entries still read
/// in full, growing the buffer as they go.
const MAX_PREALLOCATION: usize = 64 << 20;

fn preallocation(declared: u64) -> usize {
    usize::try_from(declared).unwrap_or(usize::MAX).min(MAX_PREALLOCATION)
}

/// An opened zip container.
pub struct Container {
    path: PathBuf,
    archive: ZipArchive<File>,
}
impl Container {
    /// Open the container at `path`.
    ///
    /// Returns [`NotFound`](ErrorKind::NotFound) if the file is absent and
    /// [`InvalidContainer`](ErrorKind::InvalidContainer) if it is not a zip.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| ErrorKind::from_io(e, &path))?;
        let archive = ZipArchive::new(file).or_raise(|| ErrorKind::InvalidContainer(path.clone()))?;
        Ok(Self { path, archive })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries in the container, including ones that are not
    /// volume scans.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Entry names in central-directory order. Reads no entry data.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.archive.file_names()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.archive.index_for_name(entry).is_some()
    }

    /// Decompress a single entry into memory.
    #[instrument(skip(self), fields(container = %self.path.display(), size))]
    pub fn read_entry(&mut self, entry: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(entry) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => exn::bail!(ErrorKind::EntryNotFound {
                container: self.path.clone(),
                entry: entry.to_string(),
            }),
            Err(err) => return Err(err).or_raise(|| ErrorKind::InvalidContainer(self.path.clone())),
        };
        let mut bytes = Vec::with_capacity(preallocation(file.size()));
        file.read_to_end(&mut bytes).or_raise(|| ErrorKind::InvalidContainer(self.path.clone()))?;
        tracing::Span::current().record("size", bytes.len());
        Ok(bytes)
    }

    /// Decompress a single entry to `directory/<entry>`, creating the
    /// directory (and any parents) when needed. An existing file with the same
    /// name is overwritten; nothing else in the directory is touched.
    #[instrument(skip(self), fields(container = %self.path.display()))]
    pub fn extract_entry(&mut self, entry: &str, directory: impl AsRef<Path> + std::fmt::Debug) -> Result<PathBuf> {
        let directory = directory.as_ref();
        let target = directory.join(validate_path(entry)?);
        let mut file = match self.archive.by_name(entry) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => exn::bail!(ErrorKind::EntryNotFound {
                container: self.path.clone(),
                entry: entry.to_string(),
            }),
            Err(err) => return Err(err).or_raise(|| ErrorKind::InvalidContainer(self.path.clone())),
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
        }
        let mut output = File::create(&target).map_err(|e| ErrorKind::from_io(e, &target))?;
        io::copy(&mut file, &mut output).map_err(|e| ErrorKind::from_io(e, &target))?;
        tracing::debug!(path = %target.display(), "Extracted volume entry to disk");
        Ok(target)
    }
}
