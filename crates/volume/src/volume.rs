use crate::decode::{Decoded, Decoder, ReadOptions};
use crate::error::{ErrorKind, Result};
use crate::format_timestamp;
use aura_storage::{Container, VolumeName};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use time::PrimitiveDateTime;
use tracing::instrument;

/// A reference to one volume scan inside a per-day container.
///
/// Holds only the container path and the entry name (plus what the name
/// encodes). Nothing is opened or read until [`read`](Self::read),
/// [`read_raw`](Self::read_raw) or [`extract_to`](Self::extract_to) is
/// called, and each of those opens the container afresh, so references can be
/// cloned, sent across threads or serialized freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RefParts", try_from = "RefParts")]
pub struct LazyVolumeRef {
    archive: PathBuf,
    name: String,
    radar_id: u32,
    timestamp: PrimitiveDateTime,
}

/// Serialized shape of a [`LazyVolumeRef`]; the rest is derived from `name`.
#[derive(Serialize, Deserialize)]
struct RefParts {
    archive: PathBuf,
    name: String,
}

impl LazyVolumeRef {
    /// Reference the entry `name` inside the container at `archive`.
    ///
    /// Fails with [`InvalidFormat`](ErrorKind::InvalidFormat) if the name does
    /// not follow the volume grammar or encodes an impossible date or time.
    pub fn new(archive: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let parsed = VolumeName::parse(&name).or_raise(|| ErrorKind::InvalidFormat(name.clone()))?;
        Ok(Self::from_parsed(archive.into(), name, parsed))
    }

    pub(crate) fn from_parsed(archive: PathBuf, name: String, parsed: VolumeName) -> Self {
        Self { archive, name, radar_id: parsed.radar_id, timestamp: parsed.timestamp }
    }

    /// Path of the container holding this volume.
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Entry name inside the container.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn radar_id(&self) -> u32 {
        self.radar_id
    }

    /// Scan time, UTC.
    pub fn timestamp(&self) -> PrimitiveDateTime {
        self.timestamp
    }

    /// Entry name without its final extension (`2_20251016_123000.pvol`).
    pub fn stem(&self) -> &str {
        Path::new(&self.name).file_stem().and_then(|stem| stem.to_str()).unwrap_or(&self.name)
    }

    /// Final extension of the entry name, without the dot (`h5`).
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|ext| ext.to_str())
    }

    /// Read the entry and hand its bytes to `decoder`.
    #[instrument(skip_all, fields(volume = %self.name))]
    pub fn read<D: Decoder>(&self, decoder: &D, options: &ReadOptions) -> Result<Decoded<D::Dataset>> {
        let raw = self.read_raw()?;
        let decoded = decoder.decode(&self.name, raw.bytes(), options).or_raise(|| ErrorKind::Decode(self.name.clone()))?;
        Ok(decoded)
    }

    /// The entry's bytes, decompressed into memory and not interpreted.
    #[instrument(skip_all, fields(volume = %self.name, size))]
    pub fn read_raw(&self) -> Result<RawVolume> {
        let mut container = Container::open(&self.archive).or_raise(|| self.read_error())?;
        let bytes = container.read_entry(&self.name).or_raise(|| self.read_error())?;
        tracing::Span::current().record("size", bytes.len());
        Ok(RawVolume { name: self.name.clone(), bytes })
    }

    /// Write the entry to `directory/<name>`, creating `directory` if needed.
    /// Only the target file is replaced if it already exists.
    #[instrument(skip_all, fields(volume = %self.name, directory = %directory.as_ref().display()))]
    pub fn extract_to(&self, directory: impl AsRef<Path>) -> Result<PathBuf> {
        let mut container = Container::open(&self.archive).or_raise(|| self.read_error())?;
        let path = container.extract_entry(&self.name, directory.as_ref()).or_raise(|| self.read_error())?;
        Ok(path)
    }

    fn read_error(&self) -> ErrorKind {
        ErrorKind::ArchiveRead { archive: self.archive.clone(), entry: self.name.clone() }
    }
}

impl Display for LazyVolumeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} @ {}", self.name, format_timestamp(self.timestamp))
    }
}

impl From<LazyVolumeRef> for RefParts {
    fn from(volume: LazyVolumeRef) -> Self {
        Self { archive: volume.archive, name: volume.name }
    }
}

impl TryFrom<RefParts> for LazyVolumeRef {
    type Error = ErrorKind;
    fn try_from(parts: RefParts) -> std::result::Result<Self, Self::Error> {
        match VolumeName::parse(&parts.name) {
            Ok(parsed) => Ok(Self::from_parsed(parts.archive, parts.name, parsed)),
            Err(_) => Err(ErrorKind::InvalidFormat(parts.name)),
        }
    }
}

/// The undecoded bytes of one volume entry. Dropping it releases the memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVolume {
    name: String,
    bytes: Vec<u8>,
}
impl RawVolume {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
impl AsRef<[u8]> for RawVolume {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
