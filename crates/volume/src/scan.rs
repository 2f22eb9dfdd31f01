use crate::collection::VolumeCollection;
use crate::error::{ErrorKind, Result};
use crate::volume::LazyVolumeRef;
use aura_storage::Container;
use aura_storage::VolumeName;
use aura_storage::error::ErrorKind as StorageErrorKind;
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

/// List the volumes in one per-day container, sorted by timestamp.
///
/// Only the container's directory is read, never an entry's data. A missing
/// container is an empty collection. Entries whose names do not follow the
/// volume grammar are skipped. Volumes sharing a timestamp keep their order
/// in the container.
#[instrument(level = "debug", skip_all, fields(container = %path.as_ref().display(), count))]
pub fn scan(path: impl AsRef<Path>) -> Result<VolumeCollection> {
    let path = path.as_ref();
    let container = match Container::open(path) {
        Ok(container) => container,
        Err(err) if matches!(&*err, StorageErrorKind::NotFound(_)) => {
            tracing::debug!("Container does not exist");
            tracing::Span::current().record("count", 0);
            return Ok(VolumeCollection::default());
        },
        Err(err) => return Err(err).or_raise(|| ErrorKind::Storage),
    };
    let mut volumes = Vec::with_capacity(container.len());
    for name in container.entry_names() {
        match VolumeName::parse(name) {
            Ok(parsed) => volumes.push(LazyVolumeRef::from_parsed(path.to_path_buf(), name.to_string(), parsed)),
            Err(_) => tracing::trace!(entry = name, "Skipping entry that is not a volume"),
        }
    }
    volumes.sort_by_key(LazyVolumeRef::timestamp);
    tracing::Span::current().record("count", volumes.len());
    Ok(VolumeCollection::new(volumes))
}
