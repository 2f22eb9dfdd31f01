//! On-disk archive fixtures for tests.
//!
//! Builds a miniature archive tree (real directories, real zip containers)
//! under a caller-provided root, usually a [`tempfile::TempDir`]. Each volume
//! entry's payload is its own entry name, which makes reads easy to assert on.
//!
//! ```
//! # use aura_storage::mock::{MockArchive, every};
//! # use time::{Date, Duration, Month, Time};
//! let root = tempfile::tempdir().unwrap();
//! let archive = MockArchive::new(root.path());
//! let day = Date::from_calendar_date(2025, Month::October, 16).unwrap();
//! archive.day(2, day, every(Time::MIDNIGHT, Duration::minutes(10), 144)).unwrap();
//! assert!(archive.layout().container_path(2, day).is_file());
//! ```

use crate::error::{ErrorKind, Result};
use crate::layout::Layout;
use crate::naming::VolumeName;
use exn::ResultExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use time::{Date, Duration, PrimitiveDateTime, Time};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for a fake archive rooted at a directory.
pub struct MockArchive {
    layout: Layout,
}
impl MockArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { layout: Layout::new(root) }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Write the container for `(radar, date)` holding one volume per time,
    /// in the given order.
    pub fn day(&self, radar_id: u32, date: Date, times: impl IntoIterator<Item = Time>) -> Result<PathBuf> {
        let names: Vec<String> = times
            .into_iter()
            .map(|time| VolumeName::new(radar_id, PrimitiveDateTime::new(date, time)).to_string())
            .collect();
        self.container(radar_id, date, names)
    }

    /// Write the container for `(radar, date)` with arbitrary entry names,
    /// including ones that break the naming grammar.
    pub fn container<S: AsRef<str>>(
        &self,
        radar_id: u32,
        date: Date,
        entries: impl IntoIterator<Item = S>,
    ) -> Result<PathBuf> {
        let path = self.layout.container_path(radar_id, date);
        write_container(&path, entries)?;
        Ok(path)
    }

    /// Create `<radar>/<year>/vol` without any containers in it.
    pub fn empty_year(&self, radar_id: u32, year: i32) -> Result<PathBuf> {
        let dir = self.layout.vol_dir(radar_id, year);
        fs::create_dir_all(&dir).map_err(|e| ErrorKind::from_io(e, &dir))?;
        Ok(dir)
    }

    /// Write an arbitrary file somewhere under the root (relative path).
    pub fn file(&self, relative: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.layout.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
        }
        fs::write(&path, contents).map_err(|e| ErrorKind::from_io(e, &path))?;
        Ok(path)
    }

    /// Write the radar site table at the archive root.
    pub fn site_list(&self, csv: &str) -> Result<PathBuf> {
        let path = self.layout.site_list_path();
        self.file(&path, csv)
    }
}

/// `count` times starting at `start`, `step` apart, wrapping past midnight.
pub fn every(start: Time, step: Duration, count: usize) -> Vec<Time> {
    let mut times = Vec::with_capacity(count);
    let mut current = start;
    for _ in 0..count {
        times.push(current);
        current += step;
    }
    times
}

fn write_container<S: AsRef<str>>(path: &Path, entries: impl IntoIterator<Item = S>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
    }
    let file = File::create(path).map_err(|e| ErrorKind::from_io(e, path))?;
    let invalid = || ErrorKind::InvalidContainer(path.to_path_buf());
    let mut writer = ZipWriter::new(file);
    for entry in entries {
        let name = entry.as_ref();
        writer.start_file(name, SimpleFileOptions::default()).or_raise(invalid)?;
        writer.write_all(name.as_bytes()).map_err(|e| ErrorKind::from_io(e, path))?;
    }
    writer.finish().or_raise(invalid)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Container;
    use time::macros::{date, time};

    #[test]
    fn test_every_wraps_past_midnight() {
        let times = every(time!(23:50), Duration::minutes(10), 3);
        assert_eq!(times, vec![time!(23:50), time!(0:00), time!(0:10)]);
    }

    #[test]
    fn test_day_writes_named_entries() {
        let root = tempfile::tempdir().unwrap();
        let archive = MockArchive::new(root.path());
        let path = archive.day(2, date!(2025 - 10 - 16), [time!(0:00), time!(12:30)]).unwrap();
        assert_eq!(path, root.path().join("2/2025/vol/2_20251016.pvol.zip"));

        let mut container = Container::open(&path).unwrap();
        let names: Vec<String> = container.entry_names().map(str::to_string).collect();
        assert_eq!(names, vec!["2_20251016_000000.pvol.h5", "2_20251016_123000.pvol.h5"]);
        assert_eq!(container.read_entry("2_20251016_123000.pvol.h5").unwrap(), b"2_20251016_123000.pvol.h5");
    }

    #[test]
    fn test_site_list_lands_at_root() {
        let root = tempfile::tempdir().unwrap();
        let archive = MockArchive::new(root.path());
        let path = archive.site_list("id\n2\n").unwrap();
        assert_eq!(path, root.path().join("radar_site_list.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "id\n2\n");
    }
}
