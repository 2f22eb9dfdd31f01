//! Archive directory layout.
//!
//! ```text
//! <root>/
//! ├── radar_site_list.csv
//! └── <radar>/
//!     └── <year>/
//!         └── vol/
//!             └── <radar>_<YYYYMMDD>.pvol.zip
//! ```

use crate::naming::ContainerName;
use std::path::{Path, PathBuf};
use time::Date;

/// Name of the per-year directory holding the daily containers.
pub const VOL_DIR: &str = "vol";
/// File name of the radar site table at the archive root.
pub const SITE_LIST_FILE: &str = "radar_site_list.csv";

/// Computes where things are expected to live under an archive root.
///
/// Pure path arithmetic: nothing here touches the filesystem, so a path
/// returned by [`container_path`](Self::container_path) may or may not exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    root: PathBuf,
}
impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<radar>`
    pub fn radar_root(&self, radar_id: u32) -> PathBuf {
        self.root.join(radar_id.to_string())
    }

    /// `<root>/<radar>/<year>`
    pub fn year_root(&self, radar_id: u32, year: i32) -> PathBuf {
        self.radar_root(radar_id).join(year.to_string())
    }

    /// `<root>/<radar>/<year>/vol`
    pub fn vol_dir(&self, radar_id: u32, year: i32) -> PathBuf {
        self.year_root(radar_id, year).join(VOL_DIR)
    }

    /// `<root>/<radar>/<year>/vol/<radar>_<YYYYMMDD>.pvol.zip`
    pub fn container_path(&self, radar_id: u32, date: Date) -> PathBuf {
        self.vol_dir(radar_id, date.year()).join(ContainerName::new(radar_id, date).to_string())
    }

    /// `<root>/radar_site_list.csv`
    pub fn site_list_path(&self) -> PathBuf {
        self.root.join(SITE_LIST_FILE)
    }
}
