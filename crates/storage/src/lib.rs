//! Archive storage primitives for AURA.
//!
//! - [`Layout`] maps `(radar, date)` onto the expected container location.
//! - [`naming`] holds the container/volume naming grammar.
//! - [`Container`] opens a per-day zip and reads entries on demand.
//! - [`tree`] lists one directory level of the archive tree.
//!
//! Everything here is synchronous and read-only.

mod container;
pub mod error;
mod layout;
#[cfg(feature = "mock")]
pub mod mock;
pub mod naming;
mod path;
pub mod tree;

pub use crate::container::Container;
pub use crate::layout::{Layout, SITE_LIST_FILE, VOL_DIR};
pub use crate::naming::{ContainerName, VolumeName};
pub use crate::path::validate as validate_path;
