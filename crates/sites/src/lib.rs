//! Radar site metadata.
//!
//! The archive root carries `radar_site_list.csv`: one row per radar
//! *configuration*, so a site that has been upgraded appears more than once.
//! [`SiteCatalog`] parses it and answers lookups; [`SiteCache`] holds a
//! catalog for as long as the caller wants it.

mod cache;
mod catalog;
pub mod error;
mod models;

pub use crate::cache::SiteCache;
pub use crate::catalog::{SiteCatalog, SiteFilter};
pub use crate::models::{Band, RadarInfo};
