//! Lazy, time-indexed access to archived radar volumes.
//!
//! Nothing in this crate reads a volume's payload until asked to: scanning a
//! day lists entry names, and a [`LazyVolumeRef`] is only a path and a name
//! until [`read`](LazyVolumeRef::read) is called.

mod availability;
mod collection;
pub mod decode;
pub mod error;
mod query;
mod scan;
mod volume;

pub use crate::availability::{Availability, Summary};
pub use crate::collection::VolumeCollection;
pub use crate::decode::{Decoded, Decoder, ReadOptions};
pub use crate::query::{DEFAULT_TOLERANCE, Dispatcher, Instant, InstantQuery, MatchMode, Query, Resolved};
pub use crate::scan::scan;
pub use crate::volume::{LazyVolumeRef, RawVolume};

use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub(crate) const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// `YYYY-MM-DDTHH:MM:SS`, for display.
pub(crate) fn format_timestamp(timestamp: PrimitiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).unwrap_or_else(|_| timestamp.to_string())
}
