//! Volume Error Types
//!
//! Absence is split three ways: a missing *day* is [`ErrorKind::NotFound`],
//! a day with scans but none close enough is [`ErrorKind::ToleranceExceeded`],
//! and a reference whose container or entry has since vanished is
//! [`ErrorKind::ArchiveRead`].

use derive_more::{Display, Error};
use std::path::PathBuf;
use time::{Date, Duration, PrimitiveDateTime};

/// A volume error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for volume operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An entry name does not follow `{radar}_{YYYYMMDD}_{HHMMSS}.pvol.h5`.
    #[display("invalid volume name: {_0}")]
    InvalidFormat(#[error(not(source))] String),
    /// A query string could not be understood.
    #[display("invalid query: {_0}")]
    InvalidQuery(#[error(not(source))] String),
    /// The requested day has no volumes at all.
    #[display("no data found for radar {radar} on {date}, expected container: {}", expected.display())]
    NotFound { radar: u32, date: Date, expected: PathBuf },
    /// The day has volumes, but none within the exact-match tolerance.
    #[display("no volume within {tolerance} of {target}, nearest is at {nearest} ({delta} away)")]
    ToleranceExceeded {
        target: PrimitiveDateTime,
        nearest: PrimitiveDateTime,
        delta: Duration,
        tolerance: Duration,
    },
    #[display("cannot find nearest volume in an empty collection")]
    EmptyCollection,
    /// The container or entry behind a reference could not be read.
    #[display("could not read {entry} from {}", archive.display())]
    ArchiveRead { archive: PathBuf, entry: String },
    /// The decoder rejected the entry's bytes.
    #[display("could not decode {_0}")]
    Decode(#[error(not(source))] String),
    #[display("archive storage error")]
    Storage,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage | Self::ArchiveRead { .. })
    }
}
