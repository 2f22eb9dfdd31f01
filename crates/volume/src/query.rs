//! Temporal queries against the archive.
//!
//! A [`Query`] names what the caller wants (one instant, one day, or a range of
//! days) and the [`Dispatcher`] turns it into scans of the right containers.

use crate::TIMESTAMP_FORMAT;
use crate::collection::VolumeCollection;
use crate::error::{Error, ErrorKind, Result};
use crate::scan::scan;
use crate::volume::LazyVolumeRef;
use aura_storage::Layout;
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use tracing::instrument;

/// Tolerance used by exact-match lookups unless told otherwise.
pub const DEFAULT_TOLERANCE: Duration = Duration::seconds(60);

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A point in time, with or without an offset.
///
/// Archive timestamps are UTC, so a naive time is taken to already be UTC
/// and an offset time is converted to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instant {
    Naive(PrimitiveDateTime),
    Aware(OffsetDateTime),
}
impl Instant {
    /// The instant as a UTC wall-clock time. Fails with
    /// [`InvalidQuery`](ErrorKind::InvalidQuery) if the conversion leaves the
    /// supported date range.
    pub fn to_utc(self) -> Result<PrimitiveDateTime> {
        match self {
            Self::Naive(time) => Ok(time),
            Self::Aware(time) => {
                let Some(utc) = time.checked_to_offset(UtcOffset::UTC) else {
                    exn::bail!(ErrorKind::InvalidQuery(format!("{time} has no UTC equivalent")));
                };
                Ok(PrimitiveDateTime::new(utc.date(), utc.time()))
            },
        }
    }
}
impl From<PrimitiveDateTime> for Instant {
    fn from(time: PrimitiveDateTime) -> Self {
        Self::Naive(time)
    }
}
impl From<OffsetDateTime> for Instant {
    fn from(time: OffsetDateTime) -> Self {
        Self::Aware(time)
    }
}

/// How an instant is matched against the scans of its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Whichever scan is closest, however far away.
    Nearest,
    /// The closest scan, but only if it is within the tolerance.
    Within(Duration),
}
impl Default for MatchMode {
    fn default() -> Self {
        Self::Within(DEFAULT_TOLERANCE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantQuery {
    pub time: Instant,
    pub mode: MatchMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// The scan matching one instant.
    Instant(InstantQuery),
    /// Every scan on one UTC day.
    Day(Date),
    /// Every scan from `start` to `end`, both days inclusive.
    Range { start: Date, end: Date },
}
impl Query {
    pub fn nearest(time: impl Into<Instant>) -> Self {
        Self::Instant(InstantQuery { time: time.into(), mode: MatchMode::Nearest })
    }

    /// Exact match with the default tolerance.
    pub fn exact(time: impl Into<Instant>) -> Self {
        Self::within(time, DEFAULT_TOLERANCE)
    }

    pub fn within(time: impl Into<Instant>, tolerance: Duration) -> Self {
        Self::Instant(InstantQuery { time: time.into(), mode: MatchMode::Within(tolerance) })
    }

    pub fn day(date: Date) -> Self {
        Self::Day(date)
    }

    pub fn range(start: Date, end: Date) -> Self {
        Self::Range { start, end }
    }
}

/// Parses `YYYY-MM-DD`, `YYYY-MM-DD..YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` (UTC)
/// or RFC 3339 with an offset. Instants get the default exact-match mode.
impl FromStr for Query {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ErrorKind::InvalidQuery(s.to_string());
        if let Some((start, end)) = s.split_once("..") {
            let start = Date::parse(start.trim(), DATE_FORMAT).map_err(|_| invalid())?;
            let end = Date::parse(end.trim(), DATE_FORMAT).map_err(|_| invalid())?;
            return Ok(Self::range(start, end));
        }
        if let Ok(date) = Date::parse(s, DATE_FORMAT) {
            return Ok(Self::day(date));
        }
        if let Ok(time) = OffsetDateTime::parse(s, &Rfc3339) {
            return Ok(Self::exact(time));
        }
        if let Ok(time) = PrimitiveDateTime::parse(s, TIMESTAMP_FORMAT) {
            return Ok(Self::exact(time));
        }
        exn::bail!(invalid())
    }
}

/// What a query resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Volume(LazyVolumeRef),
    Collection(VolumeCollection),
}
impl Resolved {
    pub fn volume(&self) -> Option<&LazyVolumeRef> {
        match self {
            Self::Volume(volume) => Some(volume),
            Self::Collection(_) => None,
        }
    }

    pub fn collection(&self) -> Option<&VolumeCollection> {
        match self {
            Self::Volume(_) => None,
            Self::Collection(collection) => Some(collection),
        }
    }

    pub fn into_volume(self) -> Option<LazyVolumeRef> {
        match self {
            Self::Volume(volume) => Some(volume),
            Self::Collection(_) => None,
        }
    }

    pub fn into_collection(self) -> Option<VolumeCollection> {
        match self {
            Self::Volume(_) => None,
            Self::Collection(collection) => Some(collection),
        }
    }
}

/// Resolves [`Query`]s by scanning the containers they cover.
///
/// Holds nothing but the archive [`Layout`]; every call scans afresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatcher {
    layout: Layout,
}
impl Dispatcher {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Resolve any query.
    ///
    /// Instants at exactly midnight (UTC, to the nanosecond) in an exact-match
    /// mode are read as "the whole day" and resolve to a collection, as a
    /// bare date would. This includes a request for a real 00:00:00 scan;
    /// use [`MatchMode::Nearest`] or [`Dispatcher::volume`] to get that
    /// single volume.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, radar_id: u32, query: &Query) -> Result<Resolved> {
        match *query {
            Query::Range { start, end } => Ok(Resolved::Collection(self.range(radar_id, start, end)?)),
            Query::Day(date) => Ok(Resolved::Collection(self.day(radar_id, date)?)),
            Query::Instant(InstantQuery { time, mode }) => {
                let target = time.to_utc()?;
                if target.time() == Time::MIDNIGHT && mode != MatchMode::Nearest {
                    tracing::debug!(date = %target.date(), "Midnight instant treated as whole day");
                    return Ok(Resolved::Collection(self.day(radar_id, target.date())?));
                }
                Ok(Resolved::Volume(self.volume(radar_id, time, mode)?))
            },
        }
    }

    /// Every volume on `date`. A day without any is [`NotFound`](ErrorKind::NotFound).
    pub fn day(&self, radar_id: u32, date: Date) -> Result<VolumeCollection> {
        let expected = self.layout.container_path(radar_id, date);
        let volumes = scan(&expected)?;
        if volumes.is_empty() {
            exn::bail!(ErrorKind::NotFound { radar: radar_id, date, expected });
        }
        Ok(volumes)
    }

    /// Every volume from `start` to `end` inclusive, concatenated in day
    /// order. Days without data contribute nothing; `start > end` is empty.
    pub fn range(&self, radar_id: u32, start: Date, end: Date) -> Result<VolumeCollection> {
        let mut volumes = VolumeCollection::default();
        let mut current = Some(start);
        while let Some(date) = current.filter(|date| *date <= end) {
            volumes.extend(scan(self.layout.container_path(radar_id, date))?);
            current = date.next_day();
        }
        tracing::debug!(radar = radar_id, %start, %end, count = volumes.len(), "Scanned date range");
        Ok(volumes)
    }

    /// The single volume matching `time` on its UTC day, with no midnight
    /// special case.
    pub fn volume(&self, radar_id: u32, time: Instant, mode: MatchMode) -> Result<LazyVolumeRef> {
        let target = time.to_utc()?;
        let volumes = self.day(radar_id, target.date())?;
        let nearest = volumes.nearest(target)?;
        match mode {
            MatchMode::Nearest => Ok(nearest.clone()),
            MatchMode::Within(tolerance) => match volumes.at(target, tolerance) {
                Some(volume) => Ok(volume.clone()),
                None => exn::bail!(ErrorKind::ToleranceExceeded {
                    target,
                    nearest: nearest.timestamp(),
                    delta: (nearest.timestamp() - target).abs(),
                    tolerance,
                }),
            },
        }
    }
}
