use crate::decode::{Decoded, Decoder, ReadOptions};
use crate::error::{ErrorKind, Result};
use crate::format_timestamp;
use crate::volume::LazyVolumeRef;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{Add, Bound, RangeBounds};
use time::{Duration, PrimitiveDateTime};

/// An ordered list of [`LazyVolumeRef`]s.
///
/// Order is whatever produced the collection (a scan yields ascending
/// timestamps) and duplicate timestamps are kept. Every transformation
/// returns a new collection; iterating never reads a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeCollection {
    volumes: Vec<LazyVolumeRef>,
}

impl VolumeCollection {
    pub fn new(volumes: Vec<LazyVolumeRef>) -> Self {
        Self { volumes }
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LazyVolumeRef> {
        self.volumes.get(index)
    }

    pub fn first(&self) -> Option<&LazyVolumeRef> {
        self.volumes.first()
    }

    pub fn last(&self) -> Option<&LazyVolumeRef> {
        self.volumes.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LazyVolumeRef> {
        self.volumes.iter()
    }

    pub fn as_slice(&self) -> &[LazyVolumeRef] {
        &self.volumes
    }

    pub fn into_vec(self) -> Vec<LazyVolumeRef> {
        self.volumes
    }

    pub fn timestamps(&self) -> Vec<PrimitiveDateTime> {
        self.volumes.iter().map(LazyVolumeRef::timestamp).collect()
    }

    /// A sub-collection by index range. Out-of-range bounds are clamped to
    /// the collection rather than panicking.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let len = self.volumes.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return Self::default();
        }
        Self::new(self.volumes[start..end].to_vec())
    }

    /// Volumes with `start <= timestamp <= end`; either bound may be open.
    pub fn filter(&self, start: Option<PrimitiveDateTime>, end: Option<PrimitiveDateTime>) -> Self {
        self.filter_with(start, end, |_| true)
    }

    /// As [`filter`](Self::filter), additionally keeping only volumes for
    /// which `predicate` holds.
    pub fn filter_with(
        &self,
        start: Option<PrimitiveDateTime>,
        end: Option<PrimitiveDateTime>,
        mut predicate: impl FnMut(&LazyVolumeRef) -> bool,
    ) -> Self {
        self.volumes
            .iter()
            .filter(|volume| start.is_none_or(|start| volume.timestamp() >= start))
            .filter(|volume| end.is_none_or(|end| volume.timestamp() <= end))
            .filter(|volume| predicate(*volume))
            .cloned()
            .collect()
    }

    /// The volume whose timestamp is closest to `target`. On an exact tie the
    /// one appearing first in the collection wins.
    pub fn nearest(&self, target: PrimitiveDateTime) -> Result<&LazyVolumeRef> {
        // `min_by_key` keeps the first of several equal minima.
        let nearest = self.volumes.iter().min_by_key(|volume| (volume.timestamp() - target).abs());
        match nearest {
            Some(volume) => Ok(volume),
            None => exn::bail!(ErrorKind::EmptyCollection),
        }
    }

    /// [`nearest`](Self::nearest), but only if it lies within `tolerance`
    /// (inclusive) of `target`.
    pub fn at(&self, target: PrimitiveDateTime, tolerance: Duration) -> Option<&LazyVolumeRef> {
        let nearest = self.nearest(target).ok()?;
        ((nearest.timestamp() - target).abs() <= tolerance).then_some(nearest)
    }

    /// Sorted by timestamp, newest first when `descending`. Equal timestamps
    /// keep their relative order either way.
    pub fn sort(&self, descending: bool) -> Self {
        let mut volumes = self.volumes.clone();
        if descending {
            volumes.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        } else {
            volumes.sort_by_key(LazyVolumeRef::timestamp);
        }
        Self::new(volumes)
    }

    /// `self` followed by `other`. No de-duplication and no re-sorting.
    pub fn concat(&self, other: &Self) -> Self {
        let mut volumes = Vec::with_capacity(self.len() + other.len());
        volumes.extend_from_slice(&self.volumes);
        volumes.extend_from_slice(&other.volumes);
        Self::new(volumes)
    }

    /// Read every volume in order, one result per reference. Reads happen as
    /// the iterator advances; a failure does not stop later reads.
    pub fn iter_read<'a, D: Decoder>(
        &'a self,
        decoder: &'a D,
        options: &'a ReadOptions,
    ) -> impl Iterator<Item = Result<Decoded<D::Dataset>>> + 'a {
        self.volumes.iter().map(move |volume| volume.read(decoder, options))
    }
}

impl Add for VolumeCollection {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        self.volumes.extend(other.volumes);
        self
    }
}

impl Extend<LazyVolumeRef> for VolumeCollection {
    fn extend<I: IntoIterator<Item = LazyVolumeRef>>(&mut self, iter: I) {
        self.volumes.extend(iter);
    }
}

impl From<Vec<LazyVolumeRef>> for VolumeCollection {
    fn from(volumes: Vec<LazyVolumeRef>) -> Self {
        Self::new(volumes)
    }
}

impl FromIterator<LazyVolumeRef> for VolumeCollection {
    fn from_iter<I: IntoIterator<Item = LazyVolumeRef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for VolumeCollection {
    type Item = LazyVolumeRef;
    type IntoIter = std::vec::IntoIter<LazyVolumeRef>;
    fn into_iter(self) -> Self::IntoIter {
        self.volumes.into_iter()
    }
}

impl<'a> IntoIterator for &'a VolumeCollection {
    type Item = &'a LazyVolumeRef;
    type IntoIter = std::slice::Iter<'a, LazyVolumeRef>;
    fn into_iter(self) -> Self::IntoIter {
        self.volumes.iter()
    }
}

impl Display for VolumeCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match (self.volumes.first(), self.volumes.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "{} volumes, radar {}, {} to {}",
                self.volumes.len(),
                first.radar_id(),
                format_timestamp(first.timestamp()),
                format_timestamp(last.timestamp()),
            ),
            _ => write!(f, "no volumes"),
        }
    }
}
