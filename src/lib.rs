//! AURA: lazy, time-indexed access to the Australian Unified Radar Archive.
//!
//! ```no_run
//! use aura::{Archive, MatchMode, Query};
//! use time::macros::{date, datetime};
//!
//! let archive = Archive::new("/g/data/rq0/level_1/odim_pvol");
//!
//! // Every scan on one day; nothing is read yet.
//! let day = archive.volumes_on(2, date!(2025 - 10 - 16))?;
//! let morning = day.filter(Some(datetime!(2025-10-16 06:00)), Some(datetime!(2025-10-16 12:00)));
//!
//! // The scan closest to an instant, local time converted to UTC.
//! let volume = archive.volume_at(2, datetime!(2025-10-16 22:30 +10), MatchMode::Nearest)?;
//!
//! // Or from a string.
//! let resolved = archive.get_vol(2, &"2025-10-01..2025-10-07".parse::<Query>()?)?;
//! # Ok::<(), aura::volume::error::Error>(())
//! ```
//!
//! Each concern lives in its own crate, re-exported here: [`config`],
//! [`storage`], [`volume`] and [`sites`].

pub use aura_config as config;
pub use aura_sites as sites;
pub use aura_storage as storage;
pub use aura_volume as volume;

pub use aura_config::Config;
pub use aura_sites::{Band, RadarInfo, SiteCache, SiteCatalog, SiteFilter};
pub use aura_storage::Layout;
pub use aura_volume::{
    Availability, Decoded, Decoder, Dispatcher, Instant, InstantQuery, LazyVolumeRef, MatchMode, Query, RawVolume,
    ReadOptions, Resolved, Summary, VolumeCollection,
};

use aura_sites::error::Result as SitesResult;
use aura_volume::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::{Date, Duration};

/// An archive root and everything needed to query it.
///
/// Cheap to construct and safe to share between threads. The only state it
/// keeps is the radar site table, loaded on first use.
#[derive(Debug)]
pub struct Archive {
    dispatcher: Dispatcher,
    availability: Availability,
    sites: SiteCache,
    tolerance: Duration,
}

impl Archive {
    /// An archive rooted at `root`, with the default exact-match tolerance.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let layout = Layout::new(root);
        tracing::debug!(root = %layout.root().display(), "Opening archive");
        Self {
            sites: SiteCache::new(layout.site_list_path()),
            availability: Availability::new(layout.clone()),
            dispatcher: Dispatcher::new(layout),
            tolerance: aura_volume::DEFAULT_TOLERANCE,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_path).with_tolerance(config.tolerance())
    }

    /// Root and tolerance from the loaded configuration, with the root
    /// replaced by the process-wide override if one is set.
    pub fn from_env() -> aura_config::error::Result<Self> {
        let config = Config::load()?;
        let base_path = aura_config::base_path()?;
        Ok(Self::from_config(&Config { base_path, ..config }))
    }

    /// Tolerance used where no [`MatchMode`] is given explicitly.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    pub fn root(&self) -> &Path {
        self.layout().root()
    }

    pub fn layout(&self) -> &Layout {
        self.dispatcher.layout()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    /// Resolve any [`Query`]. See [`Dispatcher::resolve`] for how midnight
    /// instants are treated.
    pub fn get_vol(&self, radar_id: u32, query: &Query) -> Result<Resolved> {
        self.dispatcher.resolve(radar_id, query)
    }

    /// Every volume on `date`; a day without data is an error.
    pub fn volumes_on(&self, radar_id: u32, date: Date) -> Result<VolumeCollection> {
        self.dispatcher.day(radar_id, date)
    }

    /// Every volume from `start` to `end` inclusive; days without data are
    /// skipped.
    pub fn volumes_between(&self, radar_id: u32, start: Date, end: Date) -> Result<VolumeCollection> {
        self.dispatcher.range(radar_id, start, end)
    }

    /// The single volume matching `time`.
    pub fn volume_at(&self, radar_id: u32, time: impl Into<Instant>, mode: MatchMode) -> Result<LazyVolumeRef> {
        self.dispatcher.volume(radar_id, time.into(), mode)
    }

    /// The volume within this archive's tolerance of `time`.
    pub fn volume_exact(&self, radar_id: u32, time: impl Into<Instant>) -> Result<LazyVolumeRef> {
        self.volume_at(radar_id, time, MatchMode::Within(self.tolerance))
    }

    /// Find the volume nearest to `time` and decode it.
    pub fn read_vol<D: Decoder>(
        &self,
        radar_id: u32,
        time: impl Into<Instant>,
        decoder: &D,
        options: &ReadOptions,
    ) -> Result<Decoded<D::Dataset>> {
        self.volume_at(radar_id, time, MatchMode::Nearest)?.read(decoder, options)
    }

    /// The radar site table, read on first use and cached.
    pub fn sites(&self) -> SitesResult<Arc<SiteCatalog>> {
        self.sites.get()
    }

    /// One radar's configuration; see [`SiteCatalog::get`].
    pub fn site(&self, radar_id: u32, at: Option<Date>) -> SitesResult<RadarInfo> {
        Ok(self.sites()?.get(radar_id, at)?.clone())
    }

    pub fn reload_sites(&self) -> SitesResult<Arc<SiteCatalog>> {
        self.sites.reload()
    }

    pub fn invalidate_sites(&self) {
        self.sites.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_storage::mock::{MockArchive, every};
    use aura_volume::error::ErrorKind;
    use std::convert::Infallible;
    use tempfile::TempDir;
    use time::macros::{date, datetime, time};

    const SITE_LIST: &str = "\
id,id_long,WIGOS,short_name,location,radar_type,postchange_start,prechange_end,site_lat,site_lon,ge_ground_altitude,site_alt,status,band,doppler,dp,eth_dhz_threshold,beamwidth,state,notes
2,002_1,,MELB,Melbourne,WF44,-,31/3/2007,-37.855,144.755,10,45,OK,C,No,No,,1.9,VIC,
2,002_2,,MELB,Melbourne,Meteor1500S,1/4/2007,-,-37.855,144.755,10,45,OK,S,Yes,Yes,,,VIC,
";

    struct LengthDecoder;
    impl Decoder for LengthDecoder {
        type Dataset = usize;
        type Error = Infallible;
        fn decode(&self, _: &str, bytes: &[u8], _: &ReadOptions) -> std::result::Result<Decoded<usize>, Infallible> {
            Ok(Decoded::Dataset(bytes.len()))
        }
    }

    fn fixture() -> (TempDir, Archive) {
        let root = tempfile::tempdir().unwrap();
        let mock = MockArchive::new(root.path());
        mock.day(2, date!(2025 - 10 - 16), every(time!(0:00), Duration::minutes(10), 144)).unwrap();
        mock.day(2, date!(2025 - 10 - 18), [time!(9:00)]).unwrap();
        mock.site_list(SITE_LIST).unwrap();
        let archive = Archive::new(root.path());
        (root, archive)
    }

    #[test]
    fn test_day_and_range() {
        let (_root, archive) = fixture();
        assert_eq!(archive.volumes_on(2, date!(2025 - 10 - 16)).unwrap().len(), 144);
        let err = archive.volumes_on(2, date!(2025 - 10 - 17)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound { radar: 2, .. }));

        let range = archive.volumes_between(2, date!(2025 - 10 - 16), date!(2025 - 10 - 18)).unwrap();
        assert_eq!(range.len(), 145);
        assert_eq!(range.last().unwrap().timestamp(), datetime!(2025-10-18 09:00));
    }

    #[test]
    fn test_get_vol_from_parsed_query() {
        let (_root, archive) = fixture();
        let query: Query = "2025-10-16T12:30:20".parse().unwrap();
        let resolved = archive.get_vol(2, &query).unwrap();
        assert_eq!(resolved.volume().unwrap().name(), "2_20251016_123000.pvol.h5");

        let query: Query = "2025-10-16T00:00:00Z".parse().unwrap();
        assert_eq!(archive.get_vol(2, &query).unwrap().collection().unwrap().len(), 144);
    }

    #[test]
    fn test_volume_at_and_exact() {
        let (_root, archive) = fixture();
        let nearest = archive.volume_at(2, datetime!(2025-10-16 22:34 +10), MatchMode::Nearest).unwrap();
        assert_eq!(nearest.timestamp(), datetime!(2025-10-16 12:30));

        let err = archive.volume_exact(2, datetime!(2025-10-16 12:34)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::ToleranceExceeded { .. }));
        let lenient = Archive::new(archive.root()).with_tolerance(Duration::minutes(5));
        assert!(lenient.volume_exact(2, datetime!(2025-10-16 12:34)).is_ok());
    }

    #[test]
    fn test_read_vol_uses_nearest() {
        let (_root, archive) = fixture();
        let decoded = archive
            .read_vol(2, datetime!(2025-10-16 12:34), &LengthDecoder, &ReadOptions::default())
            .unwrap();
        assert_eq!(decoded, Decoded::Dataset("2_20251016_123000.pvol.h5".len()));
    }

    #[test]
    fn test_availability() {
        let (_root, archive) = fixture();
        let availability = archive.availability();
        assert!(availability.has_data(2, date!(2025 - 10 - 18)));
        assert_eq!(availability.dates(2, Some(2025), None, None).unwrap().len(), 2);
        assert_eq!(availability.summary(2).unwrap().total_days, 2);
    }

    #[test]
    fn test_sites_cached_until_reload() {
        let (root, archive) = fixture();
        assert_eq!(archive.site(2, None).unwrap().radar_type, "Meteor1500S");
        assert_eq!(archive.site(2, Some(date!(2001 - 01 - 01))).unwrap().radar_type, "WF44");

        let mock = MockArchive::new(root.path());
        let header = SITE_LIST.lines().next().unwrap();
        mock.site_list(&format!("{header}\n")).unwrap();
        assert_eq!(archive.sites().unwrap().len(), 2);
        assert!(archive.reload_sites().unwrap().is_empty());

        mock.site_list(SITE_LIST).unwrap();
        archive.invalidate_sites();
        assert_eq!(archive.sites().unwrap().radar_ids(), vec![2]);
    }

    #[test]
    fn test_from_config() {
        let config = Config { base_path: PathBuf::from("/somewhere/else"), tolerance_seconds: 120 };
        let archive = Archive::from_config(&config);
        assert_eq!(archive.root(), Path::new("/somewhere/else"));
        assert_eq!(archive.tolerance(), Duration::minutes(2));
    }

    #[test]
    fn test_from_env_honours_override() {
        let (root, _) = fixture();
        aura_config::set_base_path(root.path());
        let archive = Archive::from_env();
        aura_config::reset_base_path();
        let archive = archive.unwrap();
        assert_eq!(archive.root(), root.path());
        assert_eq!(archive.volumes_on(2, date!(2025 - 10 - 16)).unwrap().len(), 144);
    }
}
