use crate::error::{ErrorKind, Result};
use crate::models::{Band, RadarInfo, SiteRow};
use csv::{ReaderBuilder, Trim};
use exn::ResultExt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use time::Date;
use tracing::instrument;

/// Criteria for [`SiteCatalog::list`]. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteFilter {
    /// Only configurations still in service.
    pub current_only: bool,
    pub band: Option<Band>,
    /// Case-insensitive state/territory, e.g. `VIC`.
    pub state: Option<String>,
    pub dual_pol_only: bool,
}
impl SiteFilter {
    fn matches(&self, radar: &RadarInfo) -> bool {
        if self.current_only && !radar.is_current() {
            return false;
        }
        if self.band.as_ref().is_some_and(|band| *band != radar.band) {
            return false;
        }
        if self.state.as_deref().is_some_and(|state| !state.eq_ignore_ascii_case(&radar.state)) {
            return false;
        }
        !self.dual_pol_only || radar.dual_pol
    }
}

/// Every radar configuration in the site table, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteCatalog {
    sites: Vec<RadarInfo>,
}
impl SiteCatalog {
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display(), count))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()))
            },
            Err(err) => return Err(err).or_raise(|| ErrorKind::Csv),
        };
        let catalog = Self::from_reader(file)?;
        tracing::Span::current().record("count", catalog.len());
        Ok(catalog)
    }

    /// Parse a site table. Rows that cannot be parsed are skipped with a
    /// warning; only a failure to read the input at all is an error.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut sites = Vec::new();
        for row in reader.deserialize::<SiteRow>() {
            match row {
                Ok(row) => sites.push(RadarInfo::from(row)),
                Err(err) if err.is_io_error() => return Err(err).or_raise(|| ErrorKind::Csv),
                Err(err) => {
                    let skipped = ErrorKind::MalformedRecord {
                        line: err.position().map(|p| p.line()).unwrap_or_default(),
                        reason: err.to_string(),
                    };
                    tracing::warn!(error = %skipped, "Skipping radar site row");
                },
            }
        }
        Ok(Self { sites })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RadarInfo> {
        self.sites.iter()
    }

    pub fn list(&self, filter: &SiteFilter) -> Vec<&RadarInfo> {
        self.sites.iter().filter(|radar| filter.matches(radar)).collect()
    }

    /// Look up a radar by id.
    ///
    /// With `at`, the configuration active on that date. Without it, or when
    /// nothing was active then, the current configuration, and failing that
    /// the one that started most recently.
    pub fn get(&self, id: u32, at: Option<Date>) -> Result<&RadarInfo> {
        let matches: Vec<&RadarInfo> = self.sites.iter().filter(|radar| radar.id == id).collect();
        if let Some(at) = at {
            if let Some(active) = matches.iter().copied().find(|radar| radar.active_at(at)) {
                return Ok(active);
            }
            if !matches.is_empty() {
                tracing::warn!(radar = id, date = %at, "No configuration active at date, using most recent");
            }
        }
        if let Some(current) = matches.iter().copied().find(|radar| radar.is_current()) {
            return Ok(current);
        }
        // Reversed so that equal start dates resolve to the first in file order.
        let latest = matches
            .into_iter()
            .rev()
            .max_by_key(|radar| radar.start_date.unwrap_or(Date::MIN))
            .ok_or(ErrorKind::UnknownRadar(id))?;
        Ok(latest)
    }

    /// Sorted, de-duplicated radar ids.
    pub fn radar_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.sites.iter().map(|radar| radar.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    pub(crate) const SITE_LIST: &str = "\
id,id_long,WIGOS,short_name,location,radar_type,postchange_start,prechange_end,site_lat,site_lon,ge_ground_altitude,site_alt,status,band,doppler,dp,eth_dhz_threshold,beamwidth,state,notes
2,002_1,0-20000-0-94866,MELB,Melbourne,WF44,-,31/3/2007,-37.855,144.755,10,45,OK,C,No,No,,1.9,VIC,original site
2,002_2,0-20000-0-94866,MELB,Melbourne,Meteor1500S,1/4/2007,-,-37.855,144.755,10,45,OK,S,Yes,Yes,,,VIC,
3,003_1,,WOLL,Wollongong,Meteor1500S,-,-,-34.263,150.875,400,487,OK,S,yes,no,,1.0,NSW,
not-a-number,bad,,BAD,Nowhere,X,-,-,0,0,0,0,OK,C,No,No,,,TAS,
64,064_1,,BUCK,Adelaide (Buckland Park),DWSR2502C,1/1/2000,30/6/2015,-34.617,138.469,,39,OK,C,Yes,Yes,,,SA,
64,064_2,,BUCK,Adelaide (Buckland Park),Meteor1600C,1/7/2015,1/1/2020,-34.617,138.469,,39,OK,C,Yes,Yes,,,SA,
";

    pub(crate) fn catalog() -> SiteCatalog {
        SiteCatalog::from_reader(SITE_LIST.as_bytes()).unwrap()
    }

    #[test]
    fn test_malformed_row_skipped() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.iter().all(|radar| radar.short_name != "BAD"));
    }

    #[test]
    fn test_row_fields() {
        let catalog = catalog();
        let melbourne = catalog.get(2, None).unwrap();
        assert_eq!(melbourne.id_long, "002_2");
        assert_eq!(melbourne.wigos, "0-20000-0-94866");
        assert_eq!(melbourne.start_date, Some(date!(2007 - 04 - 01)));
        assert_eq!(melbourne.end_date, None);
        assert_eq!(melbourne.lat, -37.855);
        assert_eq!(melbourne.site_altitude, 45.0);
        assert_eq!(melbourne.band, Band::S);
        assert!(melbourne.doppler);
        assert!(melbourne.dual_pol);
        assert_eq!(melbourne.beamwidth, 1.0);

        let adelaide = catalog.get(64, Some(date!(2010 - 01 - 01))).unwrap();
        assert_eq!(adelaide.ground_altitude, 0.0);
    }

    #[rstest]
    #[case(None, "002_2")]
    #[case(Some(date!(2000 - 06 - 01)), "002_1")]
    #[case(Some(date!(2007 - 03 - 31)), "002_1")]
    #[case(Some(date!(2007 - 04 - 01)), "002_2")]
    fn test_get_by_date(#[case] at: Option<Date>, #[case] expected: &str) {
        assert_eq!(catalog().get(2, at).unwrap().id_long, expected);
    }

    #[test]
    fn test_get_falls_back_to_latest_start() {
        let catalog = catalog();
        // Neither configuration is current; nothing was active in 1990.
        assert_eq!(catalog.get(64, None).unwrap().id_long, "064_2");
        assert_eq!(catalog.get(64, Some(date!(1990 - 01 - 01))).unwrap().id_long, "064_2");
        assert_eq!(catalog.get(64, Some(date!(2010 - 01 - 01))).unwrap().id_long, "064_1");
    }

    #[test]
    fn test_get_unknown() {
        let err = catalog().get(99, None).unwrap_err();
        assert_eq!(&*err, &ErrorKind::UnknownRadar(99));
    }

    #[rstest]
    #[case(SiteFilter::default(), &["002_1", "002_2", "003_1", "064_1", "064_2"])]
    #[case(SiteFilter { current_only: true, ..Default::default() }, &["002_2", "003_1"])]
    #[case(SiteFilter { band: Some(Band::S), ..Default::default() }, &["002_2", "003_1"])]
    #[case(SiteFilter { state: Some("vic".to_string()), ..Default::default() }, &["002_1", "002_2"])]
    #[case(SiteFilter { dual_pol_only: true, ..Default::default() }, &["002_2", "064_1", "064_2"])]
    #[case(SiteFilter { current_only: true, band: Some(Band::C), ..Default::default() }, &[])]
    fn test_list(#[case] filter: SiteFilter, #[case] expected: &[&str]) {
        let catalog = catalog();
        let listed: Vec<&str> = catalog.list(&filter).into_iter().map(|radar| radar.id_long.as_str()).collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_radar_ids() {
        assert_eq!(catalog().radar_ids(), vec![2, 3, 64]);
    }

    #[test]
    fn test_missing_required_column() {
        let catalog = SiteCatalog::from_reader("id,location\n2,Melbourne\n".as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radar_site_list.csv");
        let err = SiteCatalog::from_path(&path).unwrap_err();
        assert_eq!(&*err, &ErrorKind::NotFound(path.clone()));

        std::fs::write(&path, SITE_LIST).unwrap();
        assert_eq!(SiteCatalog::from_path(&path).unwrap(), catalog());
    }
}
