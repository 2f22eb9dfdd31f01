use super::{Band, parse_bool, parse_date, parse_float};
use serde::Deserialize;
use time::Date;

/// One configuration of a radar site.
///
/// A site that was upgraded (new transmitter, dual-pol added, relocated
/// antenna) appears once per configuration, each bounded by its own
/// `start_date`/`end_date`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarInfo {
    /// Numeric radar id, as used in archive paths.
    pub id: u32,
    /// Id with configuration suffix, e.g. `002_3`.
    pub id_long: String,
    /// WMO Integrated Global Observing System identifier.
    pub wigos: String,
    pub short_name: String,
    pub location: String,
    /// Radar model, e.g. `Meteor1500S`.
    pub radar_type: String,
    pub start_date: Option<Date>,
    /// `None` while this configuration is in service.
    pub end_date: Option<Date>,
    pub lat: f64,
    pub lon: f64,
    /// Ground elevation in metres.
    pub ground_altitude: f64,
    /// Antenna height in metres above sea level.
    pub site_altitude: f64,
    pub status: String,
    pub band: Band,
    pub doppler: bool,
    pub dual_pol: bool,
    /// Antenna beamwidth in degrees.
    pub beamwidth: f64,
    /// Australian state or territory.
    pub state: String,
    pub notes: String,
}
impl RadarInfo {
    pub fn name(&self) -> &str {
        &self.location
    }

    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn is_s_band(&self) -> bool {
        self.band == Band::S
    }

    pub fn is_c_band(&self) -> bool {
        self.band == Band::C
    }

    /// Whether this configuration covered `date`. Both bounds are inclusive
    /// and a missing bound is open.
    pub fn active_at(&self, date: Date) -> bool {
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        true
    }
}

/// A row of `radar_site_list.csv` as it appears on disk.
///
/// Columns the table carries but nothing reads (`eth_dhz_threshold`) are
/// ignored; optional columns may be absent from the header entirely.
#[derive(Debug, Deserialize)]
pub(crate) struct SiteRow {
    id: u32,
    id_long: String,
    #[serde(rename = "WIGOS", default)]
    wigos: String,
    short_name: String,
    location: String,
    radar_type: String,
    #[serde(default)]
    postchange_start: String,
    #[serde(default)]
    prechange_end: String,
    site_lat: String,
    site_lon: String,
    #[serde(default)]
    ge_ground_altitude: String,
    site_alt: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    band: String,
    #[serde(default)]
    doppler: String,
    #[serde(default)]
    dp: String,
    #[serde(default)]
    beamwidth: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    notes: String,
}
impl From<SiteRow> for RadarInfo {
    fn from(row: SiteRow) -> Self {
        Self {
            id: row.id,
            id_long: row.id_long,
            wigos: row.wigos,
            short_name: row.short_name,
            location: row.location,
            radar_type: row.radar_type,
            start_date: parse_date(&row.postchange_start),
            end_date: parse_date(&row.prechange_end),
            lat: parse_float(&row.site_lat, 0.0),
            lon: parse_float(&row.site_lon, 0.0),
            ground_altitude: parse_float(&row.ge_ground_altitude, 0.0),
            site_altitude: parse_float(&row.site_alt, 0.0),
            status: row.status,
            band: Band::from(row.band.as_str()),
            doppler: parse_bool(&row.doppler),
            dual_pol: parse_bool(&row.dp),
            beamwidth: parse_float(&row.beamwidth, 1.0),
            state: row.state,
            notes: row.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    fn radar(start: Option<Date>, end: Option<Date>) -> RadarInfo {
        RadarInfo {
            id: 2,
            id_long: "002_1".to_string(),
            wigos: String::new(),
            short_name: "MELB".to_string(),
            location: "Melbourne".to_string(),
            radar_type: "Meteor1500S".to_string(),
            start_date: start,
            end_date: end,
            lat: -37.855,
            lon: 144.755,
            ground_altitude: 0.0,
            site_altitude: 45.0,
            status: "OK".to_string(),
            band: Band::S,
            doppler: true,
            dual_pol: true,
            beamwidth: 1.0,
            state: "VIC".to_string(),
            notes: String::new(),
        }
    }

    #[rstest]
    #[case(None, None, date!(1990 - 01 - 01), true)]
    #[case(Some(date!(2010 - 01 - 01)), None, date!(2009 - 12 - 31), false)]
    #[case(Some(date!(2010 - 01 - 01)), None, date!(2010 - 01 - 01), true)]
    #[case(None, Some(date!(2010 - 01 - 01)), date!(2010 - 01 - 01), true)]
    #[case(None, Some(date!(2010 - 01 - 01)), date!(2010 - 01 - 02), false)]
    fn test_active_at(
        #[case] start: Option<Date>,
        #[case] end: Option<Date>,
        #[case] at: Date,
        #[case] expected: bool,
    ) {
        assert_eq!(radar(start, end).active_at(at), expected);
    }

    #[test]
    fn test_derived_properties() {
        let current = radar(Some(date!(2010 - 01 - 01)), None);
        assert_eq!(current.name(), "Melbourne");
        assert!(current.is_current());
        assert!(current.is_s_band());
        assert!(!current.is_c_band());
        assert!(!radar(None, Some(date!(2010 - 01 - 01))).is_current());
    }
}
