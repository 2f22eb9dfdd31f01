use crate::error::{ErrorKind, Result};
use aura_storage::naming::CONTAINER_EXTENSION;
use aura_storage::tree::{self, TreeEntry};
use aura_storage::{ContainerName, Layout, VOL_DIR};
use exn::ResultExt;
use std::collections::BTreeSet;
use time::{Date, OffsetDateTime};
use tracing::instrument;

/// Overview of one radar's holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub radar_id: u32,
    pub years: BTreeSet<i32>,
    /// Earliest day in the earliest year.
    pub first_date: Option<Date>,
    /// Latest day in the latest year.
    pub last_date: Option<Date>,
    pub total_days: usize,
}

/// Answers "what is there?" from directory listings alone; no container is
/// opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    layout: Layout,
}
impl Availability {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Years with a `vol/` directory under the radar's root. Entries that are
    /// not numeric directories are ignored; an unknown radar has no years.
    #[instrument(level = "debug", skip(self))]
    pub fn years(&self, radar_id: u32) -> Result<BTreeSet<i32>> {
        let entries = tree::list(self.layout.radar_root(radar_id)).or_raise(|| ErrorKind::Storage)?;
        let years = entries
            .iter()
            .filter(|entry| entry.is_dir())
            .filter(|entry| entry.path().join(VOL_DIR).exists())
            .filter_map(|entry| parse_year(entry.name()))
            .collect();
        Ok(years)
    }

    /// Days with a container, optionally narrowed.
    ///
    /// Which years are listed:
    ///
    /// | `year`  | `start` | `end`   | Years searched                       |
    /// |---------|---------|---------|--------------------------------------|
    /// | `Some`  | any     | any     | that year only                       |
    /// | `None`  | `Some`  | `Some`  | `start.year..=end.year`              |
    /// | `None`  | `Some`  | `None`  | `start.year..=` the current UTC year |
    /// | `None`  | `None`  | `Some`  | known years up to `end.year`         |
    /// | `None`  | `None`  | `None`  | all known years                      |
    ///
    /// `start` and `end` then bound the result inclusively.
    #[instrument(level = "debug", skip(self))]
    pub fn dates(
        &self,
        radar_id: u32,
        year: Option<i32>,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<BTreeSet<Date>> {
        let years: Vec<i32> = match (year, start, end) {
            (Some(year), _, _) => vec![year],
            (None, Some(start), Some(end)) => (start.year()..=end.year()).collect(),
            (None, Some(start), None) => (start.year()..=OffsetDateTime::now_utc().year()).collect(),
            (None, None, Some(end)) => self.years(radar_id)?.into_iter().filter(|year| *year <= end.year()).collect(),
            (None, None, None) => self.years(radar_id)?.into_iter().collect(),
        };
        let mut dates = BTreeSet::new();
        for year in years {
            let entries = tree::list(self.layout.vol_dir(radar_id, year)).or_raise(|| ErrorKind::Storage)?;
            dates.extend(
                entries
                    .iter()
                    .filter_map(container_date)
                    .filter(|date| start.is_none_or(|start| *date >= start))
                    .filter(|date| end.is_none_or(|end| *date <= end)),
            );
        }
        Ok(dates)
    }

    /// Whether the container for `date` exists. One `stat`, no listing.
    pub fn has_data(&self, radar_id: u32, date: Date) -> bool {
        tree::is_file(self.layout.container_path(radar_id, date))
    }

    /// Years, first and last day, and the number of days with data.
    ///
    /// First and last come from the first and last year only. Counting days
    /// lists every year's directory, which is slow for long-lived radars.
    #[instrument(level = "debug", skip(self))]
    pub fn summary(&self, radar_id: u32) -> Result<Summary> {
        let years = self.years(radar_id)?;
        let (Some(&first_year), Some(&last_year)) = (years.first(), years.last()) else {
            return Ok(Summary { radar_id, years, first_date: None, last_date: None, total_days: 0 });
        };
        let first_date = self.dates(radar_id, Some(first_year), None, None)?.first().copied();
        let last_date = self.dates(radar_id, Some(last_year), None, None)?.last().copied();
        let mut total_days = 0;
        for year in &years {
            total_days += self.dates(radar_id, Some(*year), None, None)?.len();
        }
        Ok(Summary { radar_id, years, first_date, last_date, total_days })
    }
}

fn parse_year(name: &str) -> Option<i32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

fn container_date(entry: &TreeEntry) -> Option<Date> {
    let TreeEntry::File { name, .. } = entry else {
        return None;
    };
    if !name.ends_with(CONTAINER_EXTENSION) {
        return None;
    }
    match ContainerName::parse(name) {
        Ok(parsed) => Some(parsed.date),
        Err(_) => {
            tracing::trace!(entry = %name, "Skipping malformed container name");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_storage::mock::MockArchive;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;
    use time::macros::{date, time};

    /// Radar 2 with data in 2019 (2 days), 2024 (1 day) and 2025 (3 days), an
    /// empty 2020, a year without `vol/`, and some clutter.
    fn archive() -> (TempDir, Availability) {
        let root = tempfile::tempdir().unwrap();
        let archive = MockArchive::new(root.path());
        for date in [
            date!(2019 - 03 - 01),
            date!(2019 - 12 - 31),
            date!(2024 - 06 - 15),
            date!(2025 - 01 - 01),
            date!(2025 - 10 - 16),
            date!(2025 - 10 - 17),
        ] {
            archive.day(2, date, [time!(0:00)]).unwrap();
        }
        archive.empty_year(2, 2020).unwrap();
        fs::create_dir_all(root.path().join("2/2021")).unwrap();
        fs::create_dir_all(root.path().join("2/latest/vol")).unwrap();
        archive.file("2/1999", "not a directory").unwrap();
        archive.file("2/2025/vol/README.txt", "notes").unwrap();
        archive.file("2/2025/vol/2_20251399.pvol.zip", "bad date").unwrap();
        archive.file("2/2025/vol/2_२०२५१०१९.pvol.zip", "not ascii").unwrap();
        archive.file("2/2025/vol/2_20251018.pvol.zip.partial", "in flight").unwrap();
        let availability = Availability::new(archive.layout().clone());
        (root, availability)
    }

    #[test]
    fn test_years() {
        let (_root, availability) = archive();
        assert_eq!(availability.years(2).unwrap(), BTreeSet::from([2019, 2020, 2024, 2025]));
        assert!(availability.years(3).unwrap().is_empty());
    }

    #[test]
    fn test_dates_all() {
        let (_root, availability) = archive();
        let dates = availability.dates(2, None, None, None).unwrap();
        assert_eq!(dates.len(), 6);
        assert_eq!(dates.first(), Some(&date!(2019 - 03 - 01)));
        assert_eq!(dates.last(), Some(&date!(2025 - 10 - 17)));
    }

    #[rstest]
    #[case(Some(2025), None, None, 3)]
    #[case(Some(2025), Some(date!(2025 - 10 - 16)), None, 2)]
    #[case(Some(2030), None, None, 0)]
    #[case(None, Some(date!(2019 - 06 - 01)), Some(date!(2025 - 01 - 01)), 3)]
    #[case(None, Some(date!(2024 - 01 - 01)), None, 4)]
    #[case(None, None, Some(date!(2024 - 12 - 31)), 3)]
    #[case(None, Some(date!(2025 - 10 - 18)), Some(date!(2025 - 10 - 01)), 0)]
    fn test_dates_filtered(
        #[case] year: Option<i32>,
        #[case] start: Option<Date>,
        #[case] end: Option<Date>,
        #[case] expected: usize,
    ) {
        let (_root, availability) = archive();
        assert_eq!(availability.dates(2, year, start, end).unwrap().len(), expected);
    }

    #[test]
    fn test_has_data() {
        let (_root, availability) = archive();
        assert!(availability.has_data(2, date!(2025 - 10 - 16)));
        assert!(!availability.has_data(2, date!(2025 - 10 - 18)));
        assert!(!availability.has_data(3, date!(2025 - 10 - 16)));
    }

    #[test]
    fn test_summary() {
        let (_root, availability) = archive();
        let summary = availability.summary(2).unwrap();
        assert_eq!(
            summary,
            Summary {
                radar_id: 2,
                years: BTreeSet::from([2019, 2020, 2024, 2025]),
                first_date: Some(date!(2019 - 03 - 01)),
                last_date: Some(date!(2025 - 10 - 17)),
                total_days: 6,
            }
        );
    }

    #[test]
    fn test_summary_unknown_radar() {
        let (_root, availability) = archive();
        let summary = availability.summary(71).unwrap();
        assert!(summary.years.is_empty());
        assert_eq!(summary.first_date, None);
        assert_eq!(summary.last_date, None);
        assert_eq!(summary.total_days, 0);
    }
}
