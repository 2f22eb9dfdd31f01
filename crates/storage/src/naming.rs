//! Archive naming grammar.
//!
//! | Kind      | Pattern                                   | Example                      |
//! |-----------|-------------------------------------------|------------------------------|
//! | Container | `{radar}_{YYYYMMDD}.pvol.zip`             | `2_20251016.pvol.zip`        |
//! | Volume    | `{radar}_{YYYYMMDD}_{HHMMSS}.pvol.h5`     | `2_20251016_123000.pvol.h5`  |
//!
//! Radar identifiers carry no leading zeros when rendered; times are UTC.

use crate::error::{Error, ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use regex::Regex;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;
use time::{Date, Month, PrimitiveDateTime, Time};

/// File extension of a per-day container (without the leading dot).
pub const CONTAINER_EXTENSION: &str = "pvol.zip";
/// File extension of a volume entry inside a container.
pub const VOLUME_EXTENSION: &str = "pvol.h5";

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// ASCII digits only; `\d` would also match other scripts' digits.
regex!(CONTAINER_REGEX, r"^([0-9]+)_([0-9]{8})\.pvol\.zip$");
regex!(VOLUME_REGEX, r"^([0-9]+)_([0-9]{8})_([0-9]{6})\.pvol\.h5$");

/// Parsed form of a volume entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VolumeName {
    pub radar_id: u32,
    /// Scan time, UTC.
    pub timestamp: PrimitiveDateTime,
}

/// Parsed form of a per-day container file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerName {
    pub radar_id: u32,
    pub date: Date,
}

impl VolumeName {
    pub fn new(radar_id: u32, timestamp: PrimitiveDateTime) -> Self {
        Self { radar_id, timestamp }
    }

    /// Parse an entry name such as `2_20251016_123000.pvol.h5`.
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = || ErrorKind::InvalidName(name.to_string());
        let captures = VOLUME_REGEX.captures(name).ok_or_raise(invalid)?;
        let radar_id = captures[1].parse::<u32>().or_raise(invalid)?;
        let date = parse_date(&captures[2]).ok_or_raise(invalid)?;
        let time = parse_time(&captures[3]).ok_or_raise(invalid)?;
        Ok(Self::new(radar_id, PrimitiveDateTime::new(date, time)))
    }
}

impl ContainerName {
    pub fn new(radar_id: u32, date: Date) -> Self {
        Self { radar_id, date }
    }

    /// Parse a container file name such as `2_20251016.pvol.zip`.
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = || ErrorKind::InvalidName(name.to_string());
        let captures = CONTAINER_REGEX.captures(name).ok_or_raise(invalid)?;
        let radar_id = captures[1].parse::<u32>().or_raise(invalid)?;
        let date = parse_date(&captures[2]).ok_or_raise(invalid)?;
        Ok(Self::new(radar_id, date))
    }
}

impl FromStr for VolumeName {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for ContainerName {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for VolumeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let time = self.timestamp.time();
        write!(
            f,
            "{}_{}_{:02}{:02}{:02}.{VOLUME_EXTENSION}",
            self.radar_id,
            compact_date(self.timestamp.date()),
            time.hour(),
            time.minute(),
            time.second(),
        )
    }
}

impl Display for ContainerName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}_{}.{CONTAINER_EXTENSION}", self.radar_id, compact_date(self.date))
    }
}

/// Render a date as `YYYYMMDD`.
pub fn compact_date(date: Date) -> String {
    format!("{:04}{:02}{:02}", date.year(), u8::from(date.month()), date.day())
}

fn parse_date(digits: &str) -> Option<Date> {
    let year = digits.get(0..4)?.parse().ok()?;
    let month = Month::try_from(digits.get(4..6)?.parse::<u8>().ok()?).ok()?;
    let day = digits.get(6..8)?.parse().ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

fn parse_time(digits: &str) -> Option<Time> {
    let hour = digits.get(0..2)?.parse().ok()?;
    let minute = digits.get(2..4)?.parse().ok()?;
    let second = digits.get(4..6)?.parse().ok()?;
    Time::from_hms(hour, minute, second).ok()
}
