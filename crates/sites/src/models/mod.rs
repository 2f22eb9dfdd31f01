mod band;
mod radar;

pub use self::band::Band;
pub use self::radar::RadarInfo;
pub(crate) use self::radar::SiteRow;

use time::{Date, Month};

/// `D/M/YYYY`; `-`, empty and anything unparsable mean "no date".
fn parse_date(value: &str) -> Option<Date> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        return None;
    }
    let mut parts = value.split('/');
    let (Some(day), Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    Date::from_calendar_date(year.parse().ok()?, month, day.parse().ok()?).ok()
}

/// Only `yes` (any case) is true.
fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}

fn parse_float(value: &str, default: f64) -> f64 {
    value.trim().parse().unwrap_or(default)
}
