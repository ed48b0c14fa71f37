//! Timestamp placeholder values
//!
//! Computes the date/time fields used by the pretty log template in the
//! configured time zone.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time zone used when rendering dates
///
/// # Examples
///
/// ```
/// use pretty_logger::core::TimeZoneSetting;
///
/// let zone: TimeZoneSetting = serde_json::from_str("\"local\"").unwrap();
/// assert_eq!(zone, TimeZoneSetting::Local);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeZoneSetting {
    #[default]
    #[serde(rename = "UTC")]
    Utc,
    #[serde(rename = "local")]
    Local,
}

impl TimeZoneSetting {
    /// Wall-clock time of `date` in this zone
    pub fn wall_clock(&self, date: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            TimeZoneSetting::Utc => date.naive_utc(),
            TimeZoneSetting::Local => date.with_timezone(&Local).naive_local(),
        }
    }
}

/// Date fields of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFields {
    pub yyyy: String,
    pub mm: String,
    pub dd: String,
    pub hh: String,
    pub minutes: String,
    pub ss: String,
    pub ms: String,
}

impl DateFields {
    pub fn new(date: &DateTime<Utc>, zone: TimeZoneSetting) -> Self {
        let wall = zone.wall_clock(date);
        Self {
            yyyy: wall.format("%Y").to_string(),
            mm: wall.format("%m").to_string(),
            dd: wall.format("%d").to_string(),
            hh: wall.format("%H").to_string(),
            minutes: wall.format("%M").to_string(),
            ss: wall.format("%S").to_string(),
            ms: wall.format("%3f").to_string(),
        }
    }
}

/// `yyyy.mm.dd hh:MM:ss:ms` in a single formatting pass
pub fn compact_date_time(date: &DateTime<Utc>, zone: TimeZoneSetting) -> String {
    zone.wall_clock(date)
        .format("%Y.%m.%d %H:%M:%S:%3f")
        .to_string()
}

/// ISO-8601 with milliseconds; local times keep the `Z` suffix
pub fn raw_iso_str(date: &DateTime<Utc>, zone: TimeZoneSetting) -> String {
    zone.wall_clock(date)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// `raw_iso_str` with `T` as a space and no `Z`
pub fn date_iso_str(date: &DateTime<Utc>, zone: TimeZoneSetting) -> String {
    zone.wall_clock(date)
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}
