//! Time-zone offset arithmetic and display strings.
//!
//! Everything here is pure: the caller supplies the reference instant, so the
//! same inputs always render the same strings.

use std::str::FromStr;

use chrono::{DateTime, Local, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::AppError;

/// Display string used when the target zone matches the viewer's offset.
pub const SAME_TIME: &str = "Same time";

/// Look up an IANA identifier in the bundled zone database.
pub fn resolve(identifier: &str) -> Option<Tz> {
    identifier.parse::<Tz>().ok()
}

/// UTC offset of `identifier` at `at`, in seconds east of UTC.
pub fn utc_offset_seconds(identifier: &str, at: DateTime<Utc>) -> Option<i32> {
    resolve(identifier).map(|tz| offset_of(tz, at))
}

fn offset_of(tz: Tz, at: DateTime<Utc>) -> i32 {
    at.with_timezone(&tz).offset().fix().local_minus_utc()
}

/// The viewer's own zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalZone {
    /// An explicit IANA zone
    Named(Tz),
    /// Whatever the operating system reports
    System,
}

impl LocalZone {
    pub fn named(identifier: &str) -> Option<Self> {
        resolve(identifier).map(LocalZone::Named)
    }

    pub fn utc_offset_seconds(&self, at: DateTime<Utc>) -> i32 {
        match self {
            LocalZone::Named(tz) => offset_of(*tz, at),
            LocalZone::System => Local
                .offset_from_utc_datetime(&at.naive_utc())
                .local_minus_utc(),
        }
    }
}

/// How time-of-day strings are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockStyle {
    /// `9:05 AM`
    #[default]
    TwelveHour,
    /// `09:05`
    TwentyFourHour,
}

impl ClockStyle {
    fn pattern(self) -> &'static str {
        match self {
            ClockStyle::TwelveHour => "%-I:%M %p",
            ClockStyle::TwentyFourHour => "%H:%M",
        }
    }
}

impl FromStr for ClockStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "12" | "12h" => Ok(ClockStyle::TwelveHour),
            "24" | "24h" => Ok(ClockStyle::TwentyFourHour),
            other => Err(AppError::BadRequest(format!(
                "Unknown clock style {:?} (expected 12h or 24h)",
                other
            ))),
        }
    }
}

/// Derived display fields for one zone at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneTime {
    /// Short time of day in the target zone; empty when the zone is unresolved.
    pub local_time: String,
    /// `"Same time"`, `"+Nh"` or `"-Nh"`; empty when the zone is unresolved.
    pub time_difference: String,
}

impl ZoneTime {
    pub fn is_resolved(&self) -> bool {
        !self.local_time.is_empty()
    }
}

/// Renders zone times relative to a fixed viewer zone.
#[derive(Debug, Clone, Copy)]
pub struct ZoneClock {
    local: LocalZone,
    style: ClockStyle,
}

impl ZoneClock {
    pub fn new(local: LocalZone, style: ClockStyle) -> Self {
        Self { local, style }
    }

    /// Time of day in `identifier` at `at`.
    pub fn local_time(&self, identifier: &str, at: DateTime<Utc>) -> Option<String> {
        let tz = resolve(identifier)?;
        Some(at.with_timezone(&tz).format(self.style.pattern()).to_string())
    }

    /// Offset of `identifier` relative to the viewer at `at`.
    pub fn time_difference(&self, identifier: &str, at: DateTime<Utc>) -> Option<String> {
        let target = utc_offset_seconds(identifier, at)?;
        let local = self.local.utc_offset_seconds(at);
        Some(format_difference(target - local))
    }

    /// Both display fields, empty when the zone does not resolve.
    pub fn zone_time(&self, identifier: &str, at: DateTime<Utc>) -> ZoneTime {
        match (
            self.local_time(identifier, at),
            self.time_difference(identifier, at),
        ) {
            (Some(local_time), Some(time_difference)) => ZoneTime {
                local_time,
                time_difference,
            },
            _ => ZoneTime::default(),
        }
    }
}

/// Format an offset difference in seconds.
///
/// Whole hours render as `+Nh` / `-Nh`; leftover minutes are appended
/// (`+5h30m`) rather than dropped.
pub fn format_difference(seconds: i32) -> String {
    if seconds == 0 {
        return SAME_TIME.to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600).abs() / 60;

    if minutes == 0 {
        return format!("{:+}h", hours);
    }

    let sign = if seconds < 0 { '-' } else { '+' };
    if hours == 0 {
        format!("{}{}m", sign, minutes)
    } else {
        format!("{}{}h{}m", sign, hours.abs(), minutes)
    }
}
