//! Timezones for hour-of-day bucketing.
//!
//! A zone is either a fixed UTC offset ("+05:30", "-07:00", "UTC") or an IANA
//! name ("America/Denver") whose offset follows DST.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{FixedOffset, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Fixed(off) if off.local_minus_utc() == 0 => f.write_str("UTC"),
            Zone::Fixed(off) => write!(f, "{off}"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(Self::utc());
        }

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^(?:UTC)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("valid regex")
        });
        if let Some(caps) = re.captures(s) {
            let hours: i32 = caps[2].parse().map_err(|_| Error::InvalidTimezone(s.to_string()))?;
            let minutes: i32 = match caps.get(3) {
                Some(m) => m.as_str().parse().map_err(|_| Error::InvalidTimezone(s.to_string()))?,
                None => 0,
            };
            if minutes >= 60 {
                return Err(Error::InvalidTimezone(s.to_string()));
            }
            let secs = (hours * 3600 + minutes * 60) * if &caps[1] == "-" { -1 } else { 1 };
            return FixedOffset::east_opt(secs)
                .map(Zone::Fixed)
                .ok_or_else(|| Error::InvalidTimezone(s.to_string()));
        }

        s.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| Error::InvalidTimezone(s.to_string()))
    }
}

/// Local hour (0–23) in `zone` at which the epoch timestamp `ts` falls.
/// `None` only for timestamps outside chrono's representable range.
pub fn hour_of_day(ts: i64, zone: &Zone) -> Option<u32> {
    let utc = Utc.timestamp_opt(ts, 0).single()?;
    let hour = match zone {
        Zone::Fixed(off) => utc.with_timezone(off).hour(),
        Zone::Named(tz) => utc.with_timezone(tz).hour(),
    };
    Some(hour)
}
