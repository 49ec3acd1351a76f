use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{Error, Result};

/// A calendar month, ordered chronologically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Build a month from a 4-digit year and a month number in 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1000..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    /// The month a given date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parses "YYYY-MM" (also accepts "YYYY/MM").
impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^(\d{4})[-/](\d{1,2})$").expect("valid regex"));
        let caps = re
            .captures(s.trim())
            .ok_or_else(|| Error::InvalidMonth(s.to_string()))?;
        let year = caps[1].parse().map_err(|_| Error::InvalidMonth(s.to_string()))?;
        let month = caps[2].parse().map_err(|_| Error::InvalidMonth(s.to_string()))?;
        Month::new(year, month)
    }
}

/// Locator of one month of a player's games, e.g.
/// `https://api.chess.com/pub/player/<user>/games/2022/08`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveRef {
    url: String,
    month: Month,
}

impl ArchiveRef {
    /// Decode the trailing `YYYY/MM` path segments of an archive URL.
    pub fn parse(url: &str) -> Result<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"/(\d{4})/(\d{2})/?$").expect("valid regex"));
        let malformed = || Error::MalformedArchive { url: url.to_string() };

        let caps = re.captures(url.trim()).ok_or_else(malformed)?;
        let year = caps[1].parse().map_err(|_| malformed())?;
        let month = caps[2].parse().map_err(|_| malformed())?;
        let month = Month::new(year, month).map_err(|_| malformed())?;

        Ok(Self { url: url.trim().to_string(), month })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn month(&self) -> Month {
        self.month
    }
}

impl fmt::Display for ArchiveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Restrict `archives` to months in `[start, end]` that are not in `excludes`.
///
/// An absent bound is unbounded. With neither bound given the list is returned
/// as-is and `excludes` is NOT applied; callers that want exclusions must pass
/// at least one bound. A `start` after `end` yields an empty list.
pub fn filter_archives(
    archives: &[ArchiveRef],
    start: Option<Month>,
    end: Option<Month>,
    excludes: &[Month],
) -> Vec<ArchiveRef> {
    if start.is_none() && end.is_none() {
        return archives.to_vec();
    }
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Vec::new();
        }
    }

    archives
        .iter()
        .filter(|a| {
            let m = a.month();
            !excludes.contains(&m)
                && start.map_or(true, |s| m >= s)
                && end.map_or(true, |e| m <= e)
        })
        .cloned()
        .collect()
}

/// A requested window of months plus explicitly excluded months.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonthRange {
    pub start: Option<Month>,
    pub end: Option<Month>,
    pub excludes: Vec<Month>,
}

impl MonthRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn apply(&self, archives: &[ArchiveRef]) -> Vec<ArchiveRef> {
        filter_archives(archives, self.start, self.end, &self.excludes)
    }

    /// Split the window at a timezone change on `switch`. A month goes before
    /// the switch if its first day is on or before `switch`, and after it if
    /// its first day is on or after `switch`; a switch on the 1st puts that
    /// month on both sides. Both halves keep the exclusions.
    pub fn split_at(&self, switch: NaiveDate) -> (MonthRange, MonthRange) {
        let switch_month = Month::of(switch);
        let first_after = if switch.day() == 1 { switch_month } else { switch_month.succ() };

        let before = MonthRange {
            start: self.start,
            end: Some(self.end.map_or(switch_month, |e| e.min(switch_month))),
            excludes: self.excludes.clone(),
        };
        let after = MonthRange {
            start: Some(self.start.map_or(first_after, |s| s.max(first_after))),
            end: self.end,
            excludes: self.excludes.clone(),
        };
        (before, after)
    }
}
