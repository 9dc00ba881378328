//! Chunk periods and local wall-clock arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::error::TableError;
use crate::index::Timestamp;

/// Number of 15-minute steps tried forward to leave a DST gap.
const MAX_GAP_STEPS: usize = 16;

/// Length of one chunk of a time series.
///
/// Calendar variants follow local wall-clock time of the timestamp's zone,
/// so a `Day` chunk spans 23 or 25 hours across DST transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkSize {
    /// Fixed duration, floored on local time since the local epoch.
    Fixed(TimeDelta),
    /// Calendar day starting at local midnight.
    Day,
    /// Calendar week starting Monday at local midnight.
    Week,
    /// Calendar month starting on the 1st.
    Month,
    /// Calendar year starting on January 1st.
    Year,
}

impl ChunkSize {
    /// Returns the start of the period containing `t`.
    ///
    /// This is the chunk key of `t`.
    pub fn period_start(&self, t: &Timestamp) -> Timestamp {
        let tz = t.timezone();
        let local = t.naive_local();
        let date = local.date();
        let naive = match self {
            ChunkSize::Fixed(d) => {
                let floored = floor_local(local, *d);
                // Stay on t's side of a DST fold when the floor is reachable
                // with t's own offset.
                let same_offset = *t - (local - floored);
                if same_offset.naive_local() == floored {
                    return same_offset;
                }
                floored
            }
            ChunkSize::Day => midnight(date),
            ChunkSize::Week => {
                let back = i64::from(date.weekday().num_days_from_monday());
                midnight(date - TimeDelta::days(back))
            }
            ChunkSize::Month => midnight(first_of_month(date.year(), date.month())),
            ChunkSize::Year => midnight(first_of_month(date.year(), 1)),
        };
        localize(&tz, naive)
    }

    /// Returns the start of the period following the one that starts at `start`.
    pub fn next_period(&self, start: &Timestamp) -> Timestamp {
        let tz = start.timezone();
        let local = start.naive_local();
        let date = local.date();
        let naive = match self {
            ChunkSize::Fixed(d) => return self.period_start(&(*start + *d)),
            ChunkSize::Day => midnight(date + TimeDelta::days(1)),
            ChunkSize::Week => midnight(date + TimeDelta::days(7)),
            ChunkSize::Month => {
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                midnight(first_of_month(year, month))
            }
            ChunkSize::Year => midnight(first_of_month(date.year() + 1, 1)),
        };
        localize(&tz, naive)
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkSize::Fixed(d) => write!(f, "{}s", d.num_seconds()),
            ChunkSize::Day => f.write_str("D"),
            ChunkSize::Week => f.write_str("W"),
            ChunkSize::Month => f.write_str("M"),
            ChunkSize::Year => f.write_str("A"),
        }
    }
}

impl FromStr for ChunkSize {
    type Err = TableError;

    /// Parses an offset alias (`D`, `W`, `M`, `A`, `day`, `week`, ...) or a
    /// fixed duration such as `30min`, `2h` or `3D`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "D" | "1D" | "day" | "daily" => Ok(ChunkSize::Day),
            "W" | "week" | "weekly" => Ok(ChunkSize::Week),
            "M" | "MS" | "month" | "monthly" => Ok(ChunkSize::Month),
            "A" | "AS" | "Y" | "YS" | "year" | "yearly" | "annual" => Ok(ChunkSize::Year),
            other => parse_duration(other).map(ChunkSize::Fixed),
        }
    }
}

/// Parses a fixed duration such as `5s`, `5min`, `5T`, `1h` or `2D`.
///
/// A missing count means one unit (`h` is one hour).
pub fn parse_duration(s: &str) -> Result<TimeDelta, TableError> {
    let invalid = || TableError::InvalidOffset {
        value: s.to_string(),
    };
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (count, unit) = trimmed.split_at(split);
    let n: i64 = if count.is_empty() {
        1
    } else {
        count.parse().map_err(|_| invalid())?
    };
    if n <= 0 {
        return Err(invalid());
    }
    let unit_secs = match unit {
        "s" | "S" | "sec" => 1,
        "min" | "T" => 60,
        "h" | "H" => 3_600,
        "d" | "D" => 86_400,
        _ => return Err(invalid()),
    };
    n.checked_mul(unit_secs)
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(invalid)
}

/// Resolves a local wall-clock time in `tz` to an instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times
/// inside a DST gap resolve forward to the first valid quarter hour.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> Timestamp {
    let mut cursor = naive;
    for _ in 0..MAX_GAP_STEPS {
        if let Some(t) = tz.from_local_datetime(&cursor).earliest() {
            return t;
        }
        cursor += TimeDelta::minutes(15);
    }
    tz.from_utc_datetime(&naive)
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Floors local time to a multiple of `d` since the local epoch.
fn floor_local(local: NaiveDateTime, d: TimeDelta) -> NaiveDateTime {
    let step = d.num_seconds().max(1);
    let secs = local.and_utc().timestamp();
    let floored = secs.div_euclid(step) * step;
    chrono::DateTime::from_timestamp(floored, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or(local)
}
