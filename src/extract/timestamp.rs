//! Capture time from snapshot file names such as `bilibili_20251112_154753.html`.

use std::sync::OnceLock;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use tracing::warn;

fn token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"([0-9]{8})[^0-9]([0-9]{6})").expect("timestamp pattern is a valid regex")
    })
}

/// Looks for a `YYYYMMDD?HHMMSS` token pair (any single non-digit between
/// them) and reads it as local time. Returns `None` when there is no token or
/// the digits do not form a real date and time.
pub fn parse_token(file_name: &str) -> Option<NaiveDateTime> {
    let captures = token().captures(file_name)?;
    let (date, time) = (&captures[1], &captures[2]);

    let date = NaiveDate::from_ymd_opt(
        field(date, 0..4)? as i32,
        field(date, 4..6)?,
        field(date, 6..8)?,
    )?;
    let time = NaiveTime::from_hms_opt(field(time, 0..2)?, field(time, 2..4)?, field(time, 4..6)?)?;
    Some(date.and_time(time))
}

// the token regex guarantees ascii digits, so byte ranges are char ranges
fn field(digits: &str, range: std::ops::Range<usize>) -> Option<u32> {
    digits.get(range)?.parse().ok()
}

/// Capture time for `file_name`, falling back to the current local time when
/// the name carries no usable token.
pub fn parse(file_name: &str) -> NaiveDateTime {
    parse_token(file_name).unwrap_or_else(|| {
        warn!(file = file_name, "no timestamp in file name, using current time");
        Local::now().naive_local()
    })
}
