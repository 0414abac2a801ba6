//! Follower growth per platform.
//!
//! For every platform present in the history:
//! - Finds the earliest and latest dates holding a count for it
//! - Reports absolute and percentage change between those two counts
//! - A zero starting count reports 0% instead of dividing by zero

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::History;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Growth {
    pub platform: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub first_count: u64,
    pub last_count: u64,
    pub delta: i64,
    pub percent: f64,
}

impl Growth {
    /// True when the platform was seen on more than one day.
    pub fn spans_days(&self) -> bool {
        self.first_date < self.last_date
    }
}

fn percent_change(first: u64, delta: i64) -> f64 {
    if first == 0 {
        0.0
    } else {
        delta as f64 / first as f64 * 100.0
    }
}

/// Growth for every platform in `history`, sorted by platform name.
pub fn compute(history: &History) -> Vec<Growth> {
    // days() is ascending, so the first sighting is the earliest
    let mut spans: BTreeMap<&str, ((NaiveDate, u64), (NaiveDate, u64))> = BTreeMap::new();

    for (date, counts) in history.days() {
        for (platform, &count) in counts {
            spans
                .entry(platform.as_str())
                .and_modify(|(_, last)| *last = (*date, count))
                .or_insert(((*date, count), (*date, count)));
        }
    }

    spans
        .into_iter()
        .map(|(platform, ((first_date, first_count), (last_date, last_count)))| {
            let first = i64::try_from(first_count).unwrap_or(i64::MAX);
            let last = i64::try_from(last_count).unwrap_or(i64::MAX);
            let delta = last.saturating_sub(first);

            Growth {
                platform: platform.to_string(),
                first_date,
                last_date,
                first_count,
                last_count,
                delta,
                percent: percent_change(first_count, delta),
            }
        })
        .collect()
}
