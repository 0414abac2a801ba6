//! Follower count extraction from saved profile pages.
//!
//! Each platform has one fixed pattern describing the markup around the
//! follower number on its profile template. Matching is case-sensitive and
//! first-match-wins. Attribute order and whitespace between the matched tags
//! may vary; anything else about the template changing turns into a miss,
//! never a guess.
//!
//! Templates matched:
//! - bilibili: `<span class="nav-statistics__item-text">粉丝数</span>` followed by
//!   `<span class="nav-statistics__item-num" title="532">`; the raw number
//!   comes from `title` since the visible text may be abbreviated (`1.2万`)
//! - douyin: a `data-e2e="user-info-fans"` block whose first two children are a
//!   `粉丝` label div and a number div
//! - xiaohongshu: `<span class="count">1865</span><span class="shows">粉丝</span>`

pub mod timestamp;

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::platform::{self, Platform};

const BILIBILI_PATTERN: &str = concat!(
    r#"<span[^>]*class="nav-statistics__item-text"[^>]*>\s*粉丝数\s*</span>\s*"#,
    r#"<span[^>]*(?:title="([0-9]+)"[^>]*class="nav-statistics__item-num"|class="nav-statistics__item-num"[^>]*title="([0-9]+)")[^>]*>"#,
);

const DOUYIN_PATTERN: &str = concat!(
    r#"<div[^>]*data-e2e="user-info-fans"[^>]*>\s*"#,
    r#"<div[^>]*>\s*粉丝\s*</div>\s*"#,
    r#"<div[^>]*>\s*([0-9]+)\s*</div>"#,
);

const XIAOHONGSHU_PATTERN: &str = concat!(
    r#"<span[^>]*class="count"[^>]*>\s*([0-9]+)\s*</span>\s*"#,
    r#"<span[^>]*class="shows"[^>]*>\s*粉丝\s*</span>"#,
);

fn pattern(platform: Platform) -> &'static Regex {
    static BILIBILI: OnceLock<Regex> = OnceLock::new();
    static DOUYIN: OnceLock<Regex> = OnceLock::new();
    static XIAOHONGSHU: OnceLock<Regex> = OnceLock::new();

    let (cell, source) = match platform {
        Platform::Bilibili => (&BILIBILI, BILIBILI_PATTERN),
        Platform::Douyin => (&DOUYIN, DOUYIN_PATTERN),
        Platform::Xiaohongshu => (&XIAOHONGSHU, XIAOHONGSHU_PATTERN),
    };
    cell.get_or_init(|| Regex::new(source).expect("follower pattern is a valid regex"))
}

/// Returns the follower count embedded in `html`, or `None` when the
/// platform's markup is not present. Zero is a real count, distinct from `None`.
pub fn extract(platform: Platform, html: &str) -> Option<u64> {
    let captures = pattern(platform).captures(html)?;

    // bilibili has two alternatives for attribute order; only one participates
    let digits = captures.iter().skip(1).flatten().next()?;

    // a digit run too long for u64 is not a believable count
    digits.as_str().parse::<u64>().ok()
}

/// A successful extraction, ready to be folded into the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub platform: Platform,
    pub followers: u64,
    pub captured_at: NaiveDateTime,
    pub source: String,
}

impl Extraction {
    /// The history key this extraction lands on.
    pub fn date(&self) -> NaiveDate {
        self.captured_at.date()
    }
}

/// Extracts from an in-memory snapshot. The platform and capture time are
/// both derived from `file_name`.
pub fn extract_snapshot(file_name: &str, html: &str) -> Result<Extraction> {
    let platform = platform::detect(file_name).ok_or_else(|| Error::UnknownPlatform {
        file: file_name.to_string(),
    })?;

    let followers = extract(platform, html).ok_or_else(|| Error::NotFound {
        file: file_name.to_string(),
        platform,
    })?;

    let captured_at = timestamp::parse(file_name);
    debug!(file = file_name, %platform, followers, %captured_at, "extracted follower count");

    Ok(Extraction {
        platform,
        followers,
        captured_at,
        source: file_name.to_string(),
    })
}

/// Reads a snapshot file and extracts from it. A body that is not UTF-8 is
/// a bad snapshot, not an I/O failure.
pub fn extract_file(path: &Path) -> Result<Extraction> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let html = String::from_utf8(bytes).map_err(|e| Error::InvalidSnapshot {
        file: file_name.clone(),
        reason: e.utf8_error().to_string(),
    })?;

    extract_snapshot(&file_name, &html)
}
