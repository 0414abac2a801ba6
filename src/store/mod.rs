//! Follower history file.
//!
//! A single JSON document keyed by calendar date, each day holding the
//! latest count per platform:
//!
//! ```json
//! { "2025-11-12": { "douyin": 5439, "bilibili": 532, "xiaohongshu": 1865 } }
//! ```
//!
//! - At most one count per (date, platform); a later merge overwrites
//! - Loading a missing file yields an empty history
//! - Loading a malformed file copies it to `<path>.bak`, logs a warning and
//!   yields an empty history
//! - Every merge through `HistoryStore` is written straight back to disk
//!
//! Writes go directly to the destination. An interrupted write can leave a
//! truncated file, which the next load treats as malformed.

pub mod growth;

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::extract::Extraction;
use crate::platform::Platform;

/// Per-day follower counts. Platform keys are kept as strings so entries
/// written by other tools survive a load/save cycle untouched.
pub type DayCounts = BTreeMap<String, u64>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    days: BTreeMap<NaiveDate, DayCounts>,
}

/// What a merge did to the existing entry for its (date, platform).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Overwrote { previous: u64 },
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Dates in ascending order.
    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &DayCounts)> {
        self.days.iter()
    }

    pub fn get(&self, date: NaiveDate, platform: &str) -> Option<u64> {
        self.days.get(&date)?.get(platform).copied()
    }

    /// Sets the count for (date, platform), replacing any earlier value.
    pub fn merge(&mut self, date: NaiveDate, platform: Platform, count: u64) -> MergeOutcome {
        let previous = self
            .days
            .entry(date)
            .or_default()
            .insert(platform.as_str().to_string(), count);

        match previous {
            Some(previous) => {
                warn!(%date, %platform, previous, count, "entry already exists, overwriting");
                MergeOutcome::Overwrote { previous }
            }
            None => MergeOutcome::Inserted,
        }
    }

    /// Reads a history file. Absent or malformed files both come back empty;
    /// only failing to read an existing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(History::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                let backup = backup_path(path);
                let copied = fs::copy(path, &backup).is_ok();
                warn!(path = %path.display(), backup = %backup.display(), copied, "history file is not valid UTF-8, starting empty");
                return Ok(History::new());
            }
            Err(e) => return Err(Error::io(path, e)),
        };

        match serde_json::from_str(&contents) {
            Ok(history) => Ok(history),
            Err(e) => {
                let backup = backup_path(path);
                match fs::write(&backup, &contents) {
                    Ok(()) => warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "history file is malformed, starting empty"
                    ),
                    Err(copy_err) => warn!(
                        path = %path.display(),
                        error = %e,
                        backup_error = %copy_err,
                        "history file is malformed and could not be backed up, starting empty"
                    ),
                }
                Ok(History::new())
            }
        }
    }

    /// Writes the history as pretty JSON, overwriting `path` in place.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }

        fs::write(path, json).map_err(|e| Error::io(path, e))
    }
}

/// `history.json` -> `history.json.bak`, where a malformed file is kept
/// before the next save replaces it.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// History bound to its file, written through on every record.
pub struct HistoryStore {
    path: PathBuf,
    history: History,
}

impl HistoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let history = History::load(&path)?;
        Ok(HistoryStore { path, history })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Folds an extraction into the history and persists immediately.
    pub fn record(&mut self, extraction: &Extraction) -> Result<MergeOutcome> {
        let date = extraction.date();
        let outcome = self
            .history
            .merge(date, extraction.platform, extraction.followers);

        self.history.save(&self.path)?;

        info!(
            platform = %extraction.platform,
            followers = extraction.followers,
            %date,
            source = %extraction.source,
            "recorded follower count"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn merge_into_empty_history() {
        let mut history = History::new();
        let outcome = history.merge(day("2025-11-12"), Platform::Bilibili, 532);

        assert_eq!(outcome, MergeOutcome::Inserted);
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json, serde_json::json!({ "2025-11-12": { "bilibili": 532 } }));
    }

    #[test]
    fn second_merge_same_day_overwrites() {
        let mut history = History::new();
        history.merge(day("2025-11-12"), Platform::Bilibili, 532);
        let outcome = history.merge(day("2025-11-12"), Platform::Bilibili, 540);

        assert_eq!(outcome, MergeOutcome::Overwrote { previous: 532 });
        assert_eq!(history.get(day("2025-11-12"), "bilibili"), Some(540));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn other_platforms_same_day_are_kept() {
        let mut history = History::new();
        history.merge(day("2025-11-12"), Platform::Bilibili, 532);
        let outcome = history.merge(day("2025-11-12"), Platform::Douyin, 5439);

        assert_eq!(outcome, MergeOutcome::Inserted);
        assert_eq!(history.get(day("2025-11-12"), "bilibili"), Some(532));
        assert_eq!(history.get(day("2025-11-12"), "douyin"), Some(5439));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let history = History::load(&dir.path().join("absent.json")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn load_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ \"2025-11-12\": { \"bilibili\": 5").unwrap();

        let history = History::load(&path).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn load_wrong_shape_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, r#"{ "not-a-date": { "bilibili": 5 } }"#).unwrap();

        assert!(History::load(&path).unwrap().is_empty());
    }

    #[test]
    fn malformed_file_is_backed_up_before_being_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let original = r#"{ "2025-11-10": { "bilibili": 500 }, "2025-11-11": { "bilibili": -1 } }"#;
        fs::write(&path, original).unwrap();

        let mut store = HistoryStore::open(&path).unwrap();
        assert!(store.history().is_empty());

        let extraction = Extraction {
            platform: Platform::Bilibili,
            followers: 532,
            captured_at: NaiveDateTime::parse_from_str("2025-11-12 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
            source: "bilibili_20251112_100000.html".to_string(),
        };
        store.record(&extraction).unwrap();

        let backup = dir.path().join("history.json.bak");
        assert_eq!(backup_path(&path), backup);
        assert_eq!(fs::read_to_string(&backup).unwrap(), original);
        assert_eq!(History::load(&path).unwrap().get(day("2025-11-12"), "bilibili"), Some(532));
    }

    #[test]
    fn non_utf8_file_is_backed_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, [0xff, 0xfe, b'{']).unwrap();

        assert!(History::load(&path).unwrap().is_empty());
        assert_eq!(fs::read(backup_path(&path)).unwrap(), [0xff, 0xfe, b'{']);
    }

    #[test]
    fn valid_file_leaves_no_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, r#"{ "2025-11-10": { "bilibili": 500 } }"#).unwrap();

        History::load(&path).unwrap();
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn save_is_pretty_and_keeps_unknown_labels_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, r#"{"2025-11-10":{"微博":12}}"#).unwrap();

        let mut history = History::load(&path).unwrap();
        history.merge(day("2025-11-12"), Platform::Douyin, 5439);
        history.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"微博\": 12"));
        assert!(written.contains("\n  \"2025-11-12\": {\n    \"douyin\": 5439\n  }"));

        assert_eq!(History::load(&path).unwrap(), history);
    }

    #[test]
    fn store_writes_through_on_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let mut store = HistoryStore::open(&path).unwrap();

        let extraction = Extraction {
            platform: Platform::Xiaohongshu,
            followers: 1865,
            captured_at: NaiveDateTime::parse_from_str("2025-11-12 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
            source: "xiaohongshu_20251112_093000.html".to_string(),
        };
        store.record(&extraction).unwrap();

        let on_disk = History::load(&path).unwrap();
        assert_eq!(on_disk.get(day("2025-11-12"), "xiaohongshu"), Some(1865));
        assert_eq!(&on_disk, store.history());
    }
}
