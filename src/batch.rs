//! Batch ingestion of a snapshot directory.
//!
//! Snapshots are the files directly inside the directory with the configured
//! extension, processed in file name order. Each one is extracted, merged
//! and persisted before the next is opened, so an aborted run keeps every
//! merge made before the failure.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{Config, FailurePolicy};
use crate::error::{Error, Result};
use crate::extract;
use crate::store::{HistoryStore, MergeOutcome};

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Snapshot files found.
    pub total: usize,
    /// Snapshots extracted and recorded.
    pub processed: usize,
    /// Records that replaced an existing (date, platform) value.
    pub overwrites: usize,
    /// Skipped snapshots; only filled under `FailurePolicy::SkipAndContinue`.
    pub failures: Vec<(PathBuf, Error)>,
}

/// Snapshot files in `dir`, sorted by file name.
pub fn snapshot_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matches_ext = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension));

        if matches_ext {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Extracts every snapshot in `dir` into `store`.
///
/// Under `FailFast` the first snapshot without a platform token or without
/// matching markup ends the run with that error. Under `SkipAndContinue`
/// such snapshots are logged and collected in the report. I/O and
/// persistence failures abort under either policy.
pub fn process_directory(dir: &Path, store: &mut HistoryStore, config: &Config) -> Result<BatchReport> {
    let files = snapshot_files(dir, &config.extension)?;
    let mut report = BatchReport {
        total: files.len(),
        ..BatchReport::default()
    };

    if files.is_empty() {
        warn!(dir = %dir.display(), extension = %config.extension, "no snapshot files found");
        return Ok(report);
    }

    info!(dir = %dir.display(), count = files.len(), "processing snapshots");

    for path in files {
        let extraction = match extract::extract_file(&path) {
            Ok(extraction) => extraction,
            Err(e) if e.is_per_file() && config.on_failure == FailurePolicy::SkipAndContinue => {
                warn!(file = %path.display(), error = %e, "skipping snapshot");
                report.failures.push((path, e));
                continue;
            }
            Err(e) => return Err(e),
        };

        if let MergeOutcome::Overwrote { .. } = store.record(&extraction)? {
            report.overwrites += 1;
        }
        report.processed += 1;
    }

    info!(
        processed = report.processed,
        total = report.total,
        history = %store.path().display(),
        "batch complete"
    );

    Ok(report)
}
