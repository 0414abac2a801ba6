//! Run configuration.
//!
//! Built-in defaults, overridden by an optional TOML file, overridden by
//! command line flags. The resulting `Config` is passed explicitly to the
//! batch driver; nothing below `main` looks at the environment.
//!
//! ```toml
//! snapshot_dir = "html_cache"
//! history_path = "follower_history.json"
//! extension = "html"
//! on_failure = "skip-and-continue"
//! notify_command = ["python3", "send_notification.py"]
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::{ExtractArgs, HistoryArgs};
use crate::error::{Error, Result};

/// What the batch driver does when a snapshot cannot be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the run at the first bad snapshot.
    #[default]
    FailFast,
    /// Log the failure, note it in the batch report and move on.
    SkipAndContinue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub snapshot_dir: PathBuf,
    pub history_path: PathBuf,
    pub extension: String,
    pub on_failure: FailurePolicy,
    pub json_output: bool,
    pub notify_command: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            snapshot_dir: PathBuf::from("html_cache"),
            history_path: PathBuf::from("follower_history.json"),
            extension: "html".to_string(),
            on_failure: FailurePolicy::FailFast,
            json_output: false,
            notify_command: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    snapshot_dir: Option<PathBuf>,
    history_path: Option<PathBuf>,
    extension: Option<String>,
    on_failure: Option<FailurePolicy>,
    notify_command: Option<Vec<String>>,
}

/// `<config dir>/fanwatch/config.toml`, or platform equivalent.
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "fanwatch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Loads `explicit` if given (it must exist), otherwise the default
    /// config file if one is present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Config::from_toml(&contents, &path),
            Err(e) if e.kind() == ErrorKind::NotFound && explicit.is_none() => Ok(Config::default()),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Parses TOML on top of the defaults. `path` is only used for errors.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self> {
        let file: FileConfig = toml::from_str(contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Config::default();
        if let Some(dir) = file.snapshot_dir {
            config.snapshot_dir = dir;
        }
        if let Some(history) = file.history_path {
            config.history_path = history;
        }
        if let Some(ext) = file.extension {
            config.extension = ext;
        }
        if let Some(policy) = file.on_failure {
            config.on_failure = policy;
        }
        config.notify_command = file.notify_command.filter(|argv| !argv.is_empty());

        Ok(config)
    }

    pub fn apply_history_args(&mut self, args: &HistoryArgs) {
        if let Some(history) = &args.history {
            self.history_path = history.clone();
        }
        self.json_output = args.json;
    }

    pub fn apply_extract_args(&mut self, args: &ExtractArgs) {
        self.apply_history_args(&args.output);
        if let Some(dir) = &args.dir {
            self.snapshot_dir = dir.clone();
        }
        if let Some(ext) = &args.ext {
            self.extension = ext.trim_start_matches('.').to_string();
        }
        if args.keep_going {
            self.on_failure = FailurePolicy::SkipAndContinue;
        }
    }
}
