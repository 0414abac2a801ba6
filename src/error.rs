use std::path::PathBuf;

use crate::platform::Platform;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("could not determine platform from file name '{file}'")]
    UnknownPlatform { file: String },

    #[error("could not extract {platform} follower count from '{file}'")]
    NotFound { file: String, platform: Platform },

    #[error("snapshot '{file}' is unreadable: {reason}")]
    InvalidSnapshot { file: String, reason: String },

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("notification failed: {0}")]
    Notify(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that concern a single snapshot and leave the
    /// rest of the batch processable.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::UnknownPlatform { .. } | Error::NotFound { .. } | Error::InvalidSnapshot { .. }
        )
    }
}
