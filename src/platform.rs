use std::fmt;

use serde::{Deserialize, Serialize};

/// Social media sources tracked in the history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Bilibili,
    Douyin,
    Xiaohongshu,
}

impl Platform {
    /// Detection order matters when a file name carries more than one token.
    pub const ALL: [Platform; 3] = [Platform::Bilibili, Platform::Douyin, Platform::Xiaohongshu];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Bilibili => "bilibili",
            Platform::Douyin => "douyin",
            Platform::Xiaohongshu => "xiaohongshu",
        }
    }

    pub fn from_name(name: &str) -> Option<Platform> {
        Platform::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds the platform token in a snapshot file name, ignoring case.
pub fn detect(file_name: &str) -> Option<Platform> {
    let lower = file_name.to_lowercase();
    Platform::ALL
        .into_iter()
        .find(|p| lower.contains(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_token_case_insensitively() {
        assert_eq!(detect("Bilibili_20251112_100000.html"), Some(Platform::Bilibili));
        assert_eq!(detect("DOUYIN_x.html"), Some(Platform::Douyin));
        assert_eq!(detect("my-xiaohongshu-page.html"), Some(Platform::Xiaohongshu));
    }

    #[test]
    fn unknown_name_has_no_platform() {
        assert_eq!(detect("weibo_20251112_100000.html"), None);
    }

    #[test]
    fn first_token_in_table_order_wins() {
        assert_eq!(detect("douyin_vs_bilibili.html"), Some(Platform::Bilibili));
    }

    #[test]
    fn name_round_trips_through_from_name() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_name(platform.as_str()), Some(platform));
        }
        assert_eq!(Platform::from_name("Bilibili"), None);
    }
}
