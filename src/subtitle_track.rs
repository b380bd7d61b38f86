use serde::{Deserialize, Serialize};
use std::fmt;

/// One downloadable caption stream of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Short language code, e.g. "en" or "zh-TW"
    pub language: String,
    /// Human-readable label
    pub name: String,
    /// Absolute or relative caption URL, without the format selector
    pub fetch_url: String,
}

impl SubtitleTrack {
    pub fn new(language: impl Into<String>, name: impl Into<String>, fetch_url: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            name: name.into(),
            fetch_url: fetch_url.into(),
        }
    }
}

/// Listing format: `en(English)`
impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.language, self.name)
    }
}
