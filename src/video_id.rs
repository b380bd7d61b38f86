use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::errors::FetchError;

// @module: Video identifier extraction

/// Recognized URL shapes: watch, embed, v/ and short links
static URL_FORMAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com/(watch\?v=|embed/|v/)|youtu\.be/)([^&\s]+)")
        .expect("Invalid URL format regex")
});

static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("Invalid video id regex")
});

/// The 11-character identifier of a video
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Length of every identifier
    pub const LEN: usize = 11;

    /// Build an identifier from a bare token, checking its grammar
    pub fn parse(token: &str) -> Result<Self, FetchError> {
        let valid = token.len() == Self::LEN
            && token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

        if valid {
            Ok(Self(token.to_string()))
        } else {
            Err(FetchError::InvalidUrl(token.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check that the input looks like a watch, embed or short-link URL
pub fn is_supported_url(url: &str) -> bool {
    URL_FORMAT_REGEX.is_match(url)
}

/// Validate a user-supplied URL and extract the video identifier
///
/// The identifier is the first run of 11 allowed characters following a
/// `v=` parameter or a path separator.
pub fn extract_video_id(url: &str) -> Result<VideoId, FetchError> {
    if !is_supported_url(url) {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }

    let captures = VIDEO_ID_REGEX
        .captures(url)
        .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;

    VideoId::parse(&captures[1])
}
