/*!
 * Error types for the yt-sub-fetch pipeline.
 *
 * Fatal conditions abort a run; `DownloadFailed` is soft and only ever
 * reported for a single track while the rest of a batch continues.
 */

use thiserror::Error;

/// Errors that can occur while resolving, extracting or downloading subtitles
#[derive(Error, Debug)]
pub enum FetchError {
    /// The input is not a recognized video URL
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    /// The redirect chain did not terminate within the hop budget
    #[error("Too many redirects (limit: {max_hops})")]
    TooManyRedirects {
        /// Maximum number of requests the resolver was allowed to issue
        max_hops: u32,
    },

    /// Neither the watch page nor the legacy endpoints listed any track
    #[error("No subtitles found for this video")]
    NoSubtitlesFound,

    /// Tracks exist, but none for the requested language
    #[error("No subtitles found for language: {0}")]
    NoSubtitlesForLanguage(String),

    /// A single track could not be downloaded
    #[error("Failed to download subtitle for {language}: {reason}")]
    DownloadFailed {
        /// Language code of the track
        language: String,
        /// HTTP status or transport failure description
        reason: String,
    },

    /// A URL could not be built or joined
    #[error("Invalid request URL: {0}")]
    InvalidRequestUrl(#[from] url::ParseError),

    /// Transport error on a request the pipeline cannot do without
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    /// Whether the error only affects one track of a batch
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::DownloadFailed { .. })
    }
}
