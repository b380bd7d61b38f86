use log::{debug, info};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use url::Url;

use crate::errors::FetchError;
use crate::file_utils::FileManager;
use crate::subtitle_track::SubtitleTrack;
use crate::video_id::VideoId;

// @module: Subtitle download and persistence

/// Fetches caption payloads and writes them to the output directory
pub struct Downloader {
    // @field: HTTP client with the browser User-Agent
    client: Client,
    // @field: Target directory, created on first write
    output_dir: PathBuf,
}

impl Downloader {
    pub fn new(client: Client, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Download one track and write the body verbatim to
    /// `<output_dir>/<video_id>_<language>.srt`
    ///
    /// Relative fetch URLs are resolved against `page_url`. Every failure is
    /// reported as `DownloadFailed` so a batch can carry on.
    pub async fn download(&self, track: &SubtitleTrack, video_id: &VideoId, page_url: &Url) -> Result<PathBuf, FetchError> {
        let failed = |reason: String| FetchError::DownloadFailed {
            language: track.language.clone(),
            reason,
        };

        let url = srt_url(page_url, &track.fetch_url).map_err(|e| failed(e.to_string()))?;
        debug!("Downloading subtitle from: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(failed(format!("HTTP {}", response.status().as_u16())));
        }

        let body = response.bytes().await.map_err(|e| failed(e.to_string()))?;

        let path = FileManager::subtitle_output_path(&self.output_dir, video_id, &track.language);
        FileManager::write_bytes(&path, &body).map_err(|e| failed(format!("{:#}", e)))?;

        info!("Downloaded subtitle for {} to {}", track.language, path.display());
        Ok(path)
    }
}

/// Resolve a track's fetch URL and append the `fmt=srt` selector
pub fn srt_url(page_url: &Url, fetch_url: &str) -> Result<Url, FetchError> {
    let mut url = page_url.join(fetch_url)?;
    url.query_pairs_mut().append_pair("fmt", "srt");
    Ok(url)
}
