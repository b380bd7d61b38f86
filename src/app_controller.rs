use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

use crate::app_config::Config;
use crate::downloader::Downloader;
use crate::errors::FetchError;
use crate::file_utils::FileManager;
use crate::http_client;
use crate::legacy_api;
use crate::resolver::{self, ResolvedPage};
use crate::subtitle_track::SubtitleTrack;
use crate::track_extractor;
use crate::video_id::{self, VideoId};

// @module: Application controller for the subtitle fetch pipeline

/// Which tracks a run should act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Print the available tracks, download nothing
    List,
    /// Download every track
    All,
    /// Download the tracks whose language code equals this one exactly
    Language(String),
}

/// Options for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub url: String,
    pub mode: SelectionMode,
    /// Dump the raw watch page before parsing
    pub debug: bool,
}

/// Result of a batch download
#[derive(Debug, Default)]
pub struct DownloadSummary {
    /// Distinct files written, in download order
    pub written: Vec<PathBuf>,
    /// Per-track soft failures
    pub failures: Vec<FetchError>,
}

/// How a run ended when no fatal error occurred
#[derive(Debug)]
pub enum RunOutcome {
    /// Tracks were listed; nothing was downloaded
    Listed(Vec<SubtitleTrack>),
    /// At least one download was attempted
    Downloaded(DownloadSummary),
}

impl RunOutcome {
    /// Process exit code: 0 only when at least one file was written.
    /// Listing is a non-download termination and exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Listed(_) => 1,
            Self::Downloaded(summary) if summary.written.is_empty() => 1,
            Self::Downloaded(_) => 0,
        }
    }
}

/// Narrow the discovered tracks down to the ones the mode asks for
pub fn select_tracks(tracks: Vec<SubtitleTrack>, mode: &SelectionMode) -> Result<Vec<SubtitleTrack>, FetchError> {
    if tracks.is_empty() {
        return Err(FetchError::NoSubtitlesFound);
    }

    match mode {
        SelectionMode::List | SelectionMode::All => Ok(tracks),
        SelectionMode::Language(language) => {
            let matching: Vec<SubtitleTrack> = tracks
                .into_iter()
                .filter(|track| &track.language == language)
                .collect();

            if matching.is_empty() {
                Err(FetchError::NoSubtitlesForLanguage(language.clone()))
            } else {
                Ok(matching)
            }
        }
    }
}

/// Main application controller for subtitle fetching
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Watch page client, redirects handled by the resolver
    page_client: Client,
    // @field: Referer and Cookie for the watch page host
    session_headers: HeaderMap,
    // @field: Legacy listing client
    api_client: Client,
    // @field: Caption downloader
    downloader: Downloader,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let page_client = http_client::build_page_client(&config)?;
        let session_headers = http_client::session_headers(&config)?;
        let api_client = http_client::build_api_client(&config)?;
        let downloader = Downloader::new(api_client.clone(), config.output_dir.clone());

        Ok(Self {
            config,
            page_client,
            session_headers,
            api_client,
            downloader,
        })
    }

    /// Run the whole pipeline: identify, resolve, extract, fall back,
    /// select and download
    pub async fn run(&self, options: &RunOptions) -> Result<RunOutcome, FetchError> {
        let video_id = video_id::extract_video_id(&options.url)?;
        debug!("Video ID: {}", video_id);

        let (page_url, tracks) = self.discover_tracks(&video_id, options.debug).await?;
        debug!("Found subtitles: {:?}", tracks);

        let selected = select_tracks(tracks, &options.mode)?;

        if options.mode == SelectionMode::List {
            return Ok(RunOutcome::Listed(selected));
        }

        let summary = self.download_tracks(&selected, &video_id, &page_url).await;
        Ok(RunOutcome::Downloaded(summary))
    }

    /// Resolve the watch page and extract its tracks, falling back to the
    /// legacy listing endpoints when the page yields none
    pub async fn discover_tracks(&self, video_id: &VideoId, dump_page: bool) -> Result<(Url, Vec<SubtitleTrack>), FetchError> {
        let page = self.resolve_watch_page(video_id).await?;
        debug!("Final URL after redirects: {}", page.url);

        if dump_page {
            self.write_debug_dump(&page);
        }

        let mut tracks = track_extractor::extract_tracks(&page.body);

        if tracks.is_empty() {
            debug!("First extraction method failed, trying alternative methods");
            tracks = legacy_api::fetch_legacy_tracks(&self.api_client, &self.config.endpoints, video_id).await;
        }

        Ok((page.url, tracks))
    }

    /// Follow redirects from the watch URL of `video_id`
    pub async fn resolve_watch_page(&self, video_id: &VideoId) -> Result<ResolvedPage, FetchError> {
        let watch_url = self.watch_url(video_id)?;
        resolver::resolve_with_session(
            &self.page_client,
            watch_url.as_str(),
            self.config.max_redirects,
            &self.session_headers,
        )
        .await
    }

    /// `<watch_base_url>/watch?v=<id>`
    pub fn watch_url(&self, video_id: &VideoId) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.config.endpoints.watch_base_url)?.join("/watch")?;
        url.query_pairs_mut().append_pair("v", video_id.as_str());
        Ok(url)
    }

    /// Download the tracks one after another. A failed track is reported
    /// and skipped.
    pub async fn download_tracks(&self, tracks: &[SubtitleTrack], video_id: &VideoId, page_url: &Url) -> DownloadSummary {
        let mut summary = DownloadSummary::default();

        let progress_bar = if tracks.len() > 1 {
            let pb = ProgressBar::new(tracks.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} subtitles {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style.progress_chars("█▓▒░"));
            pb
        } else {
            ProgressBar::hidden()
        };

        for track in tracks {
            progress_bar.set_message(track.language.clone());

            let target = FileManager::subtitle_output_path(self.downloader.output_dir(), video_id, &track.language);
            if summary.written.contains(&target) {
                warn!("{} ({}) overwrites {} written earlier in this batch", track.language, track.name, target.display());
            }

            match self.downloader.download(track, video_id, page_url).await {
                Ok(path) => {
                    if !summary.written.contains(&path) {
                        summary.written.push(path);
                    }
                }
                Err(e) => {
                    warn!("{}", e);
                    summary.failures.push(e);
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        info!(
            "Downloaded {} of {} subtitle(s) to {}",
            summary.written.len(),
            tracks.len(),
            self.downloader.output_dir().display()
        );

        summary
    }

    fn write_debug_dump(&self, page: &ResolvedPage) {
        let path = &self.config.debug_dump_path;
        match FileManager::write_bytes(path, page.body.as_bytes()) {
            Ok(()) => debug!("Saved raw page response to {}", path.display()),
            Err(e) => warn!("Failed to save raw page response: {:#}", e),
        }
    }
}
