/*!
 * # yt-sub-fetch - YouTube subtitle fetcher
 *
 * A Rust library for locating and downloading the subtitle tracks of a
 * YouTube video without an official subtitle API.
 *
 * ## Features
 *
 * - Extract the video identifier from watch, embed and short-link URLs
 * - Follow redirects to the canonical watch page with a bounded hop budget
 * - Recover caption tracks embedded in the page under any of the historical
 *   key spellings
 * - Fall back to the legacy `timedtext` listing endpoints
 * - List, download one language, or download every track as `.srt`
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `video_id`: URL validation and identifier extraction
 * - `resolver`: Redirect following for the watch page
 * - `track_extractor`: Strategy list over the embedded caption track JSON
 * - `legacy_api`: Legacy listing endpoint fallback
 * - `downloader`: Caption download and persistence
 * - `app_controller`: Pipeline orchestration and track selection
 * - `app_config`: Configuration management
 * - `http_client`: HTTP clients carrying the browser headers
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod downloader;
pub mod errors;
pub mod file_utils;
pub mod http_client;
pub mod legacy_api;
pub mod resolver;
pub mod subtitle_track;
pub mod track_extractor;
pub mod video_id;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions, RunOutcome, SelectionMode};
pub use errors::FetchError;
pub use subtitle_track::SubtitleTrack;
pub use video_id::{extract_video_id, VideoId};
