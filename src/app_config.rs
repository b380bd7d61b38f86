use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles loading and validating the fetcher settings.
/// Every field has a default, so a partial JSON file is enough.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory the caption files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum number of requests issued while following redirects
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Skip TLS certificate verification on the watch page request.
    /// Off unless explicitly enabled.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Browser headers sent upstream
    #[serde(default)]
    pub headers: HeaderConfig,

    /// Upstream endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Where the raw watch page is dumped in debug mode
    #[serde(default = "default_debug_dump_path")]
    pub debug_dump_path: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Header values that make the upstream serve the regular desktop page
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HeaderConfig {
    // @field: Sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Watch page only
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    // @field: Watch page only
    #[serde(default = "default_referer")]
    pub referer: String,

    // @field: Consent cookie, watch page only
    #[serde(default = "default_cookie")]
    pub cookie: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            referer: default_referer(),
            cookie: default_cookie(),
        }
    }
}

/// Upstream endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EndpointConfig {
    /// Base the `/watch?v=<id>` page is requested from
    #[serde(default = "default_watch_base_url")]
    pub watch_base_url: String,

    /// Legacy `type=list` endpoints, tried in order
    #[serde(default = "default_legacy_list_endpoints")]
    pub legacy_list_endpoints: Vec<String>,

    /// Base of the per-language caption URL built for legacy tracks
    #[serde(default = "default_caption_base_url")]
    pub caption_base_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            watch_base_url: default_watch_base_url(),
            legacy_list_endpoints: default_legacy_list_endpoints(),
            caption_base_url: default_caption_base_url(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("subtitles")
}

fn default_max_redirects() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debug_dump_path() -> PathBuf {
    PathBuf::from("youtube_response.html")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7".to_string()
}

fn default_referer() -> String {
    "https://www.youtube.com/".to_string()
}

fn default_cookie() -> String {
    "CONSENT=YES+srp.gws-20231218+FX+436; GPS=1; VISITOR_INFO1_LIVE=some_random_value".to_string()
}

fn default_watch_base_url() -> String {
    "https://www.youtube.com".to_string()
}

fn default_legacy_list_endpoints() -> Vec<String> {
    vec![
        "https://www.youtube.com/api/timedtext".to_string(),
        "https://video.google.com/timedtext".to_string(),
    ]
}

fn default_caption_base_url() -> String {
    "https://www.youtube.com/api/timedtext".to_string()
}

impl Config {
    /// Load the configuration from a JSON file, or use the defaults when
    /// the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("Output directory must not be empty"));
        }

        if self.max_redirects == 0 {
            return Err(anyhow!("max_redirects must be at least 1"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be at least 1"));
        }

        if self.headers.user_agent.trim().is_empty() {
            return Err(anyhow!("User-Agent must not be empty"));
        }

        Url::parse(&self.endpoints.watch_base_url)
            .with_context(|| format!("Invalid watch_base_url: {}", self.endpoints.watch_base_url))?;
        Url::parse(&self.endpoints.caption_base_url)
            .with_context(|| format!("Invalid caption_base_url: {}", self.endpoints.caption_base_url))?;
        for endpoint in &self.endpoints.legacy_list_endpoints {
            Url::parse(endpoint)
                .with_context(|| format!("Invalid legacy endpoint: {}", endpoint))?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_redirects: default_max_redirects(),
            accept_invalid_certs: false,
            timeout_secs: default_timeout_secs(),
            headers: HeaderConfig::default(),
            endpoints: EndpointConfig::default(),
            debug_dump_path: default_debug_dump_path(),
            log_level: LogLevel::default(),
        }
    }
}
