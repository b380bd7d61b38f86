// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use yt_sub_fetch::app_config::{self, Config};
use yt_sub_fetch::{Controller, RunOptions, RunOutcome, SelectionMode};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// yt-sub-fetch - download YouTube subtitles
///
/// Finds the subtitle tracks of a YouTube video by reading its watch page
/// (or the legacy listing endpoints) and saves them as .srt files.
#[derive(Parser, Debug)]
#[command(name = "yt-sub-fetch")]
#[command(version)]
#[command(about = "Download YouTube subtitles")]
#[command(long_about = "yt-sub-fetch finds the subtitle tracks of a YouTube video and saves them as .srt files.

EXAMPLES:
    yt-sub-fetch -L https://www.youtube.com/watch?v=0oNX_BHgi32        # List available languages
    yt-sub-fetch -l en https://www.youtube.com/watch?v=0oNX_BHgi32     # Download English subtitles
    yt-sub-fetch -a -u https://youtu.be/0oNX_BHgi32                    # Download every track
    yt-sub-fetch -d -l zh-TW https://www.youtube.com/watch?v=0oNX_BHgi32  # Debug output and page dump

Files are written to subtitles/<video_id>_<language>.srt by default.")]
struct CommandLineOptions {
    /// YouTube video URL
    #[arg(short, long)]
    url: Option<String>,

    /// Subtitle language code (e.g., en, zh-TW)
    #[arg(short, long)]
    language: Option<String>,

    /// List available subtitle languages
    #[arg(short = 'L', long)]
    list: bool,

    /// Download all subtitles
    #[arg(short, long)]
    all: bool,

    /// Enable debug output and save the raw watch page
    #[arg(short, long)]
    debug: bool,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Directory the subtitle files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip TLS certificate verification on the watch page request
    #[arg(long)]
    insecure: bool,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// YouTube video URL, when --url is not given
    #[arg(value_name = "URL")]
    positional_url: Option<String>,
}

impl CommandLineOptions {
    // @returns: Selection mode, list taking precedence over all over language
    fn selection_mode(&self) -> Result<SelectionMode> {
        if self.list {
            Ok(SelectionMode::List)
        } else if self.all {
            Ok(SelectionMode::All)
        } else if let Some(language) = &self.language {
            Ok(SelectionMode::Language(language.clone()))
        } else {
            Err(anyhow!("Specify a subtitle language with --language, or use --all or --list"))
        }
    }

    // @returns: Video URL from --url, else the trailing positional argument
    fn video_url(&self) -> Result<String> {
        self.url
            .clone()
            .or_else(|| self.positional_url.clone())
            .ok_or_else(|| anyhow!("YouTube video URL is required"))
    }
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {}{}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: CommandLineOptions) -> Result<i32> {
    // Command line level first, so config loading is already logged at it
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }
    if cli.debug {
        log::set_max_level(LevelFilter::Debug);
    }

    let mut config = Config::load_or_default(&cli.config_path)?;

    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }
    if cli.insecure {
        config.accept_invalid_certs = true;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    } else if !cli.debug {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate()?;

    let url = cli.video_url()?;
    let mode = cli.selection_mode()?;

    let controller = Controller::with_config(config)?;
    let options = RunOptions {
        url,
        mode,
        debug: cli.debug,
    };

    let outcome = controller.run(&options).await?;

    match &outcome {
        RunOutcome::Listed(tracks) => {
            for track in tracks {
                println!("{}", track);
            }
        }
        RunOutcome::Downloaded(summary) => {
            if summary.written.is_empty() {
                error!("No subtitles could be downloaded");
            } else if !summary.failures.is_empty() {
                info!("{} subtitle(s) failed to download", summary.failures.len());
            }
        }
    }

    Ok(outcome.exit_code())
}
