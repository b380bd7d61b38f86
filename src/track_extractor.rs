/*!
 * Subtitle track extraction from a watch page body.
 *
 * The page embeds a JSON array of caption track descriptors. Its key has
 * been spelled differently over time, so each known spelling is an
 * extraction strategy. Strategies run in a fixed priority order and the
 * first one producing a non-empty list wins; results are never merged.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::subtitle_track::SubtitleTrack;

/// Backslash-escaped punctuation; the backslash is dropped
static ESCAPED_CHAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\\(["\\/bfnrt])"#).expect("Invalid escape regex")
});

/// `\uXXXX`, optionally followed by a second escape forming a surrogate pair
static UNICODE_ESCAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\u([0-9a-fA-F]{4})(?:\\u([0-9a-fA-F]{4}))?").expect("Invalid unicode escape regex")
});

static STRATEGIES: Lazy<Vec<ExtractionStrategy>> = Lazy::new(|| {
    vec![
        ExtractionStrategy::new("single-quoted caption_tracks", r"'caption_tracks':\s*(\[.*?\])"),
        ExtractionStrategy::new("double-quoted caption_tracks", r#""caption_tracks":\s*(\[.*?\])"#),
        ExtractionStrategy::new("single-quoted captionTracks", r"'captionTracks':\s*(\[.*?\])"),
        ExtractionStrategy::new("double-quoted captionTracks", r#""captionTracks":\s*(\[.*?\])"#),
    ]
});

/// Why a single candidate was rejected. Never leaves this module.
#[derive(Error, Debug)]
enum ParseFailure {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    language_code: Option<String>,
    name: Option<Value>,
    base_url: Option<String>,
    kind: Option<String>,
}

/// One key spelling of the embedded caption track array
pub struct ExtractionStrategy {
    name: &'static str,
    pattern: Regex,
}

impl ExtractionStrategy {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid extraction pattern"),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Try every match of this strategy in page order and return the first
    /// candidate that parses to a non-empty track list
    pub fn apply(&self, body: &str) -> Option<Vec<SubtitleTrack>> {
        let mut match_count = 0;

        for captures in self.pattern.captures_iter(body) {
            match_count += 1;
            let candidate = &captures[1];

            match parse_candidate(candidate) {
                Ok(tracks) if !tracks.is_empty() => {
                    debug!("Strategy '{}' found {} track(s)", self.name, tracks.len());
                    return Some(tracks);
                }
                Ok(_) => debug!("Strategy '{}' matched an empty track list", self.name),
                Err(e) => debug!("Strategy '{}': {}", self.name, e),
            }
        }

        debug!("Matches for strategy '{}': {}", self.name, match_count);
        None
    }
}

/// Strategies in priority order
pub fn strategies() -> &'static [ExtractionStrategy] {
    &STRATEGIES
}

/// Recover the subtitle tracks embedded in a page body. An empty result
/// means the caller should try the legacy endpoints.
pub fn extract_tracks(body: &str) -> Vec<SubtitleTrack> {
    strategies()
        .iter()
        .find_map(|strategy| strategy.apply(body))
        .unwrap_or_default()
}

/// Strip escaping backslashes and decode `\uXXXX` sequences
pub fn unescape(raw: &str) -> String {
    let stripped = ESCAPED_CHAR_REGEX.replace_all(raw, "$1");

    UNICODE_ESCAPE_REGEX
        .replace_all(&stripped, |caps: &Captures| {
            let first = hex_value(&caps[1]);
            let second = caps.get(2).map(|m| (m.as_str(), hex_value(m.as_str())));

            if let Some((_, low)) = second {
                if (0xD800..0xDC00).contains(&first) && (0xDC00..0xE000).contains(&low) {
                    let combined = 0x10000 + ((first - 0xD800) << 10) + (low - 0xDC00);
                    if let Some(c) = char::from_u32(combined) {
                        return c.to_string();
                    }
                }
            }

            let mut decoded = decode_code_unit(first, &caps[1]);
            if let Some((text, value)) = second {
                decoded.push_str(&decode_code_unit(value, text));
            }
            decoded
        })
        .into_owned()
}

fn hex_value(hex: &str) -> u32 {
    // The regex only lets four hex digits through
    u32::from_str_radix(hex, 16).unwrap_or(0)
}

/// Lone surrogates have no char; they stay as written
fn decode_code_unit(value: u32, hex: &str) -> String {
    match char::from_u32(value) {
        Some(c) => c.to_string(),
        None => format!("\\u{}", hex),
    }
}

fn parse_candidate(candidate: &str) -> Result<Vec<SubtitleTrack>, ParseFailure> {
    let clean_json = unescape(candidate);
    let raw_tracks: Vec<RawCaptionTrack> = serde_json::from_str(&clean_json)?;

    let tracks = raw_tracks
        .into_iter()
        .filter_map(|raw| {
            let language = raw.language_code.filter(|code| !code.is_empty());
            let (Some(language), Some(fetch_url)) = (language, raw.base_url) else {
                debug!("Skipping caption track without languageCode or baseUrl");
                return None;
            };

            if raw.kind.as_deref() == Some("asr") {
                debug!("Including auto-generated track: {}", language);
            }

            let name = raw.name.as_ref().map(track_label).unwrap_or_default();
            Some(SubtitleTrack { language, name, fetch_url })
        })
        .collect();

    Ok(tracks)
}

/// `name.simpleText`, falling back to the raw `name` value
fn track_label(name: &Value) -> String {
    if let Some(text) = name.get("simpleText").and_then(Value::as_str) {
        return text.to_string();
    }

    if let Some(text) = name.as_str() {
        return text.to_string();
    }

    match name {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
