use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use url::Url;

use crate::app_config::EndpointConfig;
use crate::errors::FetchError;
use crate::subtitle_track::SubtitleTrack;
use crate::video_id::VideoId;

// @module: Legacy timedtext listing fallback

static TRACK_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<track\b([^>]*)>").expect("Invalid track tag regex")
});

static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*"([^"]*)""#).expect("Invalid attribute regex")
});

/// Query the legacy listing endpoints in order and return the tracks of
/// the first one that lists any. Errors are logged and the next endpoint
/// is tried.
pub async fn fetch_legacy_tracks(client: &Client, endpoints: &EndpointConfig, video_id: &VideoId) -> Vec<SubtitleTrack> {
    for endpoint in &endpoints.legacy_list_endpoints {
        match fetch_from_endpoint(client, endpoint, endpoints, video_id).await {
            Ok(tracks) if !tracks.is_empty() => return tracks,
            Ok(_) => debug!("No tracks listed by {}", endpoint),
            Err(e) => debug!("API extraction error for {}: {}", endpoint, e),
        }
    }

    Vec::new()
}

async fn fetch_from_endpoint(
    client: &Client,
    endpoint: &str,
    endpoints: &EndpointConfig,
    video_id: &VideoId,
) -> Result<Vec<SubtitleTrack>, FetchError> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .append_pair("type", "list")
        .append_pair("v", video_id.as_str());

    let response = client.get(url).send().await?;
    debug!("API URL response: {}", response.status().as_u16());

    if response.status() != StatusCode::OK {
        return Ok(Vec::new());
    }

    let body = response.text().await?;
    parse_track_list(&body, &endpoints.caption_base_url, video_id)
}

/// Parse the `<track .../>` elements of a listing body. Attribute order and
/// unknown attributes do not matter; a track needs a non-empty `lang_code`.
pub fn parse_track_list(body: &str, caption_base_url: &str, video_id: &VideoId) -> Result<Vec<SubtitleTrack>, FetchError> {
    let mut tracks = Vec::new();

    for tag in TRACK_TAG_REGEX.captures_iter(body) {
        let attributes: HashMap<&str, &str> = ATTRIBUTE_REGEX
            .captures_iter(&tag[1])
            .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
            .collect();

        let Some(language) = attributes.get("lang_code").map(|code| decode_entities(code)) else {
            continue;
        };
        if language.is_empty() {
            continue;
        }

        let name = attributes.get("name").map(|name| decode_entities(name)).unwrap_or_default();
        let fetch_url = caption_url(caption_base_url, &language, video_id)?;
        tracks.push(SubtitleTrack::new(language, name, fetch_url));
    }

    Ok(tracks)
}

/// Per-language caption endpoint: `<base>?lang=<code>&v=<id>`
pub fn caption_url(caption_base_url: &str, language: &str, video_id: &VideoId) -> Result<String, FetchError> {
    let mut url = Url::parse(caption_base_url)?;
    url.query_pairs_mut()
        .append_pair("lang", language)
        .append_pair("v", video_id.as_str());
    Ok(url.into())
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
