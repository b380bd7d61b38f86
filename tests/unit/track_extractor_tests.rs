/*!
 * Tests for caption track extraction from watch page bodies
 */

use yt_sub_fetch::track_extractor::{extract_tracks, strategies, unescape};
use yt_sub_fetch::SubtitleTrack;
use crate::common;

#[test]
fn test_extract_tracks_withSingleQuotedCaptionTracks_shouldReturnTrack() {
    let body = r#"'captionTracks': [{"languageCode":"en","name":{"simpleText":"English"},"baseUrl":"http://x/en"}]"#;

    let tracks = extract_tracks(body);

    assert_eq!(tracks, vec![SubtitleTrack::new("en", "English", "http://x/en")]);
}

#[test]
fn test_extract_tracks_withPlayerResponse_shouldKeepDiscoveryOrder() {
    let tracks_json = format!(
        "[{},{},{}]",
        common::track_json("en", "English", "https://www.youtube.com/api/timedtext?v=a&lang=en"),
        common::track_json("zh-TW", "Chinese (Taiwan)", "https://www.youtube.com/api/timedtext?v=a&lang=zh-TW"),
        common::track_json("de", "German", "https://www.youtube.com/api/timedtext?v=a&lang=de"),
    );
    let body = common::watch_page(&tracks_json);

    let languages: Vec<String> = extract_tracks(&body).into_iter().map(|t| t.language).collect();

    assert_eq!(languages, vec!["en", "zh-TW", "de"]);
}

#[test]
fn test_extract_tracks_withNoCaptions_shouldReturnEmpty() {
    assert!(extract_tracks("<html><body>No captions here</body></html>").is_empty());
    assert!(extract_tracks("").is_empty());
}

#[test]
fn test_extract_tracks_withTwoSpellings_shouldUseHigherPriorityOnly() {
    let body = concat!(
        r#""captionTracks":[{"languageCode":"de","name":"German","baseUrl":"http://x/de"}]"#,
        " ... ",
        r#"'caption_tracks': [{"languageCode":"en","name":"English","baseUrl":"http://x/en"}]"#,
    );

    let tracks = extract_tracks(body);

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].language, "en");
    // Same answer every time
    assert_eq!(extract_tracks(body), tracks);
}

#[test]
fn test_extract_tracks_withBrokenHigherPriorityMatch_shouldFallToNextStrategy() {
    let body = concat!(
        r#"'caption_tracks': [{"languageCode": broken}]"#,
        r#""captionTracks":[{"languageCode":"fr","name":"French","baseUrl":"http://x/fr"}]"#,
    );

    let tracks = extract_tracks(body);

    assert_eq!(tracks, vec![SubtitleTrack::new("fr", "French", "http://x/fr")]);
}

#[test]
fn test_extract_tracks_withBrokenFirstCandidate_shouldUseNextCandidateOfSameKey() {
    let body = concat!(
        r#""captionTracks":[{not json}]"#,
        r#""captionTracks":[]"#,
        r#""captionTracks":[{"languageCode":"ja","name":"Japanese","baseUrl":"http://x/ja"}]"#,
    );

    let tracks = extract_tracks(body);

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].language, "ja");
}

#[test]
fn test_extract_tracks_withEscapedJson_shouldUnescapeBeforeParsing() {
    let body = r#"'captionTracks': [{\"languageCode\":\"en\",\"name\":{\"simpleText\":\"English\"},\"baseUrl\":\"https:\/\/www.youtube.com\/api\/timedtext?lang=en\"}]"#;

    let tracks = extract_tracks(body);

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].fetch_url, "https://www.youtube.com/api/timedtext?lang=en");
}

#[test]
fn test_extract_tracks_withUnicodeEscapedName_shouldDecode() {
    let body = r#""captionTracks":[{"languageCode":"zh-TW","name":{"simpleText":"\u4e2d\u6587"},"baseUrl":"http://x/zh"}]"#;

    let tracks = extract_tracks(body);

    assert_eq!(tracks[0].name, "中文");
}

#[test]
fn test_extract_tracks_withRawName_shouldFallBackToRawValue() {
    let body = r#""captionTracks":[{"languageCode":"es","name":"Spanish","baseUrl":"http://x/es"}]"#;

    assert_eq!(extract_tracks(body)[0].name, "Spanish");
}

#[test]
fn test_extract_tracks_withAsrTrack_shouldIncludeIt() {
    let body = r#""captionTracks":[{"languageCode":"en","kind":"asr","name":{"simpleText":"English (auto-generated)"},"baseUrl":"http://x/asr"}]"#;

    let tracks = extract_tracks(body);

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].name, "English (auto-generated)");
}

#[test]
fn test_extract_tracks_withMissingLanguageCode_shouldSkipEntry() {
    let body = r#""captionTracks":[{"name":"Unknown","baseUrl":"http://x/u"},{"languageCode":"","baseUrl":"http://x/e"},{"languageCode":"it","baseUrl":"http://x/it"}]"#;

    let tracks = extract_tracks(body);

    assert_eq!(tracks, vec![SubtitleTrack::new("it", "", "http://x/it")]);
}

#[test]
fn test_strategies_shouldBeInPriorityOrder() {
    let names: Vec<&str> = strategies().iter().map(|s| s.name()).collect();

    assert_eq!(
        names,
        vec![
            "single-quoted caption_tracks",
            "double-quoted caption_tracks",
            "single-quoted captionTracks",
            "double-quoted captionTracks",
        ]
    );
}

#[test]
fn test_unescape_withPunctuationEscapes_shouldDropBackslash() {
    assert_eq!(unescape(r#"\"a\\b\/c\t"#), r#""a\b/ct"#);
}

#[test]
fn test_unescape_withUnicodeEscapes_shouldDecode() {
    assert_eq!(unescape(r"\u4e2d\u6587"), "中文");
    assert_eq!(unescape(r"caf\u00e9"), "café");
}
