//! YouTube caption source implementation.
//!
//! Caption tracks come from the innertube player endpoint; cue data is
//! downloaded from each track's timedtext URL in `json3` format.

use super::{CaptionSource, RawCue, TrackInfo, VideoId};
use crate::config::YoutubeSettings;
use crate::error::{FetchFailureKind, Result, TubescriptError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

/// Caption source backed by youtube.com.
pub struct YoutubeCaptionSource {
    client: reqwest::Client,
    api_key_regex: Regex,
}

impl YoutubeCaptionSource {
    /// Create a source with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(&YoutubeSettings::default())
    }

    /// Create a source with custom timeout and user agent.
    pub fn with_config(settings: &YoutubeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| TubescriptError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let api_key_regex = Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
            .expect("Invalid regex");

        Ok(Self {
            client,
            api_key_regex,
        })
    }

    /// Scrape the innertube API key from the watch page.
    async fn fetch_innertube_key(&self, video_id: &VideoId) -> Result<String> {
        let response = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id.as_str())])
            .header(ACCEPT_LANGUAGE, "en-US")
            // Skips the EU consent interstitial
            .header(COOKIE, "CONSENT=YES+cb")
            .send()
            .await?;

        let response = check_status(response, video_id)?;
        let html = response.text().await?;

        if let Some(caps) = self.api_key_regex.captures(&html) {
            return Ok(caps[1].to_string());
        }

        if html.contains("class=\"g-recaptcha\"") {
            return Err(TubescriptError::upstream(
                FetchFailureKind::RateLimited,
                "YouTube is asking for a captcha; too many requests from this IP",
            ));
        }

        Err(TubescriptError::upstream(
            FetchFailureKind::InvalidResponse,
            format!("Could not find an innertube key on the watch page of {}", video_id),
        ))
    }

    /// Fetch the caption track list, ordered manual tracks first.
    ///
    /// Each returned track carries its timedtext URL in `download_url`.
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn caption_tracks(&self, video_id: &VideoId) -> Result<Vec<TrackInfo>> {
        let api_key = self.fetch_innertube_key(video_id).await?;

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id.as_str(),
        });

        let response = self
            .client
            .post(PLAYER_URL)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let response = check_status(response, video_id)?;
        let player: PlayerResponse = response.json().await?;

        let tracks = player.into_caption_tracks(video_id)?;
        debug!("Found {} caption tracks", tracks.len());
        Ok(tracks)
    }

    /// The timedtext URL of `track`, listing again only for tracks built
    /// outside `list_tracks`.
    async fn track_url(&self, video_id: &VideoId, track: &TrackInfo) -> Result<String> {
        if let Some(url) = &track.download_url {
            return Ok(url.clone());
        }

        debug!("Track '{}' has no download URL; listing tracks", track.language_code);
        let tracks = self.caption_tracks(video_id).await?;
        tracks
            .iter()
            .find(|t| t.language_code == track.language_code)
            .and_then(|t| t.download_url.clone())
            .ok_or_else(|| TubescriptError::LanguageUnavailable {
                requested: track.language_code.clone(),
                available: available_codes(&tracks),
            })
    }

    /// Download and decode the cues at a timedtext URL.
    async fn download_cues(
        &self,
        video_id: &VideoId,
        base_url: &str,
        translate_to: Option<&str>,
    ) -> Result<Vec<RawCue>> {
        let url = timedtext_url(base_url, translate_to)?;

        let response = self.client.get(url).send().await?;
        let response = check_status(response, video_id)?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Err(TubescriptError::upstream(
                FetchFailureKind::InvalidResponse,
                format!("Empty caption document for {}", video_id),
            ));
        }

        let document: Json3Document = serde_json::from_str(&body).map_err(|e| {
            TubescriptError::upstream(
                FetchFailureKind::InvalidResponse,
                format!("Failed to parse caption document: {}", e),
            )
        })?;

        Ok(document.into_cues())
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptionSource {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TrackInfo>> {
        self.caption_tracks(video_id).await
    }

    async fn fetch_cues(&self, video_id: &VideoId, track: &TrackInfo) -> Result<Vec<RawCue>> {
        let url = self.track_url(video_id, track).await?;
        self.download_cues(video_id, &url, None).await
    }

    async fn fetch_translated_cues(
        &self,
        video_id: &VideoId,
        source: &TrackInfo,
        target_language: &str,
    ) -> Result<Vec<RawCue>> {
        if !source.is_translatable {
            return Err(TubescriptError::LanguageUnavailable {
                requested: target_language.to_string(),
                available: vec![source.language_code.clone()],
            });
        }

        let url = self.track_url(video_id, source).await?;
        self.download_cues(video_id, &url, Some(target_language)).await
    }
}

fn available_codes(tracks: &[TrackInfo]) -> Vec<String> {
    let mut codes: Vec<String> = tracks.iter().map(|t| t.language_code.clone()).collect();
    codes.sort();
    codes.dedup();
    codes
}

/// Map HTTP error statuses onto upstream failure kinds.
fn check_status(response: reqwest::Response, video_id: &VideoId) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(TubescriptError::upstream(
        status_kind(status),
        format!("YouTube returned {} for video {}", status, video_id),
    ))
}

fn status_kind(status: StatusCode) -> FetchFailureKind {
    match status {
        StatusCode::NOT_FOUND => FetchFailureKind::NotFound,
        StatusCode::TOO_MANY_REQUESTS => FetchFailureKind::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchFailureKind::Blocked,
        _ => FetchFailureKind::Network,
    }
}

/// Build the `json3` download URL for a track, optionally translated.
fn timedtext_url(base_url: &str, translate_to: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| {
        TubescriptError::upstream(
            FetchFailureKind::InvalidResponse,
            format!("Invalid caption URL '{}': {}", base_url, e),
        )
    })?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt" && k != "tlang")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("fmt", "json3");
        if let Some(lang) = translate_to {
            pairs.append_pair("tlang", lang);
        }
    }

    Ok(url)
}

// ============================================================================
// Player response
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<PlayerCaptionTrack>,
    #[serde(default)]
    audio_tracks: Vec<AudioTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    name: Option<TrackName>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    is_translatable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudioTrack {
    #[serde(default)]
    default_caption_track_index: Option<usize>,
}

impl TrackName {
    fn text(&self) -> Option<String> {
        self.simple_text
            .clone()
            .or_else(|| self.runs.first().map(|r| r.text.clone()))
    }
}

impl PlayerResponse {
    fn into_caption_tracks(self, video_id: &VideoId) -> Result<Vec<TrackInfo>> {
        if let Some(status) = &self.playability_status {
            if status.status != "OK" {
                let reason = status.reason.clone().unwrap_or_default();
                let kind = match status.status.as_str() {
                    "LOGIN_REQUIRED" => FetchFailureKind::Blocked,
                    _ => FetchFailureKind::NotFound,
                };
                return Err(TubescriptError::upstream(
                    kind,
                    format!("Video {} is unavailable ({}): {}", video_id, status.status, reason),
                ));
            }
        }

        let renderer = self
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .filter(|r| !r.caption_tracks.is_empty())
            .ok_or_else(|| TubescriptError::NoCaptionsAvailable {
                video_id: video_id.to_string(),
            })?;

        let default_index = renderer
            .audio_tracks
            .first()
            .and_then(|a| a.default_caption_track_index);

        let mut tracks: Vec<TrackInfo> = renderer
            .caption_tracks
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let is_generated = t.kind.as_deref() == Some("asr");
                let name = t
                    .name
                    .as_ref()
                    .and_then(TrackName::text)
                    .unwrap_or_else(|| t.language_code.clone());
                TrackInfo {
                    language_code: t.language_code,
                    name,
                    is_default: default_index == Some(i),
                    is_generated,
                    is_translatable: t.is_translatable,
                    download_url: Some(t.base_url),
                }
            })
            .collect();

        // Manually created tracks win over generated ones; stable otherwise
        tracks.sort_by_key(|t| t.is_generated);
        Ok(tracks)
    }
}

// ============================================================================
// json3 caption document
// ============================================================================

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: Option<f64>,
    #[serde(default)]
    d_duration_ms: Option<f64>,
    #[serde(default)]
    segs: Option<Vec<Json3Seg>>,
    #[serde(default)]
    a_append: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: Option<String>,
}

impl Json3Document {
    fn into_cues(self) -> Vec<RawCue> {
        self.events
            .into_iter()
            // Window/style events carry no text; append events only add line breaks
            .filter(|e| e.a_append.is_none())
            .filter_map(|e| {
                let segs = e.segs?;
                let text: String = segs.into_iter().filter_map(|s| s.utf8).collect();
                Some(RawCue {
                    start: e.t_start_ms.map(|ms| ms / 1000.0),
                    duration: e.d_duration_ms.map(|ms| ms / 1000.0),
                    text,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> VideoId {
        VideoId::parse("dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_player_response_track_order_and_default() {
        let json = serde_json::json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        { "baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=en&kind=asr",
                          "languageCode": "en", "kind": "asr", "isTranslatable": true,
                          "name": { "runs": [{ "text": "English (auto-generated)" }] } },
                        { "baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=ja",
                          "languageCode": "ja", "isTranslatable": true,
                          "name": { "simpleText": "Japanese" } },
                    ],
                    "audioTracks": [{ "defaultCaptionTrackIndex": 1 }]
                }
            }
        });

        let player: PlayerResponse = serde_json::from_value(json).unwrap();
        let tracks = player.into_caption_tracks(&video()).unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "ja");
        assert!(tracks[0].is_default);
        assert!(!tracks[0].is_generated);
        assert_eq!(tracks[0].name, "Japanese");
        assert_eq!(tracks[1].language_code, "en");
        assert!(tracks[1].is_generated);
        assert_eq!(tracks[1].name, "English (auto-generated)");
        assert_eq!(
            tracks[0].download_url.as_deref(),
            Some("https://www.youtube.com/api/timedtext?v=x&lang=ja")
        );
    }

    #[test]
    fn test_download_url_not_serialized() {
        let track = TrackInfo {
            download_url: Some("https://www.youtube.com/api/timedtext?v=x".to_string()),
            ..TrackInfo::native("en")
        };

        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("download_url").is_none());
        assert_eq!(json["language_code"], "en");
    }

    #[test]
    fn test_status_kind() {
        assert_eq!(status_kind(StatusCode::NOT_FOUND), FetchFailureKind::NotFound);
        assert_eq!(status_kind(StatusCode::TOO_MANY_REQUESTS), FetchFailureKind::RateLimited);
        assert_eq!(status_kind(StatusCode::FORBIDDEN), FetchFailureKind::Blocked);
        assert_eq!(status_kind(StatusCode::UNAUTHORIZED), FetchFailureKind::Blocked);
        assert_eq!(status_kind(StatusCode::INTERNAL_SERVER_ERROR), FetchFailureKind::Network);
    }

    #[tokio::test]
    async fn test_untranslatable_source_fails_without_request() {
        let source = YoutubeCaptionSource::new().unwrap();
        let track = TrackInfo {
            is_translatable: false,
            download_url: Some("http://127.0.0.1:9/unreachable".to_string()),
            ..TrackInfo::native("de")
        };

        let err = source.fetch_translated_cues(&video(), &track, "fr").await.unwrap_err();
        assert!(matches!(err, TubescriptError::LanguageUnavailable { .. }));
    }

    #[test]
    fn test_player_response_without_captions() {
        let json = serde_json::json!({ "playabilityStatus": { "status": "OK" } });
        let player: PlayerResponse = serde_json::from_value(json).unwrap();

        let err = player.into_caption_tracks(&video()).unwrap_err();
        assert!(matches!(err, TubescriptError::NoCaptionsAvailable { .. }));
    }

    #[test]
    fn test_player_response_unplayable() {
        let json = serde_json::json!({
            "playabilityStatus": { "status": "ERROR", "reason": "Video unavailable" }
        });
        let player: PlayerResponse = serde_json::from_value(json).unwrap();

        match player.into_caption_tracks(&video()).unwrap_err() {
            TubescriptError::UpstreamFetchFailure { kind, message } => {
                assert_eq!(kind, FetchFailureKind::NotFound);
                assert!(message.contains("Video unavailable"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_json3_into_cues() {
        let body = r#"{
            "events": [
                { "tStartMs": 0, "dDurationMs": 120000, "id": 1 },
                { "tStartMs": 1500, "dDurationMs": 2000, "segs": [{ "utf8": "Hello " }, { "utf8": "there" }] },
                { "tStartMs": 3500, "aAppend": 1, "segs": [{ "utf8": "\n" }] },
                { "tStartMs": 4000, "segs": [{ "utf8": "no duration" }] }
            ]
        }"#;

        let doc: Json3Document = serde_json::from_str(body).unwrap();
        let cues = doc.into_cues();

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0], RawCue::new(1.5, 2.0, "Hello there"));
        assert_eq!(cues[1].start, Some(4.0));
        assert_eq!(cues[1].duration, None);
    }

    #[test]
    fn test_timedtext_url_rewrites_format() {
        let url = timedtext_url(
            "https://www.youtube.com/api/timedtext?v=abc&lang=en&fmt=srv3",
            Some("ja"),
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("fmt".to_string(), "json3".to_string())));
        assert!(pairs.contains(&("tlang".to_string(), "ja".to_string())));
        assert!(!pairs.contains(&("fmt".to_string(), "srv3".to_string())));
        assert!(pairs.contains(&("lang".to_string(), "en".to_string())));
    }
}
