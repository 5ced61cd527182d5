//! Upstream caption source abstraction.
//!
//! The engine only ever talks to captions through [`CaptionSource`], so the
//! YouTube client can be swapped for [`MemoryCaptionSource`] in tests.

mod memory;
mod reference;
mod youtube;

pub use memory::MemoryCaptionSource;
pub use reference::VideoId;
pub use youtube::YoutubeCaptionSource;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A caption track as listed by the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Language code (e.g. "en", "ja", "pt-BR").
    pub language_code: String,
    /// Human-readable track name.
    pub name: String,
    /// Whether the upstream marks this as the video's default track.
    pub is_default: bool,
    /// Whether the track was generated by speech recognition.
    pub is_generated: bool,
    /// Whether the upstream can translate this track.
    pub is_translatable: bool,
    /// Source-specific location of the cue data, filled in by `list_tracks`
    /// so a fetch does not need to list again. Never serialized.
    #[serde(skip)]
    pub download_url: Option<String>,
}

impl TrackInfo {
    /// Create a manually authored, translatable track.
    pub fn native(language_code: &str) -> Self {
        Self {
            language_code: language_code.to_string(),
            name: language_code.to_string(),
            is_default: false,
            is_generated: false,
            is_translatable: true,
            download_url: None,
        }
    }
}

/// A caption cue exactly as received from upstream.
///
/// Timing fields are optional because upstream data is not guaranteed to
/// carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCue {
    pub start: Option<f64>,
    pub duration: Option<f64>,
    pub text: String,
}

impl RawCue {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start: Some(start),
            duration: Some(duration),
            text: text.into(),
        }
    }
}

/// Trait for caption providers.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// List the native caption tracks of a video.
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TrackInfo>>;

    /// Fetch the cues of a track returned by [`CaptionSource::list_tracks`].
    async fn fetch_cues(&self, video_id: &VideoId, track: &TrackInfo) -> Result<Vec<RawCue>>;

    /// Fetch a listed track machine-translated into another language.
    async fn fetch_translated_cues(
        &self,
        video_id: &VideoId,
        source: &TrackInfo,
        target_language: &str,
    ) -> Result<Vec<RawCue>>;
}
