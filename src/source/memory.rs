//! In-memory caption source implementation.
//!
//! Useful for testing and for feeding pre-downloaded captions to the engine.

use super::{CaptionSource, RawCue, TrackInfo, VideoId};
use crate::error::{FetchFailureKind, Result, TubescriptError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct MemoryVideo {
    tracks: Vec<(TrackInfo, Vec<RawCue>)>,
    translations: HashMap<(String, String), Vec<RawCue>>,
}

/// In-memory caption source.
#[derive(Debug, Default)]
pub struct MemoryCaptionSource {
    videos: HashMap<String, MemoryVideo>,
    requests: AtomicUsize,
}

impl MemoryCaptionSource {
    /// Create an empty source. Every lookup fails with "not found".
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a video that exists but has no caption tracks.
    pub fn with_video(mut self, video_id: &str) -> Self {
        self.videos.entry(video_id.to_string()).or_default();
        self
    }

    /// Register a native track, listed after any track added before it.
    pub fn with_track(mut self, video_id: &str, info: TrackInfo, cues: Vec<RawCue>) -> Self {
        self.videos
            .entry(video_id.to_string())
            .or_default()
            .tracks
            .push((info, cues));
        self
    }

    /// Register the cues returned when `source` is translated into `target`.
    pub fn with_translation(
        mut self,
        video_id: &str,
        source: &str,
        target: &str,
        cues: Vec<RawCue>,
    ) -> Self {
        self.videos
            .entry(video_id.to_string())
            .or_default()
            .translations
            .insert((source.to_string(), target.to_string()), cues);
        self
    }

    /// Number of upstream calls served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn video(&self, video_id: &VideoId) -> Result<&MemoryVideo> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.videos.get(video_id.as_str()).ok_or_else(|| {
            TubescriptError::upstream(
                FetchFailureKind::NotFound,
                format!("Video {} not found", video_id),
            )
        })
    }

    fn unavailable(video: &MemoryVideo, requested: &str) -> TubescriptError {
        let mut available: Vec<String> = video
            .tracks
            .iter()
            .map(|(info, _)| info.language_code.clone())
            .collect();
        available.sort();
        available.dedup();
        TubescriptError::LanguageUnavailable {
            requested: requested.to_string(),
            available,
        }
    }
}

#[async_trait]
impl CaptionSource for MemoryCaptionSource {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TrackInfo>> {
        let video = self.video(video_id)?;
        Ok(video.tracks.iter().map(|(info, _)| info.clone()).collect())
    }

    async fn fetch_cues(&self, video_id: &VideoId, track: &TrackInfo) -> Result<Vec<RawCue>> {
        let video = self.video(video_id)?;
        video
            .tracks
            .iter()
            .find(|(info, _)| info.language_code == track.language_code)
            .map(|(_, cues)| cues.clone())
            .ok_or_else(|| Self::unavailable(video, &track.language_code))
    }

    async fn fetch_translated_cues(
        &self,
        video_id: &VideoId,
        source: &TrackInfo,
        target_language: &str,
    ) -> Result<Vec<RawCue>> {
        let video = self.video(video_id)?;
        video
            .translations
            .get(&(source.language_code.clone(), target_language.to_string()))
            .cloned()
            .ok_or_else(|| Self::unavailable(video, target_language))
    }
}
