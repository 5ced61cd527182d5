//! Transcript engine.
//!
//! Entry point shared by the CLI, the MCP server, and the HTTP API. Each call
//! runs its own fetch-resolve-normalize pipeline; nothing is cached or shared
//! between calls.

use crate::config::TranscriptSettings;
use crate::error::{Result, TubescriptError};
use crate::source::{CaptionSource, TrackInfo, VideoId};
use crate::transcript::{segment_cues, LanguageResolver, SegmentedTranscript, Transcript};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Fetches transcripts from a caption source and derives views from them.
pub struct TranscriptEngine {
    source: Arc<dyn CaptionSource>,
    settings: TranscriptSettings,
}

impl TranscriptEngine {
    /// Create an engine over a caption source.
    pub fn new(source: Arc<dyn CaptionSource>, settings: TranscriptSettings) -> Self {
        Self { source, settings }
    }

    /// Request defaults this engine was built with.
    pub fn settings(&self) -> &TranscriptSettings {
        &self.settings
    }

    /// Fetch the transcript of a video in `language`.
    ///
    /// With `translate`, a missing language is served by machine-translating
    /// another track.
    #[instrument(skip(self))]
    pub async fn get_transcript(
        &self,
        video_ref: &str,
        language: &str,
        translate: bool,
    ) -> Result<Transcript> {
        let video_id = VideoId::parse(video_ref)?;
        self.fetch(&video_id, language, translate).await
    }

    /// Fetch a transcript and split it into `segment_length`-second windows.
    #[instrument(skip(self))]
    pub async fn get_transcript_by_segments(
        &self,
        video_ref: &str,
        language: &str,
        segment_length: i64,
        translate: bool,
    ) -> Result<SegmentedTranscript> {
        let video_id = VideoId::parse(video_ref)?;
        if segment_length <= 0 {
            return Err(TubescriptError::InvalidSegmentLength(segment_length));
        }

        let transcript = self.fetch(&video_id, language, translate).await?;
        let segments = segment_cues(transcript.cues(), segment_length)?;
        debug!("Split {} cues into {} segments", transcript.cues().len(), segments.len());

        Ok(SegmentedTranscript {
            video_id: transcript.video_id,
            language: transcript.track.language,
            is_translated: transcript.track.is_translated,
            segment_length,
            segments,
        })
    }

    /// List the caption tracks of a video.
    pub async fn list_tracks(&self, video_ref: &str) -> Result<Vec<TrackInfo>> {
        let video_id = VideoId::parse(video_ref)?;
        self.source.list_tracks(&video_id).await
    }

    async fn fetch(&self, video_id: &VideoId, language: &str, translate: bool) -> Result<Transcript> {
        let language = language.trim();
        if language.is_empty() {
            return Err(TubescriptError::InvalidInput(
                "Language code must not be empty".to_string(),
            ));
        }

        let resolver = LanguageResolver::new(self.source.as_ref());
        let track = resolver.resolve(video_id, language, translate).await?;

        info!(
            "Fetched {} cues for {} ({}{})",
            track.cues.len(),
            video_id,
            track.language,
            if track.is_translated { ", translated" } else { "" }
        );

        Ok(Transcript::new(video_id.to_string(), language, track))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemoryCaptionSource, RawCue};
    use crate::transcript::render_text;

    const VIDEO: &str = "dQw4w9WgXcQ";

    fn engine_with(source: MemoryCaptionSource) -> (TranscriptEngine, Arc<MemoryCaptionSource>) {
        let source = Arc::new(source);
        let engine = TranscriptEngine::new(source.clone(), TranscriptSettings::default());
        (engine, source)
    }

    fn sample_source() -> MemoryCaptionSource {
        MemoryCaptionSource::new()
            .with_track(
                VIDEO,
                TrackInfo::native("en"),
                vec![
                    RawCue::new(10.0, 1.0, "End"),
                    RawCue::new(0.0, 2.0, "Hello"),
                    RawCue::new(2.0, 3.0, "world"),
                ],
            )
            .with_track(VIDEO, TrackInfo::native("ja"), vec![RawCue::new(0.0, 1.0, "やあ")])
    }

    #[tokio::test]
    async fn test_get_transcript_from_url() {
        let (engine, _) = engine_with(sample_source());

        let transcript = engine
            .get_transcript("https://youtu.be/dQw4w9WgXcQ", "en", false)
            .await
            .unwrap();

        assert_eq!(transcript.video_id, VIDEO);
        assert_eq!(transcript.requested_language, "en");
        assert!(!transcript.is_translated());
        assert_eq!(render_text(transcript.cues(), false), "Hello world End");
    }

    #[tokio::test]
    async fn test_segments_scenario() {
        let (engine, _) = engine_with(sample_source());

        let segmented = engine
            .get_transcript_by_segments(VIDEO, "en", 5, false)
            .await
            .unwrap();

        assert_eq!(segmented.language, "en");
        assert_eq!(segmented.segment_length, 5);
        let summary: Vec<(f64, &str, usize)> = segmented
            .segments
            .iter()
            .map(|s| (s.window_start, s.text.as_str(), s.cue_count))
            .collect();
        assert_eq!(summary, vec![(0.0, "Hello world", 2), (5.0, "", 0), (10.0, "End", 1)]);
    }

    #[tokio::test]
    async fn test_one_list_and_one_fetch_per_request() {
        let (engine, source) = engine_with(sample_source());

        engine.get_transcript(VIDEO, "en", false).await.unwrap();
        assert_eq!(source.request_count(), 2);

        engine.get_transcript_by_segments(VIDEO, "ja", 30, false).await.unwrap();
        assert_eq!(source.request_count(), 4);
    }

    #[tokio::test]
    async fn test_invalid_reference_fails_before_fetch() {
        let (engine, source) = engine_with(sample_source());

        let err = engine.get_transcript("not a video", "en", true).await.unwrap_err();

        assert!(matches!(err, TubescriptError::InvalidVideoReference(_)));
        assert_eq!(source.request_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_segment_length_fails_before_fetch() {
        let (engine, source) = engine_with(sample_source());

        let err = engine
            .get_transcript_by_segments(VIDEO, "en", 0, false)
            .await
            .unwrap_err();

        assert!(matches!(err, TubescriptError::InvalidSegmentLength(0)));
        assert_eq!(source.request_count(), 0);
    }

    #[tokio::test]
    async fn test_language_unavailable_names_tracks() {
        let (engine, _) = engine_with(sample_source());

        match engine.get_transcript(VIDEO, "fr", false).await.unwrap_err() {
            TubescriptError::LanguageUnavailable { requested, available } => {
                assert_eq!(requested, "fr");
                assert_eq!(available, vec!["en".to_string(), "ja".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_video_without_captions() {
        let (engine, _) = engine_with(MemoryCaptionSource::new().with_video(VIDEO));

        let err = engine.get_transcript(VIDEO, "en", true).await.unwrap_err();
        assert!(matches!(err, TubescriptError::NoCaptionsAvailable { .. }));
    }

    #[tokio::test]
    async fn test_unknown_video_is_upstream_failure() {
        let (engine, _) = engine_with(MemoryCaptionSource::new());

        let err = engine.get_transcript(VIDEO, "en", false).await.unwrap_err();
        assert_eq!(err.kind(), "upstream_fetch_failure");
    }
}
