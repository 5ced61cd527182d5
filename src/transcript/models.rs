//! Data models for transcripts.

use serde::{Deserialize, Serialize};

/// One caption unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Start time in seconds.
    pub start_seconds: f64,
    /// Display duration in seconds. Zero marks a point in time.
    pub duration_seconds: f64,
    /// Caption text as received, formatting artifacts included.
    pub text: String,
}

impl Cue {
    /// Create a new cue.
    pub fn new(start_seconds: f64, duration_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            duration_seconds,
            text: text.into(),
        }
    }

    /// End time in seconds.
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// One language's full, ordered set of cues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Language code of the cues.
    pub language: String,
    /// Cues ordered by start time.
    pub cues: Vec<Cue>,
    /// True when the cues are a machine translation.
    pub is_translated: bool,
    /// Language the translation was made from.
    pub source_language: Option<String>,
}

/// The resolved track for one request, plus request metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Video this transcript belongs to.
    pub video_id: String,
    /// Language the caller asked for.
    pub requested_language: String,
    /// The selected track.
    pub track: Track,
}

impl Transcript {
    pub fn new(video_id: impl Into<String>, requested_language: impl Into<String>, track: Track) -> Self {
        Self {
            video_id: video_id.into(),
            requested_language: requested_language.into(),
            track,
        }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.track.cues
    }

    pub fn language(&self) -> &str {
        &self.track.language
    }

    pub fn is_translated(&self) -> bool {
        self.track.is_translated
    }

    /// End of the last cue in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.track
            .cues
            .iter()
            .map(Cue::end_seconds)
            .fold(0.0_f64, f64::max)
    }
}

/// A fixed-duration window of merged cue text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Inclusive window start in seconds.
    pub window_start: f64,
    /// Exclusive window end in seconds.
    pub window_end: f64,
    /// Cue texts of the window, space separated. Empty for an empty window.
    pub text: String,
    /// Number of cues merged into this window.
    pub cue_count: usize,
}

/// A segmented transcript: the windows plus the track metadata they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedTranscript {
    pub video_id: String,
    pub language: String,
    pub is_translated: bool,
    pub segment_length: i64,
    pub segments: Vec<Segment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_accessors() {
        let track = Track {
            language: "en".to_string(),
            cues: vec![Cue::new(0.0, 2.0, "Hello"), Cue::new(1.0, 5.0, "overlap")],
            is_translated: false,
            source_language: None,
        };
        let transcript = Transcript::new("dQw4w9WgXcQ", "en", track);

        assert_eq!(transcript.language(), "en");
        assert!(!transcript.is_translated());
        assert_eq!(transcript.cues().len(), 2);
        assert_eq!(transcript.duration_seconds(), 6.0);
    }
}
