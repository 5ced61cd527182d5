//! Transcript retrieval and segmentation.
//!
//! # Pipeline
//!
//! 1. [`LanguageResolver`] picks a native or translated caption track.
//! 2. [`normalize_cues`] turns raw upstream cues into an ordered [`Cue`] list.
//! 3. The cue list is rendered with [`render_text`] or windowed with
//!    [`segment_cues`].

mod format;
mod language;
mod models;
mod normalize;
mod segment;

pub use format::{format_timestamp, render_segments, render_text};
pub use language::{select_track, LanguageResolver, TrackSelection};
pub use models::{Cue, Segment, SegmentedTranscript, Track, Transcript};
pub use normalize::normalize_cues;
pub use segment::segment_cues;
