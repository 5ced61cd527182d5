//! Caption track selection.
//!
//! Resolution is split in two: [`select_track`] decides which track to use
//! from the listed tracks alone, then [`LanguageResolver::resolve`] performs
//! the single fetch that selection calls for.

use super::{normalize_cues, Track};
use crate::error::{Result, TubescriptError};
use crate::source::{CaptionSource, TrackInfo, VideoId};
use tracing::{debug, info, instrument};

/// Which listed track a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSelection {
    /// A native track in the requested language.
    Native { track: TrackInfo },
    /// A native track machine-translated into the requested language.
    Translated { source: TrackInfo, target: String },
}

/// Choose a track for `requested` from the listed `tracks`.
///
/// A native match always wins. Otherwise, when translation is allowed, the
/// track marked default is translated, or the first listed translatable
/// track if none is marked.
pub fn select_track(
    video_id: &VideoId,
    tracks: &[TrackInfo],
    requested: &str,
    allow_translate: bool,
) -> Result<TrackSelection> {
    if tracks.is_empty() {
        return Err(TubescriptError::NoCaptionsAvailable {
            video_id: video_id.to_string(),
        });
    }

    if let Some(native) = tracks.iter().find(|t| t.language_code == requested) {
        return Ok(TrackSelection::Native {
            track: native.clone(),
        });
    }

    if allow_translate {
        let translatable = || tracks.iter().filter(|t| t.is_translatable);
        let source = translatable()
            .find(|t| t.is_default)
            .or_else(|| translatable().next());

        if let Some(source) = source {
            return Ok(TrackSelection::Translated {
                source: source.clone(),
                target: requested.to_string(),
            });
        }
    }

    let mut available: Vec<String> = tracks.iter().map(|t| t.language_code.clone()).collect();
    available.sort();
    available.dedup();

    Err(TubescriptError::LanguageUnavailable {
        requested: requested.to_string(),
        available,
    })
}

/// Resolves a video and language to a fetched, normalized track.
pub struct LanguageResolver<'a> {
    source: &'a dyn CaptionSource,
}

impl<'a> LanguageResolver<'a> {
    pub fn new(source: &'a dyn CaptionSource) -> Self {
        Self { source }
    }

    /// List tracks, select one, and fetch its cues. Costs exactly one list
    /// and one fetch on the source.
    #[instrument(skip(self), fields(video_id = %video_id))]
    pub async fn resolve(
        &self,
        video_id: &VideoId,
        requested: &str,
        allow_translate: bool,
    ) -> Result<Track> {
        let tracks = self.source.list_tracks(video_id).await?;
        debug!("{} caption tracks listed", tracks.len());

        let selection = select_track(video_id, &tracks, requested, allow_translate)?;

        let track = match selection {
            TrackSelection::Native { track } => {
                let raw = self.source.fetch_cues(video_id, &track).await?;
                Track {
                    language: track.language_code,
                    cues: normalize_cues(raw),
                    is_translated: false,
                    source_language: None,
                }
            }
            TrackSelection::Translated { source, target } => {
                info!("No '{}' track; translating from '{}'", target, source.language_code);
                let raw = self
                    .source
                    .fetch_translated_cues(video_id, &source, &target)
                    .await?;
                Track {
                    language: target,
                    cues: normalize_cues(raw),
                    is_translated: true,
                    source_language: Some(source.language_code),
                }
            }
        };

        Ok(track)
    }
}
