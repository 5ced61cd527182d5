//! Tracks command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::engine::TranscriptEngine;
use crate::source::{VideoId, YoutubeCaptionSource};
use anyhow::Result;
use std::sync::Arc;

/// Run the tracks command.
pub async fn run_tracks(input: &str, settings: Settings) -> Result<()> {
    let video_id = VideoId::parse(input)?;
    let source = Arc::new(YoutubeCaptionSource::with_config(&settings.youtube)?);
    let engine = TranscriptEngine::new(source, settings.transcript);

    let spinner = Output::spinner("Listing caption tracks...");
    let result = engine.list_tracks(video_id.as_str()).await;
    spinner.finish_and_clear();

    let tracks = match result {
        Ok(tracks) => tracks,
        Err(e) => {
            Output::error(&format!("Failed to list tracks: {}", e));
            return Err(e.into());
        }
    };

    Output::header(&format!("Caption tracks for {}", video_id));
    Output::kv("URL", &video_id.watch_url());
    println!();

    if tracks.is_empty() {
        Output::warning("This video has no captions.");
        return Ok(());
    }

    for track in &tracks {
        Output::track_info(track);
    }

    Ok(())
}
