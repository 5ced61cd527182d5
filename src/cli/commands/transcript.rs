//! Transcript command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::engine::TranscriptEngine;
use crate::error::{FetchFailureKind, TubescriptError};
use crate::persist::{save_segments, save_transcript, text_sidecar_path, write_atomic};
use crate::source::YoutubeCaptionSource;
use crate::transcript::{render_segments, render_text};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Options for the transcript command.
#[derive(Debug, Clone)]
pub struct TranscriptOptions {
    pub input: String,
    pub language: Option<String>,
    pub translate: bool,
    pub timestamps: bool,
    pub segment: Option<i64>,
    pub output: Option<String>,
}

/// Run the transcript command.
pub async fn run_transcript(options: TranscriptOptions, settings: Settings) -> Result<()> {
    let source = Arc::new(YoutubeCaptionSource::with_config(&settings.youtube)?);
    let engine = TranscriptEngine::new(source, settings.transcript.clone());

    let language = options
        .language
        .clone()
        .unwrap_or_else(|| settings.transcript.default_language.clone());
    let translate = options.translate || settings.transcript.translate;

    let mut timestamps = options.timestamps;
    if options.segment.is_some() && !timestamps {
        Output::info("Segmented output always includes timestamps.");
        timestamps = true;
    }

    let spinner = Output::spinner(&format!("Fetching {} captions...", language));

    let (json, text) = match options.segment {
        Some(length) => {
            let result = engine
                .get_transcript_by_segments(&options.input, &language, length, translate)
                .await;
            spinner.finish_and_clear();
            let segmented = result.map_err(|e| report(e, translate))?;

            Output::success(&format!(
                "{} segments of {}s ({}{})",
                segmented.segments.len(),
                length,
                segmented.language,
                if segmented.is_translated { ", translated" } else { "" }
            ));

            let text = render_segments(&segmented.segments, timestamps);
            match &options.output {
                Some(path) => {
                    let path = Settings::expand_path(path);
                    save_segments(&segmented, &path)?;
                    (Some(path), text)
                }
                None => (None, text),
            }
        }
        None => {
            let result = engine.get_transcript(&options.input, &language, translate).await;
            spinner.finish_and_clear();
            let transcript = result.map_err(|e| report(e, translate))?;

            Output::success(&format!(
                "{} lines ({}{})",
                transcript.cues().len(),
                transcript.language(),
                if transcript.is_translated() { ", translated" } else { "" }
            ));

            let text = render_text(transcript.cues(), timestamps);
            match &options.output {
                Some(path) => {
                    let path = Settings::expand_path(path);
                    save_transcript(&transcript, &path)?;
                    (Some(path), text)
                }
                None => (None, text),
            }
        }
    };

    match json {
        Some(path) => write_outputs(&path, &text),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

/// Write the text side-file next to an already-saved JSON document.
fn write_outputs(json_path: &Path, text: &str) -> Result<()> {
    let text_path = text_sidecar_path(json_path);
    write_atomic(&text_path, text.as_bytes())?;

    Output::success(&format!("Saved {}", json_path.display()));
    Output::success(&format!("Saved {}", text_path.display()));
    Ok(())
}

/// Print a failure with a hint where one helps, and pass it on.
fn report(err: TubescriptError, translate: bool) -> anyhow::Error {
    Output::error(&err.to_string());
    if let Some(hint) = failure_hint(&err, translate) {
        Output::info(hint);
    }
    err.into()
}

fn failure_hint(err: &TubescriptError, translate: bool) -> Option<&'static str> {
    match err {
        TubescriptError::LanguageUnavailable { .. } if !translate => {
            Some("Try --translate to machine-translate from an available track.")
        }
        TubescriptError::InvalidVideoReference(_) => {
            Some("Pass a YouTube URL or an 11-character video ID.")
        }
        TubescriptError::UpstreamFetchFailure {
            kind: FetchFailureKind::RateLimited | FetchFailureKind::Blocked,
            ..
        } => Some("YouTube is refusing requests from this address. Wait and retry."),
        _ => None,
    }
}
