//! Saving and loading transcripts as JSON documents.
//!
//! Documents are serialized in full before anything touches the disk, written
//! to a temporary file next to the destination, and then renamed into place,
//! so a failed save never leaves a truncated file behind.

use crate::error::{Result, TubescriptError};
use crate::transcript::{Cue, Segment, SegmentedTranscript, Track, Transcript};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// On-disk form of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptDocument {
    pub video_id: String,
    pub language: String,
    pub is_translated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    pub cues: Vec<Cue>,
}

/// On-disk form of a segment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentsDocument {
    pub video_id: String,
    pub language: String,
    pub is_translated: bool,
    pub segments: Vec<Segment>,
}

impl From<&Transcript> for TranscriptDocument {
    fn from(transcript: &Transcript) -> Self {
        Self {
            video_id: transcript.video_id.clone(),
            language: transcript.track.language.clone(),
            is_translated: transcript.track.is_translated,
            source_language: transcript.track.source_language.clone(),
            cues: transcript.track.cues.clone(),
        }
    }
}

impl From<TranscriptDocument> for Transcript {
    fn from(doc: TranscriptDocument) -> Self {
        // A resolved track is always in the requested language
        let requested = doc.language.clone();
        Transcript::new(
            doc.video_id,
            requested,
            Track {
                language: doc.language,
                cues: doc.cues,
                is_translated: doc.is_translated,
                source_language: doc.source_language,
            },
        )
    }
}

impl From<&SegmentedTranscript> for SegmentsDocument {
    fn from(segmented: &SegmentedTranscript) -> Self {
        Self {
            video_id: segmented.video_id.clone(),
            language: segmented.language.clone(),
            is_translated: segmented.is_translated,
            segments: segmented.segments.clone(),
        }
    }
}

/// Save a transcript with its full cue list.
pub fn save_transcript(transcript: &Transcript, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&TranscriptDocument::from(transcript))?;
    write_atomic(path, json.as_bytes())?;
    debug!("Saved {} cues to {}", transcript.cues().len(), path.display());
    Ok(())
}

/// Save a segment list with the metadata of the track it came from.
pub fn save_segments(segmented: &SegmentedTranscript, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&SegmentsDocument::from(segmented))?;
    write_atomic(path, json.as_bytes())?;
    debug!("Saved {} segments to {}", segmented.segments.len(), path.display());
    Ok(())
}

/// Load a transcript saved with [`save_transcript`].
pub fn load_transcript(path: &Path) -> Result<Transcript> {
    let content = std::fs::read_to_string(path)?;
    let doc: TranscriptDocument = serde_json::from_str(&content)?;
    Ok(doc.into())
}

/// Load a segment document saved with [`save_segments`].
pub fn load_segments(path: &Path) -> Result<SegmentsDocument> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Path of the plain-text file written next to a JSON export.
pub fn text_sidecar_path(path: &Path) -> PathBuf {
    path.with_extension("txt")
}

/// Write a file in full or not at all.
///
/// A replaced file keeps its permissions; a new one gets the usual `0o644`
/// on Unix rather than the private mode of the temporary file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_failure = |source: std::io::Error| TubescriptError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_failure)?;
    file.write_all(contents).map_err(write_failure)?;
    file.as_file().sync_all().map_err(write_failure)?;

    let permissions = match std::fs::metadata(path) {
        Ok(existing) => Some(existing.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .map_err(write_failure)?;
    }

    file.persist(path).map_err(|e| write_failure(e.error))?;

    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    None
}
