//! Error types for Tubescript.

use std::path::PathBuf;
use thiserror::Error;

/// Why a call to the upstream captioning service failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// The video does not exist or is not playable.
    NotFound,
    /// The request was refused (sign-in or bot check).
    Blocked,
    /// Too many requests, or a quota was exhausted.
    RateLimited,
    /// Transport-level failure.
    Network,
    /// The service answered with something we could not decode.
    InvalidResponse,
}

impl std::fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailureKind::NotFound => write!(f, "not found"),
            FetchFailureKind::Blocked => write!(f, "blocked"),
            FetchFailureKind::RateLimited => write!(f, "rate limited"),
            FetchFailureKind::Network => write!(f, "network"),
            FetchFailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

/// Library-level error type for Tubescript operations.
#[derive(Error, Debug)]
pub enum TubescriptError {
    #[error("Invalid YouTube URL or video ID: {0}")]
    InvalidVideoReference(String),

    #[error("No captions are available for video {video_id}")]
    NoCaptionsAvailable { video_id: String },

    #[error("No captions in language '{requested}' (available: {})", .available.join(", "))]
    LanguageUnavailable {
        requested: String,
        available: Vec<String>,
    },

    #[error("Segment length must be a positive number of seconds, got {0}")]
    InvalidSegmentLength(i64),

    #[error("Caption fetch failed ({kind}): {message}")]
    UpstreamFetchFailure {
        kind: FetchFailureKind,
        message: String,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl TubescriptError {
    /// Shorthand for an upstream failure.
    pub fn upstream(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        TubescriptError::UpstreamFetchFailure {
            kind,
            message: message.into(),
        }
    }

    /// Stable, machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TubescriptError::InvalidVideoReference(_) => "invalid_video_reference",
            TubescriptError::NoCaptionsAvailable { .. } => "no_captions_available",
            TubescriptError::LanguageUnavailable { .. } => "language_unavailable",
            TubescriptError::InvalidSegmentLength(_) => "invalid_segment_length",
            TubescriptError::UpstreamFetchFailure { .. } => "upstream_fetch_failure",
            TubescriptError::WriteFailure { .. } => "write_failure",
            TubescriptError::Config(_) => "config",
            TubescriptError::Search(_) => "search",
            TubescriptError::InvalidInput(_) => "invalid_input",
            TubescriptError::Io(_) => "io",
            TubescriptError::Json(_) => "json",
            TubescriptError::TomlParse(_) => "toml",
        }
    }
}

impl From<reqwest::Error> for TubescriptError {
    fn from(e: reqwest::Error) -> Self {
        // Status codes are classified where the response is checked
        let kind = if e.is_decode() {
            FetchFailureKind::InvalidResponse
        } else {
            FetchFailureKind::Network
        };
        TubescriptError::upstream(kind, e.to_string())
    }
}

/// Result type alias for Tubescript operations.
pub type Result<T> = std::result::Result<T, TubescriptError>;
