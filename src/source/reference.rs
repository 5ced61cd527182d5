//! Video reference parsing.

use crate::error::{Result, TubescriptError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("Invalid regex"));

// Matches the YouTube URL shapes we accept and captures the 11-character ID
static URL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        (?:https?:)?(?://)?
        (?:[0-9a-z-]+\.)?
        (?:youtu\.be/|youtube(?:-nocookie)?\.com\S*?[^\w\s-])
        (?:watch\?v=|embed/|v/|shorts/|live/)?
        ([a-zA-Z0-9_-]{11})
    ",
    )
    .expect("Invalid regex")
});

/// Canonical YouTube video ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Resolve a raw URL or bare ID into a canonical video ID.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if BARE_ID.is_match(input) {
            return Ok(Self(input.to_string()));
        }

        URL_ID
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| TubescriptError::InvalidVideoReference(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page URL.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for VideoId {
    type Err = TubescriptError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
