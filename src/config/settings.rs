//! Configuration settings for Tubescript.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when no YouTube Data API key is configured.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcript: TranscriptSettings,
    pub youtube: YoutubeSettings,
    pub search: SearchSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Defaults for transcript requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Caption language requested when the caller names none.
    pub default_language: String,
    /// Fall back to a translated track when the language is missing.
    pub translate: bool,
    /// Window size in seconds for segmented transcripts.
    pub segment_length: i64,
    /// Maximum characters of transcript text returned to agents.
    pub agent_text_limit: usize,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            default_language: "ja".to_string(),
            translate: false,
            segment_length: 30,
            agent_text_limit: 1000,
        }
    }
}

/// YouTube access settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct YoutubeSettings {
    /// YouTube Data API key (only needed for search).
    pub api_key: Option<String>,
    /// Timeout for each HTTP request in seconds.
    pub request_timeout_seconds: u64,
    /// User agent sent to YouTube.
    pub user_agent: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            request_timeout_seconds: 30,
            user_agent: concat!("tubescript/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Video search defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// Results per page (1-50).
    pub max_results: u32,
    /// Result ordering (date, rating, relevance, title, viewCount).
    pub order: String,
    /// Caption filter (closedCaption, none, any).
    pub caption_filter: String,
    /// ISO 3166-1 alpha-2 region to bias results towards.
    pub region_code: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 5,
            order: "relevance".to_string(),
            caption_filter: "closedCaption".to_string(),
            region_code: None,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// A missing file yields defaults. `YOUTUBE_API_KEY` fills in an unset key.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        if settings.youtube.api_key.as_deref().map_or(true, str::is_empty) {
            settings.youtube.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no request could succeed with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.transcript.segment_length <= 0 {
            return Err(crate::error::TubescriptError::Config(format!(
                "transcript.segment_length must be positive, got {}",
                self.transcript.segment_length
            )));
        }
        if !(1..=50).contains(&self.search.max_results) {
            return Err(crate::error::TubescriptError::Config(format!(
                "search.max_results must be between 1 and 50, got {}",
                self.search.max_results
            )));
        }
        Ok(())
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TubescriptError::Config(e.to_string()))?;
        crate::persist::write_atomic(path, content.as_bytes())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubescript")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
