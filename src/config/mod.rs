//! Configuration module for Tubescript.
//!
//! Settings are loaded once at startup and passed by value or reference into
//! the engine and the command handlers; nothing reads them globally.

mod settings;

pub use settings::{
    GeneralSettings, SearchSettings, Settings, TranscriptSettings, YoutubeSettings, API_KEY_ENV,
};
