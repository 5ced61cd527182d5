//! CLI command implementations.

mod config;
mod mcp;
mod search;
mod serve;
mod tracks;
mod transcript;

pub use config::run_config;
pub use mcp::run_mcp;
pub use search::{run_search, SearchOptions};
pub use serve::run_serve;
pub use tracks::run_tracks;
pub use transcript::{run_transcript, TranscriptOptions};
