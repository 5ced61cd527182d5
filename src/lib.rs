//! Tubescript - YouTube transcripts for people and agents
//!
//! Fetches the caption tracks of a YouTube video, resolves the requested
//! language (optionally through machine translation), and returns the cues as
//! plain text, timestamped lines, or fixed-length time windows.
//!
//! # Architecture
//!
//! - `source` - Video references and the upstream caption contract (YouTube)
//! - `transcript` - Language resolution, cue normalization, rendering, segmentation
//! - `engine` - The request pipeline shared by every front end
//! - `persist` - Atomic JSON export and import
//! - `search` - YouTube Data API video search
//! - `mcp` - Tool server for AI agents
//! - `cli` - Command-line front end and HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubescript::config::Settings;
//! use tubescript::engine::TranscriptEngine;
//! use tubescript::source::YoutubeCaptionSource;
//! use tubescript::transcript::render_text;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let source = Arc::new(YoutubeCaptionSource::with_config(&settings.youtube)?);
//!     let engine = TranscriptEngine::new(source, settings.transcript);
//!
//!     let transcript = engine.get_transcript("dQw4w9WgXcQ", "en", true).await?;
//!     println!("{}", render_text(transcript.cues(), true));
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod mcp;
pub mod persist;
pub mod search;
pub mod source;
pub mod transcript;

pub use error::{Result, TubescriptError};
