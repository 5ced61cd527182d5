//! CLI module for Tubescript.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tubescript - YouTube transcripts for people and agents
///
/// Fetch caption tracks of YouTube videos, pick or translate the language you
/// want, and get the text whole or in fixed-length time windows.
#[derive(Parser, Debug)]
#[command(name = "tubescript")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the transcript of a video
    Transcript {
        /// YouTube URL or 11-character video ID
        input: String,

        /// Caption language code (defaults to transcript.default_language)
        #[arg(short, long)]
        language: Option<String>,

        /// Machine-translate from another track if the language is missing
        #[arg(short, long)]
        translate: bool,

        /// Prefix each line with its start time
        #[arg(short = 's', long)]
        timestamps: bool,

        /// Group cues into windows of this many seconds
        #[arg(long, allow_negative_numbers = true)]
        segment: Option<i64>,

        /// Save JSON to this file (plus a .txt next to it) instead of printing
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the caption tracks of a video
    Tracks {
        /// YouTube URL or 11-character video ID
        input: String,
    },

    /// Search YouTube for videos with captions
    Search {
        /// Search keywords (prompted for when omitted)
        query: Option<String>,

        /// Results per page (1-50)
        #[arg(short = 'n', long)]
        max_results: Option<u32>,

        /// Ordering: date, rating, relevance, title, viewCount
        #[arg(long)]
        order: Option<String>,

        /// ISO 3166-1 alpha-2 region code
        #[arg(long)]
        region: Option<String>,

        /// Caption filter: closedCaption, none, any
        #[arg(long)]
        caption: Option<String>,

        /// Video type: any, movie, episode
        #[arg(long)]
        video_type: Option<String>,

        /// Only videos published on or after this date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        after: Option<String>,

        /// Only videos published before this date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        before: Option<String>,

        /// Page token printed by a previous search
        #[arg(long)]
        next_page: Option<String>,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Start MCP server for AI assistant integration
    Mcp,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript_command() {
        let cli = Cli::parse_from([
            "tubescript",
            "-vv",
            "transcript",
            "https://youtu.be/dQw4w9WgXcQ",
            "-l",
            "en",
            "--translate",
            "--segment",
            "30",
        ]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Transcript {
                input,
                language,
                translate,
                timestamps,
                segment,
                output,
            } => {
                assert_eq!(input, "https://youtu.be/dQw4w9WgXcQ");
                assert_eq!(language.as_deref(), Some("en"));
                assert!(translate);
                assert!(!timestamps);
                assert_eq!(segment, Some(30));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_without_query() {
        let cli = Cli::parse_from(["tubescript", "search", "-n", "10", "--next-page", "CAoQAA"]);
        match cli.command {
            Commands::Search {
                query,
                max_results,
                next_page,
                ..
            } => {
                assert!(query.is_none());
                assert_eq!(max_results, Some(10));
                assert_eq!(next_page.as_deref(), Some("CAoQAA"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_filters() {
        let cli = Cli::parse_from([
            "tubescript",
            "search",
            "rust async",
            "--video-type",
            "episode",
            "--after",
            "2024-01-01",
            "--before",
            "2024-07-01",
        ]);
        match cli.command {
            Commands::Search {
                video_type,
                after,
                before,
                ..
            } => {
                assert_eq!(video_type.as_deref(), Some("episode"));
                assert_eq!(after.as_deref(), Some("2024-01-01"));
                assert_eq!(before.as_deref(), Some("2024-07-01"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
