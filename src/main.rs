//! Tubescript CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubescript::cli::commands::{self, SearchOptions, TranscriptOptions};
use tubescript::cli::{Cli, Commands};
use tubescript::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stderr keeps stdout clean for transcripts and MCP responses
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tubescript={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match cli.command {
        Commands::Transcript {
            input,
            language,
            translate,
            timestamps,
            segment,
            output,
        } => {
            let options = TranscriptOptions {
                input,
                language,
                translate,
                timestamps,
                segment,
                output,
            };
            commands::run_transcript(options, settings).await?;
        }

        Commands::Tracks { input } => {
            commands::run_tracks(&input, settings).await?;
        }

        Commands::Search {
            query,
            max_results,
            order,
            region,
            caption,
            video_type,
            after,
            before,
            next_page,
        } => {
            let options = SearchOptions {
                query,
                max_results,
                order,
                region,
                caption,
                video_type,
                after,
                before,
                next_page,
            };
            commands::run_search(options, settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(&host, port, settings).await?;
        }

        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
