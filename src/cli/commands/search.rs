//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::search::{SearchQuery, VideoSearch, YoutubeSearchClient};
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Options for the search command.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: Option<String>,
    pub max_results: Option<u32>,
    pub order: Option<String>,
    pub region: Option<String>,
    pub caption: Option<String>,
    pub video_type: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub next_page: Option<String>,
}

/// Run the search command.
pub async fn run_search(options: SearchOptions, settings: Settings) -> Result<()> {
    let client = match YoutubeSearchClient::with_config(&settings.youtube) {
        Ok(c) => c,
        Err(e) => {
            Output::error(&e.to_string());
            return Err(e.into());
        }
    };

    let text = match options.query.clone() {
        Some(q) => q,
        None => prompt("Search keywords: ")?,
    };
    if text.trim().is_empty() {
        anyhow::bail!("Search keywords must not be empty");
    }

    let query = build_query(text.trim(), &options, &settings)?;

    let spinner = Output::spinner("Searching...");
    let result = client.search(&query).await;
    spinner.finish_and_clear();

    let page = match result {
        Ok(page) => page,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if page.videos.is_empty() {
        Output::warning("No videos found matching your query.");
        return Ok(());
    }

    Output::success(&format!("Found {} videos", page.videos.len()));
    for (i, video) in page.videos.iter().enumerate() {
        Output::video_result(i + 1, video);
    }

    if let Some(token) = &page.next_page_token {
        println!();
        Output::info(&format!("More results: --next-page {}", token));
    }

    Ok(())
}

/// Combine command-line overrides with configured search defaults.
fn build_query(text: &str, options: &SearchOptions, settings: &Settings) -> Result<SearchQuery> {
    let mut query = SearchQuery::from_settings(text, &settings.search)?.with_filters(
        options.video_type.as_deref(),
        options.after.as_deref(),
        options.before.as_deref(),
    )?;

    if let Some(n) = options.max_results {
        query.max_results = n.clamp(1, 50);
    }
    if let Some(order) = &options.order {
        query.order = order.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(caption) = &options.caption {
        query.caption_filter = caption.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(region) = &options.region {
        query.region_code = Some(region.to_uppercase());
    }
    query.page_token = options.next_page.clone();

    Ok(query)
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
