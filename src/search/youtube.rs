//! YouTube Data API v3 search client.

use super::{SearchPage, SearchQuery, VideoSearch, VideoSummary};
use crate::config::YoutubeSettings;
use crate::error::{Result, TubescriptError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Search client for the YouTube Data API.
pub struct YoutubeSearchClient {
    client: reqwest::Client,
    api_key: String,
}

impl YoutubeSearchClient {
    /// Create a client from settings. Fails without an API key.
    pub fn with_config(settings: &YoutubeSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                TubescriptError::Config(format!(
                    "No YouTube Data API key. Set youtube.api_key or export {}.",
                    crate::config::API_KEY_ENV
                ))
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| TubescriptError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, api_key })
    }

    fn query_params(&self, query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("part", "id,snippet".to_string()),
            ("type", "video".to_string()),
            ("q", query.query.clone()),
            ("maxResults", query.max_results.clamp(1, 50).to_string()),
            ("order", query.order.as_str().to_string()),
            ("videoCaption", query.caption_filter.as_str().to_string()),
            ("key", self.api_key.clone()),
        ];

        if let Some(video_type) = &query.video_type {
            params.push(("videoType", video_type.clone()));
        }
        if let Some(after) = query.published_after {
            params.push(("publishedAfter", after.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(before) = query.published_before {
            params.push(("publishedBefore", before.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(region) = &query.region_code {
            params.push(("regionCode", region.clone()));
        }
        if let Some(token) = &query.page_token {
            params.push(("pageToken", token.clone()));
        }

        params
    }
}

#[async_trait]
impl VideoSearch for YoutubeSearchClient {
    #[instrument(skip(self, query), fields(q = %query.query))]
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|e| TubescriptError::Search(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TubescriptError::Search(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(TubescriptError::Search(format!(
                "YouTube API error ({}): {}",
                status, message
            )));
        }

        let response: SearchListResponse = serde_json::from_str(&body)
            .map_err(|e| TubescriptError::Search(format!("Failed to parse response: {}", e)))?;

        let page = response.into_page();
        info!("Search '{}' returned {} videos", query.query, page.videos.len());
        if page.next_page_token.is_some() {
            debug!("Next page available");
        }

        Ok(page)
    }
}

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize, Default)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl SearchListResponse {
    fn into_page(self) -> SearchPage {
        let videos = self
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id?;
                let thumbs = item.snippet.thumbnails;
                let thumbnail_url = thumbs
                    .high
                    .or(thumbs.medium)
                    .or(thumbs.default)
                    .map(|t| t.url);

                Some(VideoSummary {
                    video_url: format!("https://www.youtube.com/watch?v={}", id),
                    id,
                    title: item.snippet.title,
                    description: item.snippet.description,
                    published_at: item.snippet.published_at,
                    channel_id: item.snippet.channel_id,
                    channel_title: item.snippet.channel_title,
                    thumbnail_url,
                })
            })
            .collect();

        SearchPage {
            videos,
            next_page_token: self.next_page_token,
        }
    }
}
