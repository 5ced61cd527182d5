//! Video search.
//!
//! A thin client for the YouTube Data API. Results come back one page at a
//! time with an opaque token for the next page.

mod youtube;

pub use youtube::YoutubeSearchClient;

use crate::config::SearchSettings;
use crate::error::{Result, TubescriptError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SearchOrder {
    Date,
    Rating,
    #[default]
    Relevance,
    Title,
    ViewCount,
}

impl SearchOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::Date => "date",
            SearchOrder::Rating => "rating",
            SearchOrder::Relevance => "relevance",
            SearchOrder::Title => "title",
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

impl std::str::FromStr for SearchOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SearchOrder::Date),
            "rating" => Ok(SearchOrder::Rating),
            "relevance" => Ok(SearchOrder::Relevance),
            "title" => Ok(SearchOrder::Title),
            "viewcount" | "view_count" | "views" => Ok(SearchOrder::ViewCount),
            _ => Err(format!(
                "Unknown order: {}. Use date, rating, relevance, title, or viewCount.",
                s
            )),
        }
    }
}

/// Filter on caption availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CaptionFilter {
    /// Only videos with captions.
    #[default]
    ClosedCaption,
    /// Only videos without captions.
    None,
    Any,
}

impl CaptionFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionFilter::ClosedCaption => "closedCaption",
            CaptionFilter::None => "none",
            CaptionFilter::Any => "any",
        }
    }
}

impl std::str::FromStr for CaptionFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "closedcaption" | "captions" => Ok(CaptionFilter::ClosedCaption),
            "none" => Ok(CaptionFilter::None),
            "any" => Ok(CaptionFilter::Any),
            _ => Err(format!(
                "Unknown caption filter: {}. Use closedCaption, none, or any.",
                s
            )),
        }
    }
}

/// A search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    /// Results per page (1-50).
    pub max_results: u32,
    pub order: SearchOrder,
    pub caption_filter: CaptionFilter,
    /// `any`, `movie`, or `episode`.
    pub video_type: Option<String>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub region_code: Option<String>,
    /// Token from a previous page.
    pub page_token: Option<String>,
}

impl SearchQuery {
    /// Create a first-page query with default filters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 5,
            order: SearchOrder::default(),
            caption_filter: CaptionFilter::default(),
            video_type: None,
            published_after: None,
            published_before: None,
            region_code: None,
            page_token: None,
        }
    }

    /// Create a first-page query using configured defaults.
    pub fn from_settings(query: impl Into<String>, settings: &SearchSettings) -> Result<Self> {
        let order = settings.order.parse().map_err(TubescriptError::Config)?;
        let caption_filter = settings.caption_filter.parse().map_err(TubescriptError::Config)?;
        Ok(Self {
            max_results: settings.max_results,
            order,
            caption_filter,
            region_code: settings.region_code.clone(),
            ..Self::new(query)
        })
    }

    /// Set the optional video type and publish-date filters from user input.
    ///
    /// Dates are RFC 3339 timestamps or bare `YYYY-MM-DD` days (midnight UTC).
    pub fn with_filters(
        mut self,
        video_type: Option<&str>,
        published_after: Option<&str>,
        published_before: Option<&str>,
    ) -> Result<Self> {
        if let Some(video_type) = video_type {
            self.video_type = Some(parse_video_type(video_type)?);
        }
        if let Some(after) = published_after {
            self.published_after = Some(parse_published(after)?);
        }
        if let Some(before) = published_before {
            self.published_before = Some(parse_published(before)?);
        }

        if let (Some(after), Some(before)) = (self.published_after, self.published_before) {
            if after >= before {
                return Err(TubescriptError::InvalidInput(format!(
                    "published_after ({}) must be earlier than published_before ({})",
                    after.to_rfc3339(),
                    before.to_rfc3339()
                )));
            }
        }

        Ok(self)
    }
}

/// Search parameters as sent by the MCP and HTTP front ends. Anything left
/// out falls back to the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub page_token: Option<String>,
    #[serde(default)]
    pub video_type: Option<String>,
    #[serde(default)]
    pub published_after: Option<String>,
    #[serde(default)]
    pub published_before: Option<String>,
}

impl SearchRequest {
    pub fn into_query(self, settings: &SearchSettings) -> Result<SearchQuery> {
        let mut query = SearchQuery::from_settings(self.query, settings)?.with_filters(
            self.video_type.as_deref(),
            self.published_after.as_deref(),
            self.published_before.as_deref(),
        )?;
        if let Some(n) = self.max_results {
            query.max_results = n.clamp(1, 50);
        }
        query.page_token = self.page_token;
        Ok(query)
    }
}

fn parse_video_type(s: &str) -> Result<String> {
    match s.to_lowercase().as_str() {
        "any" => Ok("any".to_string()),
        "movie" => Ok("movie".to_string()),
        "episode" => Ok("episode".to_string()),
        _ => Err(TubescriptError::InvalidInput(format!(
            "Unknown video type: {}. Use any, movie, or episode.",
            s
        ))),
    }
}

fn parse_published(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            TubescriptError::InvalidInput(format!(
                "Invalid date '{}'. Use YYYY-MM-DD or an RFC 3339 timestamp.",
                s
            ))
        })
}

/// One video in a result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub channel_id: String,
    pub channel_title: String,
    pub thumbnail_url: Option<String>,
    pub video_url: String,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub videos: Vec<VideoSummary>,
    /// Pass back as `page_token` to fetch the next page.
    pub next_page_token: Option<String>,
}

/// Trait for video search providers.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order() {
        assert_eq!("viewCount".parse::<SearchOrder>().unwrap(), SearchOrder::ViewCount);
        assert_eq!("DATE".parse::<SearchOrder>().unwrap(), SearchOrder::Date);
        assert!("popular".parse::<SearchOrder>().is_err());
    }

    #[test]
    fn test_parse_caption_filter() {
        assert_eq!(
            "closedCaption".parse::<CaptionFilter>().unwrap(),
            CaptionFilter::ClosedCaption
        );
        assert_eq!("any".parse::<CaptionFilter>().unwrap(), CaptionFilter::Any);
        assert!("subtitled".parse::<CaptionFilter>().is_err());
    }

    #[test]
    fn test_query_from_settings() {
        let settings = SearchSettings {
            max_results: 12,
            order: "date".to_string(),
            region_code: Some("JP".to_string()),
            ..SearchSettings::default()
        };

        let query = SearchQuery::from_settings("rust", &settings).unwrap();
        assert_eq!(query.max_results, 12);
        assert_eq!(query.order, SearchOrder::Date);
        assert_eq!(query.caption_filter, CaptionFilter::ClosedCaption);
        assert_eq!(query.region_code.as_deref(), Some("JP"));
        assert!(query.page_token.is_none());

        let bad = SearchSettings {
            order: "hot".to_string(),
            ..SearchSettings::default()
        };
        assert!(SearchQuery::from_settings("rust", &bad).is_err());
    }

    #[test]
    fn test_query_filters() {
        let query = SearchQuery::new("rust")
            .with_filters(Some("Episode"), Some("2024-01-01"), Some("2024-06-30T12:00:00+09:00"))
            .unwrap();

        assert_eq!(query.video_type.as_deref(), Some("episode"));
        assert_eq!(
            query.published_after.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(
            query.published_before.unwrap().to_rfc3339(),
            "2024-06-30T03:00:00+00:00"
        );

        let untouched = SearchQuery::new("rust").with_filters(None, None, None).unwrap();
        assert_eq!(untouched, SearchQuery::new("rust"));
    }

    #[test]
    fn test_query_filters_rejected() {
        let err = SearchQuery::new("rust")
            .with_filters(Some("short"), None, None)
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_input");

        assert!(SearchQuery::new("rust")
            .with_filters(None, Some("last week"), None)
            .is_err());
        assert!(SearchQuery::new("rust")
            .with_filters(None, Some("2024-02-01"), Some("2024-01-01"))
            .is_err());
    }

    #[test]
    fn test_request_into_query() {
        let request: SearchRequest = serde_json::from_value(serde_json::json!({
            "query": "rust",
            "max_results": 0,
            "page_token": "CAoQAA",
            "published_before": "2020-01-01"
        }))
        .unwrap();

        let query = request.into_query(&SearchSettings::default()).unwrap();

        assert_eq!(query.max_results, 1);
        assert_eq!(query.page_token.as_deref(), Some("CAoQAA"));
        assert_eq!(query.published_before.unwrap().to_rfc3339(), "2020-01-01T00:00:00+00:00");
        assert!(query.video_type.is_none());
    }
}
