//! MCP server implementation.

use super::protocol::*;
use super::tools::{
    get_tools, parse_tool_call, SearchSummary, SegmentsSummary, ToolCall, TranscriptSummary,
};
use crate::config::{SearchSettings, Settings};
use crate::engine::TranscriptEngine;
use crate::error::TubescriptError;
use crate::search::{SearchRequest, VideoSearch, YoutubeSearchClient};
use crate::source::YoutubeCaptionSource;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "tubescript";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Tubescript.
pub struct McpServer {
    engine: TranscriptEngine,
    search: Option<Arc<dyn VideoSearch>>,
    search_settings: SearchSettings,
}

impl McpServer {
    /// Create a server over an engine and an optional search backend.
    pub fn new(
        engine: TranscriptEngine,
        search: Option<Arc<dyn VideoSearch>>,
        search_settings: SearchSettings,
    ) -> Self {
        Self {
            engine,
            search,
            search_settings,
        }
    }

    /// Create a server talking to YouTube. Search is disabled without an API key.
    pub fn from_settings(settings: &Settings) -> crate::error::Result<Self> {
        let source = Arc::new(YoutubeCaptionSource::with_config(&settings.youtube)?);
        let engine = TranscriptEngine::new(source, settings.transcript.clone());

        let search: Option<Arc<dyn VideoSearch>> =
            match YoutubeSearchClient::with_config(&settings.youtube) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!("search_videos disabled: {}", e);
                    None
                }
            };

        Ok(Self::new(engine, search, settings.search.clone()))
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        // stdout carries JSON-RPC only
        eprintln!("Tubescript MCP server starting...");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    eprintln!("Failed to parse request: {}", e);
                    Some(JsonRpcResponse::error(None, codes::PARSE_ERROR, "Parse error"))
                }
            };

            if let Some(response) = response {
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications get no response.
    pub(crate) async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("MCP request: {}", request.method);

        if request.method.starts_with("notifications/") || request.method == "initialized" {
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                codes::METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        respond(id, &result)
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: get_tools(self.engine.settings()),
        };
        respond(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        codes::INVALID_PARAMS,
                        &format!("Invalid params: {}", e),
                    )
                }
            },
            None => return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing params"),
        };

        let result = match parse_tool_call(
            &params.name,
            params.arguments.as_ref(),
            self.engine.settings(),
        ) {
            Ok(call) => self.call_tool(call).await,
            Err(e) => ToolCallResult::from_error(&e),
        };

        respond(id, &result)
    }

    async fn call_tool(&self, call: ToolCall) -> ToolCallResult {
        match call {
            ToolCall::GetTranscript {
                url,
                language,
                translate,
            } => match self.engine.get_transcript(&url, &language, translate).await {
                Ok(transcript) => ToolCallResult::json(&TranscriptSummary::new(
                    &transcript,
                    self.engine.settings().agent_text_limit,
                )),
                Err(e) => ToolCallResult::from_error(&e),
            },
            ToolCall::GetTranscriptBySegments {
                url,
                language,
                segment_length,
                translate,
            } => match self
                .engine
                .get_transcript_by_segments(&url, &language, segment_length, translate)
                .await
            {
                Ok(segmented) => ToolCallResult::json(&SegmentsSummary::new(&segmented)),
                Err(e) => ToolCallResult::from_error(&e),
            },
            ToolCall::SearchVideos(request) => self.search_videos(request).await,
        }
    }

    async fn search_videos(&self, request: SearchRequest) -> ToolCallResult {
        let Some(search) = &self.search else {
            return ToolCallResult::from_error(&TubescriptError::Config(format!(
                "Search needs a YouTube Data API key ({})",
                crate::config::API_KEY_ENV
            )));
        };

        let query = match request.into_query(&self.search_settings) {
            Ok(q) => q,
            Err(e) => return ToolCallResult::from_error(&e),
        };

        match search.search(&query).await {
            Ok(page) => ToolCallResult::json(&SearchSummary {
                total_results: page.videos.len(),
                videos: &page.videos,
                next_page_token: page.next_page_token.as_deref(),
            }),
            Err(e) => ToolCallResult::from_error(&e),
        }
    }
}

fn respond<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, codes::INTERNAL_ERROR, &format!("Internal error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranscriptSettings;
    use crate::search::{SearchPage, SearchQuery, VideoSummary};
    use crate::source::{MemoryCaptionSource, RawCue, TrackInfo};
    use async_trait::async_trait;

    const VIDEO: &str = "dQw4w9WgXcQ";

    struct FixedSearch;

    #[async_trait]
    impl VideoSearch for FixedSearch {
        async fn search(&self, query: &SearchQuery) -> crate::error::Result<SearchPage> {
            Ok(SearchPage {
                videos: vec![VideoSummary {
                    id: VIDEO.to_string(),
                    title: query.query.clone(),
                    description: String::new(),
                    published_at: None,
                    channel_id: "UC1".to_string(),
                    channel_title: "Channel".to_string(),
                    thumbnail_url: None,
                    video_url: format!("https://www.youtube.com/watch?v={}", VIDEO),
                }],
                next_page_token: Some(format!("after-{}", query.max_results)),
            })
        }
    }

    fn server(search: Option<Arc<dyn VideoSearch>>) -> McpServer {
        let source = MemoryCaptionSource::new().with_track(
            VIDEO,
            TrackInfo::native("en"),
            vec![
                RawCue::new(0.0, 2.0, "Hello"),
                RawCue::new(2.0, 3.0, "world"),
                RawCue::new(10.0, 1.0, "End"),
            ],
        );
        let engine = TranscriptEngine::new(Arc::new(source), TranscriptSettings::default());
        McpServer::new(engine, search, SearchSettings::default())
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    async fn call(server: &McpServer, name: &str, arguments: Value) -> Value {
        let params = json!({ "name": name, "arguments": arguments });
        let response = server
            .handle_request(request("tools/call", Some(params)))
            .await
            .unwrap();
        serde_json::to_value(response).unwrap()["result"].clone()
    }

    fn text_of(result: &Value) -> &str {
        result["content"][0]["text"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_initialize_and_list() {
        let server = server(None);

        let init = server.handle_request(request("initialize", None)).await.unwrap();
        let init = serde_json::to_value(init).unwrap();
        assert_eq!(init["result"]["serverInfo"]["name"], "tubescript");

        let list = server.handle_request(request("tools/list", None)).await.unwrap();
        let list = serde_json::to_value(list).unwrap();
        assert_eq!(list["result"]["tools"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = server(None);
        let mut note = request("notifications/initialized", None);
        note.id = None;
        assert!(server.handle_request(note).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server(None)
            .handle_request(request("resources/list", None))
            .await
            .unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["error"]["code"], codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_transcript_tool() {
        let server = server(None);
        let result = call(&server, "get_transcript", json!({ "url": VIDEO, "language": "en" })).await;

        assert!(result.get("isError").is_none());
        let summary: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(summary["total_lines"], 3);
        assert_eq!(summary["sample_lines"][0]["text"], "Hello");
        assert_eq!(summary["text_content"], "Hello world End");
    }

    #[tokio::test]
    async fn test_segments_tool() {
        let server = server(None);
        let result = call(
            &server,
            "get_transcript_by_segments",
            json!({ "url": VIDEO, "language": "en", "segment_length": 5 }),
        )
        .await;

        let summary: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(summary["total_segments"], 3);
        assert_eq!(summary["sample_segments"][1]["cue_count"], 0);
    }

    #[tokio::test]
    async fn test_tool_errors_are_results() {
        let server = server(None);

        let result = call(&server, "get_transcript", json!({ "url": VIDEO, "language": "fr" })).await;
        assert_eq!(result["isError"], true);
        assert!(text_of(&result).starts_with("language_unavailable: "));

        let result = call(
            &server,
            "get_transcript_by_segments",
            json!({ "url": VIDEO, "language": "en", "segment_length": -1 }),
        )
        .await;
        assert!(text_of(&result).starts_with("invalid_segment_length: "));

        let result = call(&server, "search_videos", json!({ "query": "rust" })).await;
        assert!(text_of(&result).starts_with("config: "));
    }

    #[tokio::test]
    async fn test_search_tool() {
        let server = server(Some(Arc::new(FixedSearch)));
        let result = call(
            &server,
            "search_videos",
            json!({ "query": "rust", "max_results": 7, "page_token": "abc" }),
        )
        .await;

        let summary: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(summary["total_results"], 1);
        assert_eq!(summary["videos"][0]["title"], "rust");
        assert_eq!(summary["next_page_token"], "after-7");
    }

    #[tokio::test]
    async fn test_search_tool_rejects_reversed_dates() {
        let server = server(Some(Arc::new(FixedSearch)));
        let result = call(
            &server,
            "search_videos",
            json!({ "query": "rust", "published_after": "2024-02-01", "published_before": "2024-01-01" }),
        )
        .await;

        assert_eq!(result["isError"], true);
        assert!(text_of(&result).starts_with("invalid_input: "));
    }
}
