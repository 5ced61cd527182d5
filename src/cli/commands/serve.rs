//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for transcripts, segmented transcripts, and search.

use crate::cli::Output;
use crate::config::{SearchSettings, Settings};
use crate::engine::TranscriptEngine;
use crate::error::TubescriptError;
use crate::search::{SearchPage, SearchRequest, VideoSearch, YoutubeSearchClient};
use crate::source::YoutubeCaptionSource;
use crate::transcript::{render_text, Cue, Segment};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    engine: TranscriptEngine,
    search: Option<Arc<dyn VideoSearch>>,
    search_settings: SearchSettings,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let source = Arc::new(YoutubeCaptionSource::with_config(&settings.youtube)?);
    let search: Option<Arc<dyn VideoSearch>> =
        match YoutubeSearchClient::with_config(&settings.youtube) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                Output::warning(&format!("Search disabled: {}", e));
                None
            }
        };

    let state = Arc::new(AppState {
        engine: TranscriptEngine::new(source, settings.transcript.clone()),
        search,
        search_settings: settings.search.clone(),
    });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Tubescript API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Transcript", "POST /transcript");
    Output::kv("Segments", "POST /segments");
    Output::kv("Search", "POST /search");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/transcript", post(transcript))
        .route("/segments", post(segments))
        .route("/search", post(search))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct TranscriptRequest {
    /// YouTube URL or video ID
    url: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    translate: Option<bool>,
}

#[derive(Serialize)]
struct TranscriptResponse {
    video_id: String,
    language: String,
    is_translated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_language: Option<String>,
    text: String,
    cues: Vec<Cue>,
}

#[derive(Deserialize)]
struct SegmentsRequest {
    url: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segment_length: Option<i64>,
    #[serde(default)]
    translate: Option<bool>,
}

#[derive(Serialize)]
struct SegmentsResponse {
    video_id: String,
    language: String,
    is_translated: bool,
    segment_length: i64,
    segments: Vec<Segment>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
}

/// Library error rendered as an HTTP response.
struct ApiError(TubescriptError);

impl From<TubescriptError> for ApiError {
    fn from(e: TubescriptError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status_for(&self.0), Json(body)).into_response()
    }
}

fn status_for(err: &TubescriptError) -> StatusCode {
    match err {
        TubescriptError::InvalidVideoReference(_)
        | TubescriptError::InvalidSegmentLength(_)
        | TubescriptError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TubescriptError::NoCaptionsAvailable { .. }
        | TubescriptError::LanguageUnavailable { .. } => StatusCode::NOT_FOUND,
        TubescriptError::UpstreamFetchFailure { .. } | TubescriptError::Search(_) => {
            StatusCode::BAD_GATEWAY
        }
        TubescriptError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn transcript(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscriptRequest>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let defaults = state.engine.settings();
    let language = req.language.unwrap_or_else(|| defaults.default_language.clone());
    let translate = req.translate.unwrap_or(defaults.translate);

    let transcript = state
        .engine
        .get_transcript(&req.url, &language, translate)
        .await?;

    Ok(Json(TranscriptResponse {
        text: render_text(transcript.cues(), false),
        video_id: transcript.video_id,
        language: transcript.track.language,
        is_translated: transcript.track.is_translated,
        source_language: transcript.track.source_language,
        cues: transcript.track.cues,
    }))
}

async fn segments(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SegmentsRequest>,
) -> Result<Json<SegmentsResponse>, ApiError> {
    let defaults = state.engine.settings();
    let language = req.language.unwrap_or_else(|| defaults.default_language.clone());
    let segment_length = req.segment_length.unwrap_or(defaults.segment_length);
    let translate = req.translate.unwrap_or(defaults.translate);

    let segmented = state
        .engine
        .get_transcript_by_segments(&req.url, &language, segment_length, translate)
        .await?;

    Ok(Json(SegmentsResponse {
        video_id: segmented.video_id,
        language: segmented.language,
        is_translated: segmented.is_translated,
        segment_length: segmented.segment_length,
        segments: segmented.segments,
    }))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchPage>, ApiError> {
    let search = state.search.as_ref().ok_or_else(|| {
        TubescriptError::Config(format!(
            "Search needs a YouTube Data API key ({})",
            crate::config::API_KEY_ENV
        ))
    })?;

    let query = req.into_query(&state.search_settings)?;
    Ok(Json(search.search(&query).await?))
}
