//! MCP tool definitions and argument parsing.

use super::protocol::Tool;
use crate::config::TranscriptSettings;
use crate::error::{Result, TubescriptError};
use crate::search::{SearchRequest, VideoSummary};
use crate::transcript::{render_text, Cue, Segment, SegmentedTranscript, Transcript};
use serde::Serialize;
use serde_json::{json, Value};

const SAMPLE_CUES: usize = 5;
const SAMPLE_SEGMENTS: usize = 3;
const TRUNCATION_MARKER: &str = "...(truncated)";

/// A parsed, typed tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    GetTranscript {
        url: String,
        language: String,
        translate: bool,
    },
    GetTranscriptBySegments {
        url: String,
        language: String,
        segment_length: i64,
        translate: bool,
    },
    SearchVideos(SearchRequest),
}

/// Get all available tools.
pub fn get_tools(defaults: &TranscriptSettings) -> Vec<Tool> {
    vec![
        Tool {
            name: "get_transcript".to_string(),
            description: "Fetch the captions of a YouTube video. Returns the cue count, \
                the first few cues with timestamps, and the transcript text. \
                Set translate=true to machine-translate when the language has no captions."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "YouTube URL or 11-character video ID"
                    },
                    "language": {
                        "type": "string",
                        "description": "Caption language code",
                        "default": defaults.default_language
                    },
                    "translate": {
                        "type": "boolean",
                        "description": "Translate from another track if the language is missing",
                        "default": defaults.translate
                    }
                },
                "required": ["url"]
            }),
        },
        Tool {
            name: "get_transcript_by_segments".to_string(),
            description: "Fetch the captions of a YouTube video grouped into fixed-length \
                time windows. Useful for summarizing a video section by section."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "YouTube URL or 11-character video ID"
                    },
                    "language": {
                        "type": "string",
                        "description": "Caption language code",
                        "default": defaults.default_language
                    },
                    "segment_length": {
                        "type": "integer",
                        "description": "Window length in seconds",
                        "default": defaults.segment_length
                    },
                    "translate": {
                        "type": "boolean",
                        "description": "Translate from another track if the language is missing",
                        "default": defaults.translate
                    }
                },
                "required": ["url"]
            }),
        },
        Tool {
            name: "search_videos".to_string(),
            description: "Search YouTube for videos with captions. Returns one page of \
                results and a token for the next page."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search keywords"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Results per page (1-50)"
                    },
                    "page_token": {
                        "type": "string",
                        "description": "next_page_token from a previous search"
                    },
                    "video_type": {
                        "type": "string",
                        "enum": ["any", "movie", "episode"],
                        "description": "Restrict to a video type"
                    },
                    "published_after": {
                        "type": "string",
                        "description": "Only videos published at or after this date (YYYY-MM-DD or RFC 3339)"
                    },
                    "published_before": {
                        "type": "string",
                        "description": "Only videos published before this date (YYYY-MM-DD or RFC 3339)"
                    }
                },
                "required": ["query"]
            }),
        },
    ]
}

/// Parse a `tools/call` request into a typed call, filling in defaults.
pub fn parse_tool_call(
    name: &str,
    arguments: Option<&Value>,
    defaults: &TranscriptSettings,
) -> Result<ToolCall> {
    let empty = Value::Object(Default::default());
    let args = arguments.unwrap_or(&empty);

    let required_str = |key: &str| -> Result<String> {
        args.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| TubescriptError::InvalidInput(format!("Missing '{}' argument", key)))
    };
    let language = || {
        args.get("language")
            .and_then(Value::as_str)
            .unwrap_or(&defaults.default_language)
            .to_string()
    };
    let translate = || {
        args.get("translate")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.translate)
    };

    match name {
        "get_transcript" => Ok(ToolCall::GetTranscript {
            url: required_str("url")?,
            language: language(),
            translate: translate(),
        }),
        "get_transcript_by_segments" => {
            let segment_length = match args.get("segment_length") {
                None | Some(Value::Null) => defaults.segment_length,
                Some(v) => v.as_i64().ok_or_else(|| {
                    TubescriptError::InvalidInput(format!(
                        "'segment_length' must be an integer, got {}",
                        v
                    ))
                })?,
            };
            Ok(ToolCall::GetTranscriptBySegments {
                url: required_str("url")?,
                language: language(),
                segment_length,
                translate: translate(),
            })
        }
        "search_videos" => {
            let request: SearchRequest = serde_json::from_value(args.clone()).map_err(|e| {
                TubescriptError::InvalidInput(format!("Bad search_videos arguments: {}", e))
            })?;
            Ok(ToolCall::SearchVideos(request))
        }
        _ => Err(TubescriptError::InvalidInput(format!("Unknown tool: {}", name))),
    }
}

/// What an agent sees for a transcript.
#[derive(Debug, Serialize)]
pub struct TranscriptSummary<'a> {
    pub video_id: &'a str,
    pub language: &'a str,
    pub is_translated: bool,
    pub total_lines: usize,
    pub sample_lines: &'a [Cue],
    pub text_content: String,
}

impl<'a> TranscriptSummary<'a> {
    pub fn new(transcript: &'a Transcript, text_limit: usize) -> Self {
        let cues = transcript.cues();
        Self {
            video_id: &transcript.video_id,
            language: transcript.language(),
            is_translated: transcript.is_translated(),
            total_lines: cues.len(),
            sample_lines: &cues[..cues.len().min(SAMPLE_CUES)],
            text_content: truncate_chars(&render_text(cues, false), text_limit),
        }
    }
}

/// What an agent sees for a segmented transcript.
#[derive(Debug, Serialize)]
pub struct SegmentsSummary<'a> {
    pub video_id: &'a str,
    pub language: &'a str,
    pub is_translated: bool,
    pub segment_length: i64,
    pub total_segments: usize,
    pub sample_segments: &'a [Segment],
}

impl<'a> SegmentsSummary<'a> {
    pub fn new(segmented: &'a SegmentedTranscript) -> Self {
        let segments = &segmented.segments;
        Self {
            video_id: &segmented.video_id,
            language: &segmented.language,
            is_translated: segmented.is_translated,
            segment_length: segmented.segment_length,
            total_segments: segments.len(),
            sample_segments: &segments[..segments.len().min(SAMPLE_SEGMENTS)],
        }
    }
}

/// What an agent sees for a search page.
#[derive(Debug, Serialize)]
pub struct SearchSummary<'a> {
    pub total_results: usize,
    pub videos: &'a [VideoSummary],
    pub next_page_token: Option<&'a str>,
}

/// Cut `text` to `limit` characters, marking the cut.
fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}
