//! CLI output formatting utilities.

use crate::search::VideoSummary;
use crate::source::TrackInfo;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        eprintln!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        eprintln!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one caption track.
    pub fn track_info(track: &TrackInfo) {
        let mut flags = Vec::new();
        if track.is_default {
            flags.push("default");
        }
        if track.is_generated {
            flags.push("auto-generated");
        }
        if track.is_translatable {
            flags.push("translatable");
        }

        println!(
            "  {} {} {} {}",
            style("*").cyan(),
            style(format!("{:<8}", track.language_code)).bold(),
            track.name,
            style(format!("({})", flags.join(", "))).dim()
        );
    }

    /// Print one search hit.
    pub fn video_result(index: usize, video: &VideoSummary) {
        let published = video
            .published_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        println!(
            "\n{} {}",
            style(format!("{}.", index)).green(),
            style(&video.title).bold()
        );
        println!("   {} {}", video.channel_title, style(published).dim());
        if !video.description.is_empty() {
            println!("   {}", content_preview(&video.description, 160));
        }
        println!("   {}", style(&video.video_url).dim());
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Flatten and shorten text to at most `max_chars` characters.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("one\ntwo", 20), "one two");
        assert_eq!(content_preview("日本語のテキスト", 3), "日本語...");
    }
}
