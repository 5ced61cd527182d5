//! Plain and timestamped text rendering.

use super::{Cue, Segment};

/// Format seconds as `M:SS`, or `H:MM:SS` once past the hour.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Render cues as a single string.
///
/// Plain mode joins the cue texts with single spaces. Timestamped mode puts
/// each cue on its own `[start] text` line. Line breaks and runs of
/// whitespace inside a cue collapse to one space, so a cue never spans
/// lines. Cues whose text is blank are left out of the plain join but still
/// get a timestamped line.
pub fn render_text(cues: &[Cue], include_timestamps: bool) -> String {
    render(
        cues.iter().map(|c| (c.start_seconds, c.text.as_str())),
        include_timestamps,
    )
}

/// Render segments the same way as cues, keyed by window start.
pub fn render_segments(segments: &[Segment], include_timestamps: bool) -> String {
    render(
        segments.iter().map(|s| (s.window_start, s.text.as_str())),
        include_timestamps,
    )
}

fn render<'a>(items: impl Iterator<Item = (f64, &'a str)>, include_timestamps: bool) -> String {
    if include_timestamps {
        items
            .map(|(start, text)| format!("[{}] {}", format_timestamp(start), collapse_whitespace(text)))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        join_cue_texts(items.map(|(_, text)| text))
    }
}

/// Text of one cue on a single line: inner whitespace runs become one space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join cue texts with single spaces, skipping blanks.
pub(crate) fn join_cue_texts<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cues() -> Vec<Cue> {
        vec![
            Cue::new(0.0, 2.0, " Hello "),
            Cue::new(2.0, 3.0, "world\n"),
            Cue::new(65.4, 1.0, "again"),
        ]
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "0:00");
        assert_eq!(format_timestamp(5.9), "0:05");
        assert_eq!(format_timestamp(65.0), "1:05");
        assert_eq!(format_timestamp(600.0), "10:00");
        assert_eq!(format_timestamp(3600.0), "1:00:00");
        assert_eq!(format_timestamp(3725.0), "1:02:05");
    }

    #[test]
    fn test_render_plain() {
        assert_eq!(render_text(&sample_cues(), false), "Hello world again");
    }

    #[test]
    fn test_render_timestamped() {
        assert_eq!(
            render_text(&sample_cues(), true),
            "[0:00] Hello\n[0:02] world\n[1:05] again"
        );
    }

    #[test]
    fn test_render_past_the_hour() {
        let cues = vec![Cue::new(3725.0, 1.0, "hi")];
        assert_eq!(render_text(&cues, true), "[1:02:05] hi");
    }

    #[test]
    fn test_multi_line_cue_stays_on_one_line() {
        let cues = vec![
            Cue::new(0.0, 1.0, "first line\nsecond  line"),
            Cue::new(2.0, 1.0, "next"),
        ];

        let timestamped = render_text(&cues, true);
        assert_eq!(timestamped, "[0:00] first line second line\n[0:02] next");
        assert_eq!(timestamped.lines().count(), cues.len());

        assert_eq!(render_text(&cues, false), "first line second line next");
    }

    #[test]
    fn test_blank_cue_skipped_in_plain_join() {
        let cues = vec![
            Cue::new(0.0, 1.0, "a"),
            Cue::new(1.0, 1.0, "  \n "),
            Cue::new(2.0, 1.0, "b"),
        ];

        assert_eq!(render_text(&cues, false), "a b");
        assert_eq!(render_text(&cues, true), "[0:00] a\n[0:01] \n[0:02] b");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_text(&[], false), "");
        assert_eq!(render_text(&[], true), "");
    }

    #[test]
    fn test_render_segments() {
        let segments = vec![
            Segment { window_start: 0.0, window_end: 5.0, text: "Hello world".to_string(), cue_count: 2 },
            Segment { window_start: 5.0, window_end: 10.0, text: String::new(), cue_count: 0 },
        ];
        assert_eq!(render_segments(&segments, true), "[0:00] Hello world\n[0:05] ");
        assert_eq!(render_segments(&segments, false), "Hello world");
    }
}
