//! Fixed-window segmentation.
//!
//! Splits a cue list into consecutive `segment_length`-second windows covering
//! `[0, last_cue_end]`. Every window is emitted, including empty ones.

use super::format::join_cue_texts;
use super::{Cue, Segment};
use crate::error::{Result, TubescriptError};

/// Upper bound on windows per transcript. A day of video at one-second
/// windows stays well below it.
pub const MAX_SEGMENT_WINDOWS: usize = 1_000_000;

/// Bucket cues into fixed windows by start time.
///
/// A cue belongs to window `floor(start / segment_length)`. The result has
/// `floor(last_cue_end / segment_length) + 1` windows, or none for an empty
/// cue list. Window text joins the cue texts with single spaces, with inner
/// line breaks collapsed and blank cues left out; `cue_count` still counts
/// every cue.
///
/// Fails with `InvalidInput` when the cue timings would need more than
/// [`MAX_SEGMENT_WINDOWS`] windows.
pub fn segment_cues(cues: &[Cue], segment_length: i64) -> Result<Vec<Segment>> {
    if segment_length <= 0 {
        return Err(TubescriptError::InvalidSegmentLength(segment_length));
    }

    if cues.is_empty() {
        return Ok(Vec::new());
    }

    let length = segment_length as f64;
    let last_cue_end = cues.iter().map(Cue::end_seconds).fold(0.0_f64, f64::max);
    let last_index = (last_cue_end / length).floor();
    if !(last_index < MAX_SEGMENT_WINDOWS as f64) {
        return Err(TubescriptError::InvalidInput(format!(
            "Cues end at {}s; {}s segments would exceed {} windows",
            last_cue_end, segment_length, MAX_SEGMENT_WINDOWS
        )));
    }
    let window_count = last_index as usize + 1;

    let mut buckets: Vec<Vec<&str>> = vec![Vec::new(); window_count];
    for cue in cues {
        let index = ((cue.start_seconds / length).floor() as usize).min(window_count - 1);
        buckets[index].push(cue.text.as_str());
    }

    let segments = buckets
        .into_iter()
        .enumerate()
        .map(|(i, texts)| {
            let window_start = i as f64 * length;
            Segment {
                window_start,
                window_end: window_start + length,
                cue_count: texts.len(),
                text: join_cue_texts(texts.into_iter()),
            }
        })
        .collect();

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_keep_empty_windows() {
        let cues = vec![
            Cue::new(0.0, 2.0, "Hello"),
            Cue::new(2.0, 3.0, "world"),
            Cue::new(10.0, 1.0, "End"),
        ];

        let segments = segment_cues(&cues, 5).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[0],
            Segment { window_start: 0.0, window_end: 5.0, text: "Hello world".to_string(), cue_count: 2 }
        );
        assert_eq!(
            segments[1],
            Segment { window_start: 5.0, window_end: 10.0, text: String::new(), cue_count: 0 }
        );
        assert_eq!(
            segments[2],
            Segment { window_start: 10.0, window_end: 15.0, text: "End".to_string(), cue_count: 1 }
        );
    }

    #[test]
    fn test_window_count_follows_last_cue_end() {
        // Last end is 61.5, not the last start, so a 30s length yields three windows
        let cues = vec![
            Cue::new(0.0, 1.0, "a"),
            Cue::new(55.0, 6.5, "b"),
            Cue::new(58.0, 1.0, "c"),
        ];

        let segments = segment_cues(&cues, 30).unwrap();

        assert_eq!(segments.len(), (61.5_f64 / 30.0).floor() as usize + 1);
        assert_eq!(segments[2].cue_count, 0);
        assert!(segments
            .windows(2)
            .all(|w| w[0].window_end == w[1].window_start));
        assert_eq!(segments[0].window_start, 0.0);
    }

    #[test]
    fn test_every_cue_counted_once() {
        let cues: Vec<Cue> = (0..50)
            .map(|i| Cue::new(i as f64 * 1.7, 2.0, format!("cue{}", i)))
            .collect();

        let segments = segment_cues(&cues, 7).unwrap();

        let total: usize = segments.iter().map(|s| s.cue_count).sum();
        assert_eq!(total, cues.len());
        for cue in &cues {
            let hits = segments
                .iter()
                .filter(|s| s.text.split(' ').any(|w| w == cue.text))
                .count();
            assert_eq!(hits, 1, "{}", cue.text);
        }
    }

    #[test]
    fn test_overlapping_cues_land_by_start() {
        let cues = vec![Cue::new(4.0, 10.0, "long"), Cue::new(4.5, 0.0, "point")];

        let segments = segment_cues(&cues, 5).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "long point");
        assert_eq!(segments[1].cue_count, 0);
    }

    #[test]
    fn test_far_out_cue_is_rejected_without_allocating() {
        let cues = vec![Cue::new(0.0, 1.0, "a"), Cue::new(1.0e12, 1.0, "x")];

        let err = segment_cues(&cues, 1).unwrap_err();
        assert!(matches!(err, TubescriptError::InvalidInput(_)));

        // The same cues fit once the windows are wide enough
        let segments = segment_cues(&cues, 1_000_000_000).unwrap();
        assert_eq!(segments.len(), 1001);
    }

    #[test]
    fn test_multi_line_cue_text_joined_on_one_line() {
        let cues = vec![Cue::new(0.0, 1.0, "two\nlines"), Cue::new(1.0, 1.0, " "), Cue::new(2.0, 1.0, "end")];

        let segments = segment_cues(&cues, 5).unwrap();

        assert_eq!(segments[0].text, "two lines end");
        assert_eq!(segments[0].cue_count, 3);
    }

    #[test]
    fn test_empty_cues() {
        assert!(segment_cues(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_segment_length() {
        let cues = vec![Cue::new(0.0, 1.0, "a")];
        for length in [0, -1, -30, i64::MIN] {
            let err = segment_cues(&cues, length).unwrap_err();
            assert!(matches!(err, TubescriptError::InvalidSegmentLength(l) if l == length));
        }
    }
}
