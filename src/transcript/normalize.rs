//! Conversion of raw upstream cues into the canonical cue list.

use super::Cue;
use crate::source::RawCue;

/// Build an ordered cue list from raw upstream cues.
///
/// Missing, negative, or non-finite timings become `0.0`. Cues are sorted by
/// start time with a stable sort, so ties keep upstream order. Nothing is
/// dropped, trimmed, merged, or deduplicated.
pub fn normalize_cues(raw: Vec<RawCue>) -> Vec<Cue> {
    let mut cues: Vec<Cue> = raw
        .into_iter()
        .map(|r| Cue::new(coerce_seconds(r.start), coerce_seconds(r.duration), r.text))
        .collect();

    cues.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
    cues
}

fn coerce_seconds(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}
