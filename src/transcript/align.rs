//! Caption-to-turn alignment.
//!
//! When segmentation and transcription come from independent engines their
//! boundaries never agree exactly. The alignment sweep attributes every
//! caption to the speaker turn whose window its start time falls in, in one
//! forward pass over both sequences.

use crate::diarization::SpeakerTurn;
use crate::transcript::MergedLine;
use crate::transcription::Caption;
use tracing::debug;

/// Remove the systematic timestamp skew introduced by a prepended spacer.
///
/// Timestamps from an engine that saw spacer-padded audio are late by the
/// spacer duration. The correction clamps at zero and must be applied
/// exactly once per padded source.
pub fn correct_timestamp(raw_ms: u64, spacer_ms: u64) -> u64 {
    raw_ms.saturating_sub(spacer_ms)
}

/// Attribute captions to speaker turns.
///
/// Both inputs must be ascending by start time. For each turn, captions
/// whose start falls inside `[turn.start - spacer_ms, next_turn.start)` are
/// concatenated into one line; the final turn's window is open-ended. The
/// `spacer_ms` allowance at the window front absorbs clock disagreement
/// between the two engines at turn boundaries.
///
/// Every turn emits exactly one line, empty text included; a speaker turn
/// with no caption is still part of the record. A caption starting exactly
/// at a turn boundary belongs to the later turn. The caption cursor only
/// moves forward: captions are never reordered across turn boundaries and
/// the sweep is O(turns + captions).
pub fn align(turns: &[SpeakerTurn], captions: &[Caption], spacer_ms: u64) -> Vec<MergedLine> {
    let mut lines = Vec::with_capacity(turns.len());
    let mut cursor = 0usize;

    for (i, turn) in turns.iter().enumerate() {
        let window_open = turn.start_ms.saturating_sub(spacer_ms);

        // Skip captions that start before this turn's window.
        while cursor < captions.len() && captions[cursor].start_ms < window_open {
            debug!(
                caption_start = captions[cursor].start_ms,
                turn = i,
                "caption precedes turn window, skipping"
            );
            cursor += 1;
        }

        let mut text = String::new();
        while cursor < captions.len()
            && (i + 1 == turns.len() || captions[cursor].start_ms < turns[i + 1].start_ms)
        {
            let caption_text = captions[cursor].text.trim();
            if !caption_text.is_empty() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(caption_text);
            }
            cursor += 1;
        }

        lines.push(MergedLine {
            speaker: turn.speaker.clone(),
            text,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(start: u64, end: u64, speaker: &str) -> SpeakerTurn {
        SpeakerTurn::new(start, end, speaker)
    }

    fn caption(start: u64, text: &str) -> Caption {
        Caption {
            start_ms: start,
            end_ms: start + 1000,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_correct_timestamp_subtracts() {
        assert_eq!(correct_timestamp(5000, 2000), 3000);
    }

    #[test]
    fn test_correct_timestamp_clamps_at_zero() {
        assert_eq!(correct_timestamp(500, 2000), 0);
    }

    #[test]
    fn test_zero_spacer_is_noop() {
        let once = correct_timestamp(5000, 2000);
        assert_eq!(correct_timestamp(once, 0), once);
    }

    #[test]
    fn test_double_correction_differs_from_single() {
        let once = correct_timestamp(5000, 2000);
        let twice = correct_timestamp(once, 2000);
        assert_ne!(once, twice);
    }

    #[test]
    fn test_align_basic() {
        let turns = vec![turn(0, 5000, "A"), turn(5000, 10_000, "B")];
        let captions = vec![
            caption(500, "hello"),
            caption(4000, "world"),
            caption(6000, "goodbye"),
        ];

        let lines = align(&turns, &captions, 0);
        assert_eq!(
            lines,
            vec![
                MergedLine::new("A", "hello world"),
                MergedLine::new("B", "goodbye"),
            ]
        );
    }

    #[test]
    fn test_align_emits_line_for_empty_turn() {
        let turns = vec![
            turn(0, 5000, "A"),
            turn(5000, 10_000, "B"),
            turn(10_000, 15_000, "A"),
        ];
        let captions = vec![caption(1000, "only here"), caption(12_000, "and here")];

        let lines = align(&turns, &captions, 0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], MergedLine::new("B", ""));
    }

    #[test]
    fn test_align_line_count_equals_turn_count() {
        let turns = vec![
            turn(0, 2000, "A"),
            turn(2000, 4000, "B"),
            turn(4000, 6000, "C"),
            turn(6000, 8000, "A"),
        ];
        let captions = vec![caption(100, "x"), caption(6500, "y")];

        assert_eq!(align(&turns, &captions, 0).len(), turns.len());
        assert_eq!(align(&turns, &[], 0).len(), turns.len());
    }

    #[test]
    fn test_align_boundary_tie_goes_to_later_turn() {
        let turns = vec![turn(0, 5000, "A"), turn(5000, 10_000, "B")];
        let captions = vec![caption(5000, "boundary")];

        let lines = align(&turns, &captions, 0);
        assert_eq!(lines[0].text, "");
        assert_eq!(lines[1].text, "boundary");
    }

    #[test]
    fn test_align_spacer_widens_window_front() {
        // Caption timestamped slightly before the turn start, within the
        // spacer allowance, still lands in the turn.
        let turns = vec![turn(3000, 8000, "A")];
        let captions = vec![caption(1500, "early")];

        let lines = align(&turns, &captions, 2000);
        assert_eq!(lines[0].text, "early");
    }

    #[test]
    fn test_align_skips_caption_before_any_window() {
        let turns = vec![turn(5000, 10_000, "A")];
        let captions = vec![caption(100, "lost"), caption(6000, "kept")];

        let lines = align(&turns, &captions, 0);
        assert_eq!(lines[0].text, "kept");
    }

    #[test]
    fn test_align_last_turn_window_is_open_ended() {
        let turns = vec![turn(0, 5000, "A")];
        let captions = vec![caption(1000, "a"), caption(60_000, "way past end")];

        let lines = align(&turns, &captions, 0);
        assert_eq!(lines[0].text, "a way past end");
    }

    #[test]
    fn test_align_preserves_turn_order() {
        let turns = vec![
            turn(0, 1000, "A"),
            turn(1000, 2000, "B"),
            turn(2000, 3000, "C"),
        ];
        let captions = vec![caption(100, "1"), caption(1100, "2"), caption(2100, "3")];

        let lines = align(&turns, &captions, 0);
        let speakers: Vec<&str> = lines.iter().map(|l| l.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["A", "B", "C"]);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_align_empty_turns_yields_no_lines() {
        let captions = vec![caption(0, "orphan")];
        assert!(align(&[], &captions, 0).is_empty());
    }
}
