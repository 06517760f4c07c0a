//! Turn merging.
//!
//! Collapses a chronological sequence of speaker-labeled spans into maximal
//! runs of consecutive same-speaker spans. Both engine shapes pass through
//! here: bare speaker turns from a segmentation dump, and speaker-labeled
//! utterances from a self-diarizing transcription engine.

use crate::diarization::{SpeakerTurn, Utterance};

/// Merge consecutive same-speaker turns into logical turns.
///
/// An engulfed span (one whose end precedes the end already recorded for
/// the open group) force-closes the group instead of merging, so a
/// corrupted time range is never produced. Segmentation engines are known
/// to emit these occasionally; it is a handled anomaly, not an error.
pub fn merge_turns(turns: &[SpeakerTurn]) -> Vec<SpeakerTurn> {
    let mut groups: Vec<SpeakerTurn> = Vec::new();
    let mut open: Option<SpeakerTurn> = None;

    for turn in turns {
        match open.take() {
            None => open = Some(turn.clone()),
            Some(mut group) => {
                if turn.end_ms < group.end_ms {
                    // Engulfed or out-of-order span: close the group as-is.
                    groups.push(group);
                    open = Some(turn.clone());
                } else if turn.speaker == group.speaker {
                    group.end_ms = turn.end_ms;
                    open = Some(group);
                } else {
                    groups.push(group);
                    open = Some(turn.clone());
                }
            }
        }
    }

    if let Some(group) = open {
        groups.push(group);
    }

    groups
}

/// Consolidate consecutive same-speaker utterances into one utterance each.
///
/// Text is concatenated in input order with a single space; timing follows
/// the same engulfed-span rule as [`merge_turns`]. Confidence of the merged
/// utterance is the minimum over its members.
pub fn consolidate_utterances(utterances: &[Utterance]) -> Vec<Utterance> {
    let mut groups: Vec<Utterance> = Vec::new();
    let mut open: Option<Utterance> = None;

    for utt in utterances {
        match open.take() {
            None => open = Some(utt.clone()),
            Some(mut group) => {
                if utt.end_ms < group.end_ms {
                    groups.push(group);
                    open = Some(utt.clone());
                } else if utt.speaker == group.speaker {
                    group.end_ms = utt.end_ms;
                    if !utt.text.is_empty() {
                        if !group.text.is_empty() {
                            group.text.push(' ');
                        }
                        group.text.push_str(&utt.text);
                    }
                    group.confidence = group.confidence.min(utt.confidence);
                    open = Some(group);
                } else {
                    groups.push(group);
                    open = Some(utt.clone());
                }
            }
        }
    }

    if let Some(group) = open {
        groups.push(group);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(start: u64, end: u64, speaker: &str) -> SpeakerTurn {
        SpeakerTurn::new(start, end, speaker)
    }

    fn utt(start: u64, end: u64, speaker: &str, text: &str) -> Utterance {
        Utterance {
            start_ms: start,
            end_ms: end,
            speaker: speaker.to_string(),
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_merge_adjacent_same_speaker() {
        let turns = vec![
            turn(0, 5000, "A"),
            turn(5000, 9000, "A"),
            turn(9000, 12_000, "B"),
        ];

        let groups = merge_turns(&turns);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], turn(0, 9000, "A"));
        assert_eq!(groups[1], turn(9000, 12_000, "B"));
    }

    #[test]
    fn test_merge_engulfed_span_forces_close() {
        // Second span ends before the first one did; the group must close
        // rather than merge or corrupt the range.
        let turns = vec![turn(0, 10_000, "A"), turn(3000, 4000, "B")];

        let groups = merge_turns(&turns);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], turn(0, 10_000, "A"));
        assert_eq!(groups[1], turn(3000, 4000, "B"));
    }

    #[test]
    fn test_merge_engulfed_same_speaker_also_closes() {
        let turns = vec![turn(0, 10_000, "A"), turn(3000, 4000, "A")];

        let groups = merge_turns(&turns);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_merge_empty_input() {
        assert!(merge_turns(&[]).is_empty());
    }

    #[test]
    fn test_merge_single_turn() {
        let groups = merge_turns(&[turn(100, 200, "A")]);
        assert_eq!(groups, vec![turn(100, 200, "A")]);
    }

    #[test]
    fn test_merge_alternating_speakers() {
        let turns = vec![
            turn(0, 1000, "A"),
            turn(1000, 2000, "B"),
            turn(2000, 3000, "A"),
        ];
        assert_eq!(merge_turns(&turns).len(), 3);
    }

    #[test]
    fn test_consolidate_joins_text_with_single_space() {
        let utterances = vec![
            utt(0, 2000, "Speaker_0", "hello"),
            utt(2000, 4000, "Speaker_0", "there"),
            utt(4000, 6000, "Speaker_1", "hi"),
        ];

        let groups = consolidate_utterances(&utterances);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "hello there");
        assert_eq!(groups[0].start_ms, 0);
        assert_eq!(groups[0].end_ms, 4000);
        assert_eq!(groups[1].text, "hi");
    }

    #[test]
    fn test_consolidate_preserves_order() {
        let utterances = vec![
            utt(0, 1000, "Speaker_0", "one"),
            utt(1000, 2000, "Speaker_0", "two"),
            utt(2000, 3000, "Speaker_0", "three"),
        ];

        let groups = consolidate_utterances(&utterances);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "one two three");
    }

    #[test]
    fn test_consolidate_takes_minimum_confidence() {
        let mut a = utt(0, 1000, "Speaker_0", "x");
        a.confidence = 0.95;
        let mut b = utt(1000, 2000, "Speaker_0", "y");
        b.confidence = 0.6;

        let groups = consolidate_utterances(&[a, b]);
        assert_eq!(groups.len(), 1);
        assert!((groups[0].confidence - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_consolidate_engulfed_utterance() {
        let utterances = vec![
            utt(0, 10_000, "Speaker_0", "long"),
            utt(3000, 4000, "Speaker_0", "stray"),
        ];

        let groups = consolidate_utterances(&utterances);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "long");
        assert_eq!(groups[1].text, "stray");
    }
}
