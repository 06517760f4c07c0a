//! Speaker segmentation for Hvem.
//!
//! The segmentation engine itself is a black box behind the
//! [`SegmentationEngine`] trait: it receives a (spacer-padded) wav file and
//! produces a text dump with one speaker turn per line. Parsing that dump,
//! and compensating for the spacer exactly once, happens here.

mod deepgram;
mod pyannote;

pub use deepgram::{DeepgramClient, Utterance};
pub use pyannote::PyannoteClient;

use crate::error::{HvemError, Result};
use crate::timecode::parse_timecode;
use crate::transcript::correct_timestamp;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// A contiguous span of audio attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    /// Start offset in milliseconds.
    pub start_ms: u64,
    /// End offset in milliseconds.
    pub end_ms: u64,
    /// Speaker label, e.g. `SPEAKER_00`.
    pub speaker: String,
}

impl SpeakerTurn {
    pub fn new(start_ms: u64, end_ms: u64, speaker: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            speaker: speaker.into(),
        }
    }
}

/// Trait for speaker-segmentation services.
#[async_trait]
pub trait SegmentationEngine: Send + Sync {
    /// Segment an audio file into speaker turns.
    ///
    /// Returns the engine's raw text dump, one turn per line. The dump is
    /// persisted as a task artifact before parsing.
    async fn segment(&self, audio_path: &Path) -> Result<String>;
}

fn timecode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+:[0-9]+:[0-9]+\.[0-9]+").expect("valid regex"))
}

fn speaker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"SPEAKER_\w+").expect("valid regex"))
}

/// Parse a segmentation dump into speaker turns.
///
/// Each non-empty line must carry two `HH:MM:SS.ffffff` timestamps and a
/// `SPEAKER_<id>` token, e.g.:
///
/// ```text
/// [ 00:00:02.148 -->  00:00:08.076] A SPEAKER_01
/// ```
///
/// The dump comes from spacer-padded audio, so `spacer_ms` is subtracted
/// from every timestamp here and only here. Callers must not compensate
/// again.
pub fn parse_segment_dump(dump: &str, spacer_ms: u64) -> Result<Vec<SpeakerTurn>> {
    let mut turns = Vec::new();

    for line in dump.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let stamps: Vec<&str> = timecode_regex()
            .find_iter(line)
            .map(|m| m.as_str())
            .collect();
        if stamps.len() < 2 {
            return Err(HvemError::Segmentation(format!(
                "dump line has no timestamp pair: {:?}",
                line
            )));
        }

        let speaker = speaker_regex()
            .find(line)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                HvemError::Segmentation(format!("dump line has no speaker token: {:?}", line))
            })?;

        let start_ms = correct_timestamp(parse_timecode(stamps[0])?, spacer_ms);
        let end_ms = correct_timestamp(parse_timecode(stamps[1])?, spacer_ms);

        turns.push(SpeakerTurn {
            start_ms,
            end_ms,
            speaker,
        });
    }

    Ok(turns)
}
