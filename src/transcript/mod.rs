//! Transcript assembly for Hvem.
//!
//! This is where the two engine signals meet: speaker turns from the
//! segmentation engine and captions from the speech-to-text engine are
//! merged into one ordered sequence of speaker-attributed lines.
//!
//! # Stages
//!
//! - **Merging** ([`merge_turns`], [`consolidate_utterances`]): collapse
//!   consecutive same-speaker spans into logical turns.
//! - **Alignment** ([`align`]): attribute captions to turns with a single
//!   forward sweep over both sequences.
//! - **Writing** ([`write_transcript`]): serialize the final lines.

mod align;
mod merge;
mod writer;

pub use align::{align, correct_timestamp};
pub use merge::{consolidate_utterances, merge_turns};
pub use writer::{render_lines, write_transcript};

use serde::{Deserialize, Serialize};

/// One speaker-attributed line of the final transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedLine {
    /// Speaker label this line is attributed to.
    pub speaker: String,
    /// Concatenated caption text; may be empty if no caption fell inside
    /// the originating turn's window.
    pub text: String,
}

impl MergedLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}
