//! Transcription module for Hvem.
//!
//! Handles speech-to-text via OpenAI Whisper and the caption-track
//! artifacts shared between pipeline stages.

mod vtt;
mod whisper;

pub use vtt::{format_vtt, parse_vtt};
pub use whisper::{is_api_key_configured, WhisperTranscriber};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A transcribed caption span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Start offset in milliseconds.
    pub start_ms: u64,
    /// End offset in milliseconds.
    pub end_ms: u64,
    /// Transcribed text.
    pub text: String,
}

impl Caption {
    pub fn new(start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
        }
    }
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into timestamped captions.
    async fn transcribe_captions(&self, audio_path: &Path) -> Result<Vec<Caption>>;

    /// Transcribe an audio file into a flat text string.
    async fn transcribe_plain(&self, audio_path: &Path) -> Result<String>;
}
