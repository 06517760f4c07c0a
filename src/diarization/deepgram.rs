//! Deepgram prerecorded transcription with speaker diarization.
//!
//! Deepgram labels speakers itself, so its output skips the separate
//! alignment pass: each utterance already carries a speaker id along with
//! its timestamps and text.

use crate::error::{HvemError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

const DEEPGRAM_URL: &str = "https://api.deepgram.com/v1/listen";

/// Default timeout for Deepgram API requests (10 minutes; whole-file
/// transcription of a long recording is slow).
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// A speaker-labeled transcription span from a self-diarizing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Start offset in milliseconds.
    pub start_ms: u64,
    /// End offset in milliseconds.
    pub end_ms: u64,
    /// Speaker label, e.g. `Speaker_0`.
    pub speaker: String,
    /// Transcribed text.
    pub text: String,
    /// Engine confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Deepgram prerecorded API response (the parts this tool consumes).
#[derive(Debug, Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(Debug, Deserialize)]
struct DeepgramResults {
    utterances: Option<Vec<DeepgramUtterance>>,
}

#[derive(Debug, Deserialize)]
struct DeepgramUtterance {
    start: f64,
    end: f64,
    speaker: u32,
    transcript: String,
    confidence: f32,
}

impl From<DeepgramUtterance> for Utterance {
    fn from(u: DeepgramUtterance) -> Self {
        Utterance {
            start_ms: (u.start * 1000.0).round() as u64,
            end_ms: (u.end * 1000.0).round() as u64,
            speaker: format!("Speaker_{}", u.speaker),
            text: u.transcript,
            confidence: u.confidence,
        }
    }
}

/// Client for Deepgram's prerecorded transcription API.
pub struct DeepgramClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl DeepgramClient {
    /// Create a client for the given model and API key.
    pub fn new(model: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(HvemError::Http)?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Transcribe and diarize an audio file in one call.
    ///
    /// Returns utterances in chronological order, speaker labels rendered
    /// as `Speaker_<n>`.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    pub async fn utterances(&self, audio_path: &Path) -> Result<Vec<Utterance>> {
        let audio = tokio::fs::read(audio_path).await?;
        info!("Requesting diarized transcription ({} bytes)", audio.len());

        let response = self
            .client
            .post(DEEPGRAM_URL)
            .query(&[
                ("diarize", "true"),
                ("utterances", "true"),
                ("punctuate", "true"),
                ("model", self.model.as_str()),
            ])
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", "audio/wav")
            .body(audio)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HvemError::Deepgram(format!("{}: {}", status, body)));
        }

        let parsed: DeepgramResponse = response.json().await?;

        let utterances: Vec<Utterance> = parsed
            .results
            .utterances
            .unwrap_or_default()
            .into_iter()
            .map(Utterance::from)
            .collect();

        debug!("Received {} utterances", utterances.len());
        Ok(utterances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "results": {
            "utterances": [
                {
                    "start": 0.5,
                    "end": 4.2,
                    "speaker": 0,
                    "transcript": "Hello everyone.",
                    "confidence": 0.97
                },
                {
                    "start": 4.6,
                    "end": 7.0,
                    "speaker": 1,
                    "transcript": "Hi there.",
                    "confidence": 0.91
                }
            ]
        }
    }"#;

    #[test]
    fn test_response_deserialization() {
        let parsed: DeepgramResponse = serde_json::from_str(FIXTURE).unwrap();
        let utterances = parsed.results.utterances.unwrap();
        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[0].speaker, 0);
        assert_eq!(utterances[1].transcript, "Hi there.");
    }

    #[test]
    fn test_utterance_conversion_rounds_to_ms() {
        let parsed: DeepgramResponse = serde_json::from_str(FIXTURE).unwrap();
        let utterance: Utterance = parsed.results.utterances.unwrap().remove(0).into();
        assert_eq!(utterance.start_ms, 500);
        assert_eq!(utterance.end_ms, 4200);
        assert_eq!(utterance.speaker, "Speaker_0");
    }

    #[test]
    fn test_missing_utterances_field() {
        let parsed: DeepgramResponse = serde_json::from_str(r#"{"results": {}}"#).unwrap();
        assert!(parsed.results.utterances.is_none());
    }
}
