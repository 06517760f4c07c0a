//! OpenAI Whisper transcription implementation.

use super::{Caption, Transcriber};
use crate::error::{HvemError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default timeout for transcription API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: Client<OpenAIConfig>,
    model: String,
}

impl WhisperTranscriber {
    /// Create a Whisper transcriber for the given model and API key.
    ///
    /// The key is passed in explicitly so tests and callers control where
    /// credentials come from.
    pub fn new(model: &str, api_key: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(HvemError::Http)?;

        let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key))
            .with_http_client(http_client);

        Ok(Self {
            client,
            model: model.to_string(),
        })
    }

    async fn request(&self, audio_path: &Path) -> Result<async_openai::types::CreateTranscriptionResponseVerboseJson> {
        let file_bytes = tokio::fs::read(audio_path).await?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.wav")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::VerboseJson)
            .build()
            .map_err(|e| HvemError::Transcription(format!("Failed to build request: {}", e)))?;

        self.client
            .audio()
            .transcribe_verbose_json(request)
            .await
            .map_err(|e| HvemError::OpenAI(format!("Whisper API error: {}", e)))
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    /// Transcribe an audio file into timestamped captions.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_captions(&self, audio_path: &Path) -> Result<Vec<Caption>> {
        debug!("Transcribing audio file to captions");

        let response = self.request(audio_path).await?;

        let captions: Vec<Caption> = response
            .segments
            .map(|segs| {
                segs.iter()
                    .map(|s| {
                        Caption::new(
                            (s.start as f64 * 1000.0).round() as u64,
                            (s.end as f64 * 1000.0).round() as u64,
                            s.text.trim().to_string(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_else(|| {
                // Fallback: one caption spanning the whole file.
                vec![Caption::new(
                    0,
                    (response.duration as f64 * 1000.0).round() as u64,
                    response.text.trim().to_string(),
                )]
            });

        debug!("Transcribed {} captions", captions.len());
        Ok(captions)
    }

    /// Transcribe an audio file into a flat text string.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_plain(&self, audio_path: &Path) -> Result<String> {
        debug!("Transcribing audio file to plain text");

        let response = self.request(audio_path).await?;
        Ok(response.text.trim().to_string())
    }
}

/// Check if the OpenAI API key is configured.
pub fn is_api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_check() {
        // This just tests that the function works
        let _ = is_api_key_configured();
    }

    #[test]
    fn test_transcriber_construction() {
        let t = WhisperTranscriber::new("whisper-1", "sk-test").unwrap();
        assert_eq!(t.model, "whisper-1");
    }
}
