//! HTTP client for a pyannote-style segmentation server.
//!
//! The server receives a wav file and answers with the pipeline's plain
//! text dump, one speaker turn per line. See
//! [`parse_segment_dump`](crate::diarization::parse_segment_dump) for the
//! line format.

use super::SegmentationEngine;
use crate::error::{HvemError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default timeout for segmentation requests (20 minutes; diarizing a long
/// recording dominates the job's wall time).
const DEFAULT_TIMEOUT_SECS: u64 = 1200;

/// Client for a remote speaker-segmentation endpoint.
pub struct PyannoteClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl PyannoteClient {
    /// Create a client for the given endpoint URL.
    ///
    /// `token` is sent as a bearer token when present (hosted pyannote
    /// deployments require one; a local server typically does not).
    pub fn new(endpoint: &str, token: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(HvemError::Http)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.map(|t| t.to_string()),
        })
    }
}

#[async_trait]
impl SegmentationEngine for PyannoteClient {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn segment(&self, audio_path: &Path) -> Result<String> {
        let audio = tokio::fs::read(audio_path).await?;
        info!(
            "Submitting audio for segmentation ({} bytes) to {}",
            audio.len(),
            self.endpoint
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "audio/wav")
            .body(audio);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HvemError::Segmentation(format!("{}: {}", status, body)));
        }

        let dump = response.text().await?;
        debug!("Received segmentation dump ({} lines)", dump.lines().count());
        Ok(dump)
    }
}
