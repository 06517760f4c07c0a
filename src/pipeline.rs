//! Pipeline orchestrator for Hvem.
//!
//! Coordinates a transcription job end to end: input validation, engine
//! calls, turn merging, caption alignment, and transcript output. Two
//! pipeline variants exist, selected by [`DiarizationProvider`]:
//!
//! - **Pyannote**: spacer-padded audio goes to a segmentation server while
//!   Whisper transcribes the original; the two signals are aligned
//!   afterwards.
//! - **Deepgram**: one call yields speaker-labeled utterances; each merged
//!   turn's audio is clipped out and re-transcribed with Whisper.

use crate::audio::{extract_clip, prepend_spacer, probe_duration, validate_wav};
use crate::config::{DiarizationProvider, Settings};
use crate::diarization::{
    parse_segment_dump, DeepgramClient, PyannoteClient, SegmentationEngine, Utterance,
};
use crate::error::{HvemError, Result};
use crate::task::TaskDir;
use crate::transcript::{
    align, consolidate_utterances, merge_turns, write_transcript, MergedLine,
};
use crate::transcription::{format_vtt, parse_vtt, Transcriber, WhisperTranscriber};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The main orchestrator for one transcription job.
pub struct Pipeline {
    settings: Settings,
    provider: DiarizationProvider,
    transcriber: Arc<dyn Transcriber>,
    segmenter: Option<Arc<dyn SegmentationEngine>>,
    deepgram: Option<DeepgramClient>,
    task: TaskDir,
    keep_temp: bool,
}

impl Pipeline {
    /// Create a pipeline for the provider configured in `settings`.
    ///
    /// API keys are read from the environment here, once, and injected
    /// into the engine clients; nothing downstream touches ambient state.
    pub fn new(settings: Settings, event_name: &str, keep_temp: bool) -> Result<Self> {
        let provider = settings.diarization.provider;
        Self::with_provider(settings, provider, event_name, keep_temp)
    }

    /// Create a pipeline for an explicit provider, overriding the config.
    pub fn with_provider(
        settings: Settings,
        provider: DiarizationProvider,
        event_name: &str,
        keep_temp: bool,
    ) -> Result<Self> {
        let openai_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            HvemError::Config(
                "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
            )
        })?;
        let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperTranscriber::new(
            &settings.transcription.model,
            &openai_key,
        )?);

        let mut segmenter: Option<Arc<dyn SegmentationEngine>> = None;
        let mut deepgram = None;

        match provider {
            DiarizationProvider::Deepgram => {
                let key = std::env::var("DEEPGRAM_API_KEY").map_err(|_| {
                    HvemError::Config(
                        "DEEPGRAM_API_KEY not set. Set it with: export DEEPGRAM_API_KEY='...'"
                            .to_string(),
                    )
                })?;
                deepgram = Some(DeepgramClient::new(
                    &settings.diarization.deepgram_model,
                    &key,
                )?);
            }
            DiarizationProvider::Pyannote => {
                let endpoint = settings
                    .diarization
                    .segmentation_endpoint
                    .clone()
                    .ok_or_else(|| {
                        HvemError::Config(
                            "diarization.segmentation_endpoint is not configured. \
                             Set it with: hvem config edit"
                                .to_string(),
                        )
                    })?;
                let token = std::env::var("PYANNOTE_TOKEN").ok();
                segmenter = Some(Arc::new(PyannoteClient::new(&endpoint, token.as_deref())?));
            }
        }

        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;
        let task = TaskDir::create(&temp_dir, event_name)?;

        Ok(Self {
            settings,
            provider,
            transcriber,
            segmenter,
            deepgram,
            task,
            keep_temp,
        })
    }

    /// Create a pipeline with injected engines (for tests and embedding).
    #[allow(clippy::too_many_arguments)]
    pub fn with_components(
        settings: Settings,
        provider: DiarizationProvider,
        transcriber: Arc<dyn Transcriber>,
        segmenter: Option<Arc<dyn SegmentationEngine>>,
        deepgram: Option<DeepgramClient>,
        task: TaskDir,
        keep_temp: bool,
    ) -> Self {
        Self {
            settings,
            provider,
            transcriber,
            segmenter,
            deepgram,
            task,
            keep_temp,
        }
    }

    /// Name of this job's task directory.
    pub fn task_name(&self) -> &str {
        &self.task.name
    }

    /// Run the full diarized-transcription job.
    ///
    /// Writes one `speaker: text` line per logical turn to `output` (or
    /// the default transcripts directory) and returns the output path.
    #[instrument(skip(self, output), fields(audio = %audio_path.display(), provider = %self.provider))]
    pub async fn run(&self, audio_path: &Path, output: Option<&Path>) -> Result<PathBuf> {
        validate_wav(audio_path)?;

        let duration = probe_duration(audio_path).await?;
        info!("Input duration: {:.1}s", duration);

        let lines = match self.provider {
            DiarizationProvider::Pyannote => self.run_aligned(audio_path).await?,
            DiarizationProvider::Deepgram => self.run_clipped(audio_path).await?,
        };

        let output_path = self.resolve_output(output, "txt");
        write_transcript(&output_path, &lines)?;
        info!(
            "Saved diarized transcript ({} lines) at {}",
            lines.len(),
            output_path.display()
        );

        if !self.keep_temp {
            self.task.cleanup();
        }

        Ok(output_path)
    }

    /// Run a plain (non-diarized) transcription job.
    #[instrument(skip(self, output), fields(audio = %audio_path.display()))]
    pub async fn run_plain(&self, audio_path: &Path, output: Option<&Path>) -> Result<PathBuf> {
        validate_wav(audio_path)?;

        let text = self.transcriber.transcribe_plain(audio_path).await?;

        let output_path = self.resolve_output(output, "txt");
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&output_path, format!("{}\n", text))?;
        info!("Saved transcript at {}", output_path.display());

        if !self.keep_temp {
            self.task.cleanup();
        }

        Ok(output_path)
    }

    /// Pyannote variant: independent segmentation and transcription,
    /// reconciled by the alignment sweep.
    async fn run_aligned(&self, audio_path: &Path) -> Result<Vec<MergedLine>> {
        let segmenter = self
            .segmenter
            .as_ref()
            .ok_or_else(|| HvemError::Config("no segmentation engine configured".to_string()))?;
        let spacer_ms = self.settings.diarization.spacer_ms;

        // The segmentation engine sees padded audio; Whisper sees the
        // original. Only the dump timestamps need spacer correction.
        let padded = prepend_spacer(audio_path, &self.task.padded_audio(), spacer_ms).await?;

        let dump = segmenter.segment(&padded).await?;
        std::fs::write(self.task.segmentation_dump(), &dump)?;

        let turns = parse_segment_dump(&dump, spacer_ms)?;
        let groups = merge_turns(&turns);
        info!(
            "Segmentation produced {} spans, {} logical turns",
            turns.len(),
            groups.len()
        );

        let captions = self.transcriber.transcribe_captions(audio_path).await?;
        std::fs::write(self.task.caption_track(), format_vtt(&captions))?;

        // Read the artifact back so a dumped track from a --keep-temp run
        // goes through the same code path.
        let captions = parse_vtt(&std::fs::read_to_string(self.task.caption_track())?)?;
        info!("Transcription produced {} captions", captions.len());

        Ok(align(&groups, &captions, spacer_ms))
    }

    /// Deepgram variant: speaker-labeled utterances drive per-turn clip
    /// extraction and a bounded Whisper fan-out.
    async fn run_clipped(&self, audio_path: &Path) -> Result<Vec<MergedLine>> {
        let deepgram = self
            .deepgram
            .as_ref()
            .ok_or_else(|| HvemError::Config("no Deepgram client configured".to_string()))?;

        let utterances = deepgram.utterances(audio_path).await?;
        let turns = consolidate_utterances(&utterances);
        info!(
            "Deepgram produced {} utterances, {} logical turns",
            utterances.len(),
            turns.len()
        );

        if turns.is_empty() {
            warn!("No speech detected; writing empty transcript");
            return Ok(Vec::new());
        }

        for (idx, turn) in turns.iter().enumerate() {
            extract_clip(audio_path, &self.task.clip(idx), turn.start_ms, turn.end_ms).await?;
        }

        let texts = self.transcribe_clips(&turns).await?;

        Ok(turns
            .iter()
            .zip(texts)
            .map(|(turn, text)| MergedLine::new(turn.speaker.clone(), text))
            .collect())
    }

    /// Transcribe one clip per turn with a bounded fan-out.
    ///
    /// Results land in a pre-sized slot vector by turn index, so completion
    /// order cannot reorder the transcript. A failed clip degrades to empty
    /// text; the job never aborts on a single turn.
    async fn transcribe_clips(&self, turns: &[Utterance]) -> Result<Vec<String>> {
        let concurrency = self.settings.transcription.max_concurrent_clips.max(1);
        info!(
            "Transcribing {} clips ({} concurrent)",
            turns.len(),
            concurrency
        );

        let pb = ProgressBar::new(turns.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} Whisper   [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("█▓░"),
        );

        let mut texts: Vec<String> = vec![String::new(); turns.len()];

        let mut results = stream::iter(0..turns.len())
            .map(|idx| {
                let clip_path = self.task.clip(idx);
                let transcriber = self.transcriber.clone();
                async move {
                    let result = transcriber.transcribe_plain(&clip_path).await;
                    (idx, clip_path, result)
                }
            })
            .buffer_unordered(concurrency);

        while let Some((idx, clip_path, result)) = results.next().await {
            pb.inc(1);
            match result {
                Ok(text) => {
                    if let Err(e) = std::fs::write(self.task.clip_caption(idx), &text) {
                        warn!("Failed to save caption artifact for turn {}: {}", idx, e);
                    }
                    texts[idx] = text;
                }
                Err(e) => {
                    warn!(
                        "Transcription failed for turn {} ({}): {}; emitting empty text",
                        idx,
                        clip_path.display(),
                        e
                    );
                }
            }
        }

        pb.finish_and_clear();
        Ok(texts)
    }

    fn resolve_output(&self, output: Option<&Path>, extension: &str) -> PathBuf {
        match output {
            Some(path) => path.to_path_buf(),
            None => self
                .settings
                .transcripts_dir()
                .join(format!("{}.{}", self.task.name, extension)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::Caption;
    use async_trait::async_trait;

    /// Canned transcriber used to drive the fan-out without the network.
    struct FixtureTranscriber {
        fail_on: Option<usize>,
    }

    #[async_trait]
    impl Transcriber for FixtureTranscriber {
        async fn transcribe_captions(&self, _audio_path: &Path) -> Result<Vec<Caption>> {
            Ok(vec![Caption::new(0, 1000, "fixture")])
        }

        async fn transcribe_plain(&self, audio_path: &Path) -> Result<String> {
            let stem = audio_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let idx: usize = stem.parse().unwrap_or(0);
            if self.fail_on == Some(idx) {
                return Err(HvemError::Transcription("fixture failure".to_string()));
            }
            Ok(format!("clip {}", idx))
        }
    }

    fn fixture_pipeline(fail_on: Option<usize>) -> (Pipeline, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let task = TaskDir::create(tmp.path(), "test").unwrap();
        let pipeline = Pipeline::with_components(
            Settings::default(),
            DiarizationProvider::Deepgram,
            Arc::new(FixtureTranscriber { fail_on }),
            None,
            None,
            task,
            true,
        );
        (pipeline, tmp)
    }

    fn utterance(idx: u64, speaker: &str) -> Utterance {
        Utterance {
            start_ms: idx * 1000,
            end_ms: (idx + 1) * 1000,
            speaker: speaker.to_string(),
            text: String::new(),
            confidence: 1.0,
        }
    }

    #[tokio::test]
    async fn test_fanout_results_are_index_ordered() {
        let (pipeline, _tmp) = fixture_pipeline(None);
        let turns = vec![
            utterance(0, "Speaker_0"),
            utterance(1, "Speaker_1"),
            utterance(2, "Speaker_0"),
        ];

        let texts = pipeline.transcribe_clips(&turns).await.unwrap();
        assert_eq!(texts, vec!["clip 0", "clip 1", "clip 2"]);
    }

    #[tokio::test]
    async fn test_fanout_failed_clip_degrades_to_empty_text() {
        let (pipeline, _tmp) = fixture_pipeline(Some(1));
        let turns = vec![
            utterance(0, "Speaker_0"),
            utterance(1, "Speaker_1"),
            utterance(2, "Speaker_0"),
        ];

        let texts = pipeline.transcribe_clips(&turns).await.unwrap();
        assert_eq!(texts.len(), turns.len());
        assert_eq!(texts[0], "clip 0");
        assert_eq!(texts[1], "");
        assert_eq!(texts[2], "clip 2");
    }
}
