//! Hvem - Speaker-Diarized Audio Transcription
//!
//! A CLI tool that turns a recorded conversation into a speaker-attributed
//! transcript by merging a speaker-segmentation signal with a speech-to-text
//! signal.
//!
//! The name "Hvem" comes from the Norwegian word for "who."
//!
//! # Overview
//!
//! Hvem allows you to:
//! - Diarize a wav recording into speaker turns
//! - Transcribe the audio and attribute every caption to its speaker
//! - Write the result as a `speaker: text` document
//! - Optionally wrap the transcript as a tagged Markdown note for Obsidian
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `audio` - Wav validation, spacer padding, and clip extraction
//! - `timecode` - Timestamp string parsing and formatting
//! - `diarization` - Speaker-segmentation engines and dump parsing
//! - `transcription` - Speech-to-text engines and caption tracks
//! - `transcript` - Turn merging, caption alignment, and output writing
//! - `task` - Per-job intermediate artifact directories
//! - `notes` - Markdown note generation
//! - `pipeline` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use hvem::config::{DiarizationProvider, Settings};
//! use hvem::pipeline::Pipeline;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline =
//!         Pipeline::with_provider(settings, DiarizationProvider::Deepgram, "meeting", false)?;
//!
//!     let output = pipeline.run(Path::new("meeting.wav"), None).await?;
//!     println!("Transcript written to {}", output.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod diarization;
pub mod error;
pub mod notes;
pub mod pipeline;
pub mod task;
pub mod timecode;
pub mod transcript;
pub mod transcription;

pub use error::{HvemError, Result};
