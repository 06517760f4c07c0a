//! CLI module for Hvem.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::DiarizationProvider;
use clap::{Parser, Subcommand};

/// Hvem - Speaker-Diarized Audio Transcription
///
/// A CLI tool that merges speaker diarization with speech-to-text into a
/// speaker-attributed transcript. The name "Hvem" comes from the Norwegian
/// word for "who."
#[derive(Parser, Debug)]
#[command(name = "hvem")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Hvem and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Transcribe a wav recording into a speaker-attributed transcript
    Transcribe {
        /// Path to the wav file to transcribe
        input: String,

        /// Output transcript path (defaults to the transcripts directory)
        #[arg(short, long)]
        output: Option<String>,

        /// Diarization provider (deepgram, pyannote)
        #[arg(short, long)]
        provider: Option<DiarizationProvider>,

        /// Skip diarization and produce a plain transcript
        #[arg(long)]
        plain: bool,

        /// Event name used for the task directory and default output name
        #[arg(short, long, default_value = "transcript")]
        event_name: String,

        /// Also write the transcript as a tagged Markdown note
        #[arg(long)]
        markdown: bool,

        /// Title for the Markdown note (defaults to the event name)
        #[arg(long)]
        title: Option<String>,

        /// Comma-separated tags for the Markdown note
        #[arg(long, default_value = "")]
        tags: String,

        /// Keep the task directory of intermediate artifacts
        #[arg(long)]
        keep_temp: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "diarization.provider")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
