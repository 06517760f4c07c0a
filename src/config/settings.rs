//! Configuration settings for Hvem.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub diarization: DiarizationSettings,
    pub transcription: TranscriptionSettings,
    pub notes: NotesSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing finished transcripts.
    pub data_dir: String,
    /// Directory for per-job task directories.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.hvem".to_string(),
            temp_dir: "/tmp/hvem".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Diarization provider type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DiarizationProvider {
    /// Deepgram: one call transcribes and labels speakers, then each turn
    /// is re-transcribed with Whisper (default).
    #[default]
    Deepgram,
    /// Pyannote-style segmentation server plus independent Whisper pass,
    /// aligned afterwards.
    Pyannote,
}

impl std::str::FromStr for DiarizationProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deepgram" | "d" => Ok(DiarizationProvider::Deepgram),
            "pyannote" | "p" => Ok(DiarizationProvider::Pyannote),
            _ => Err(format!("Unknown diarization provider: {}", s)),
        }
    }
}

impl std::fmt::Display for DiarizationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiarizationProvider::Deepgram => write!(f, "deepgram"),
            DiarizationProvider::Pyannote => write!(f, "pyannote"),
        }
    }
}

/// Speaker-segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiarizationSettings {
    /// Diarization provider (deepgram, pyannote).
    pub provider: DiarizationProvider,
    /// Silence padding prepended before segmentation, in milliseconds.
    pub spacer_ms: u64,
    /// URL of the pyannote-style segmentation endpoint.
    pub segmentation_endpoint: Option<String>,
    /// Deepgram model to use.
    pub deepgram_model: String,
}

impl Default for DiarizationSettings {
    fn default() -> Self {
        Self {
            provider: DiarizationProvider::Deepgram,
            spacer_ms: 2000,
            segmentation_endpoint: None,
            deepgram_model: "meeting".to_string(),
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model to use.
    pub model: String,
    /// Ceiling on concurrent per-clip transcription requests.
    pub max_concurrent_clips: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            max_concurrent_clips: 10,
        }
    }
}

/// Markdown note settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotesSettings {
    /// Obsidian vault directory for generated notes. Notes land next to
    /// the transcript when unset.
    pub vault_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::HvemError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hvem")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Directory finished transcripts are written to by default.
    pub fn transcripts_dir(&self) -> PathBuf {
        self.data_dir().join("transcripts")
    }

    /// Get the expanded vault directory, if configured.
    pub fn vault_dir(&self) -> Option<PathBuf> {
        self.notes.vault_dir.as_deref().map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.diarization.spacer_ms, 2000);
        assert_eq!(settings.diarization.provider, DiarizationProvider::Deepgram);
        assert_eq!(settings.transcription.max_concurrent_clips, 10);
        assert!(settings.notes.vault_dir.is_none());
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(
            "deepgram".parse::<DiarizationProvider>().unwrap(),
            DiarizationProvider::Deepgram
        );
        assert_eq!(
            "p".parse::<DiarizationProvider>().unwrap(),
            DiarizationProvider::Pyannote
        );
        assert!("whisper".parse::<DiarizationProvider>().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = Settings::default();
        settings.diarization.spacer_ms = 1500;
        settings.diarization.segmentation_endpoint =
            Some("http://localhost:8000/diarize".to_string());

        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.diarization.spacer_ms, 1500);
        assert_eq!(
            parsed.diarization.segmentation_endpoint.as_deref(),
            Some("http://localhost:8000/diarize")
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Settings = toml::from_str("[diarization]\nspacer_ms = 500\n").unwrap();
        assert_eq!(parsed.diarization.spacer_ms, 500);
        assert_eq!(parsed.transcription.model, "whisper-1");
    }
}
