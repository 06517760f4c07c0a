//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            // Try to open in editor
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a dotted-key assignment to the settings.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.data_dir" => settings.general.data_dir = value.to_string(),
        "general.temp_dir" => settings.general.temp_dir = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),
        "diarization.provider" => {
            settings.diarization.provider = value.parse().map_err(|e| anyhow::anyhow!("{}", e))?
        }
        "diarization.spacer_ms" => {
            settings.diarization.spacer_ms = value
                .parse()
                .map_err(|_| anyhow::anyhow!("{} must be an integer (milliseconds)", key))?
        }
        "diarization.segmentation_endpoint" => {
            settings.diarization.segmentation_endpoint = Some(value.to_string())
        }
        "diarization.deepgram_model" => settings.diarization.deepgram_model = value.to_string(),
        "transcription.model" => settings.transcription.model = value.to_string(),
        "transcription.max_concurrent_clips" => {
            settings.transcription.max_concurrent_clips = value
                .parse()
                .map_err(|_| anyhow::anyhow!("{} must be a positive integer", key))?
        }
        "notes.vault_dir" => settings.notes.vault_dir = Some(value.to_string()),
        _ => {
            return Err(anyhow::anyhow!(
                "Unknown configuration key: {}. Run 'hvem config show' for available keys.",
                key
            ))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiarizationProvider;

    #[test]
    fn test_set_provider() {
        let mut settings = Settings::default();
        set_value(&mut settings, "diarization.provider", "pyannote").unwrap();
        assert_eq!(settings.diarization.provider, DiarizationProvider::Pyannote);
    }

    #[test]
    fn test_set_spacer_ms() {
        let mut settings = Settings::default();
        set_value(&mut settings, "diarization.spacer_ms", "1500").unwrap();
        assert_eq!(settings.diarization.spacer_ms, 1500);

        assert!(set_value(&mut settings, "diarization.spacer_ms", "soon").is_err());
    }

    #[test]
    fn test_set_unknown_key() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "general.color", "always").is_err());
    }
}
