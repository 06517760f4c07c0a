//! Transcribe command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{DiarizationProvider, Settings};
use crate::notes::write_note;
use crate::pipeline::Pipeline;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Run the transcribe command.
#[allow(clippy::too_many_arguments)]
pub async fn run_transcribe(
    input: &str,
    output: Option<String>,
    provider: Option<DiarizationProvider>,
    plain: bool,
    event_name: &str,
    markdown: bool,
    title: Option<String>,
    tags: &str,
    keep_temp: bool,
    settings: Settings,
) -> Result<()> {
    let provider = provider.unwrap_or(settings.diarization.provider);

    // Pre-flight checks
    let operation = if plain {
        Operation::TranscribePlain
    } else {
        Operation::Transcribe(provider)
    };
    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hvem doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    // Validate flags
    if (title.is_some() || !tags.is_empty()) && !markdown {
        Output::error("--title and --tags require the --markdown flag");
        return Err(anyhow::anyhow!("--title/--tags require --markdown"));
    }

    Output::info(&format!("Processing: {}", input));

    let vault_dir = settings.vault_dir();
    let pipeline = Pipeline::with_provider(settings, provider, event_name, keep_temp)?;
    let task_name = pipeline.task_name().to_string();

    let input_path = Path::new(input);
    let output_path = output.map(PathBuf::from);

    let transcript_path = if plain {
        pipeline.run_plain(input_path, output_path.as_deref()).await
    } else {
        pipeline.run(input_path, output_path.as_deref()).await
    };

    let transcript_path = match transcript_path {
        Ok(path) => path,
        Err(e) => {
            Output::error(&format!("Failed to transcribe: {}", e));
            return Err(e.into());
        }
    };

    Output::success(&format!(
        "Transcript saved to {}",
        transcript_path.display()
    ));

    if markdown {
        let note_title = title.unwrap_or_else(|| event_name.to_string());
        let note_path = note_path(&transcript_path, &task_name, vault_dir.as_deref());
        let transcript = std::fs::read_to_string(&transcript_path)?;

        write_note(&note_path, &note_title, tags, &transcript)?;
        Output::success(&format!("Markdown note saved to {}", note_path.display()));
    }

    if keep_temp {
        Output::info(&format!("Keeping intermediate artifacts for {}", task_name));
    }

    Ok(())
}

/// Where the Markdown note for a transcript goes.
///
/// Notes land in the configured vault when there is one, otherwise next to
/// the transcript itself.
fn note_path(transcript_path: &Path, task_name: &str, vault_dir: Option<&Path>) -> PathBuf {
    let file_name = transcript_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(task_name)
        .to_string();

    match vault_dir {
        Some(vault) => vault.join(format!("{}.md", file_name)),
        None => transcript_path.with_file_name(format!("{}.md", file_name)),
    }
}
