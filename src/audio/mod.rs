//! Audio file handling.
//!
//! Input validation plus the ffmpeg-backed operations the pipelines need:
//! prepending the silence spacer, cutting per-turn clips, and probing
//! duration. Only uncompressed PCM wav input is supported.

use crate::error::{HvemError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Validate that a path points to a readable PCM wav file.
///
/// Checked before any engine call is made so a bad input fails fast
/// instead of mid-job.
pub fn validate_wav(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(HvemError::InvalidInput(format!(
            "Audio file not found at: {}",
            path.display()
        )));
    }

    if path.extension().and_then(|e| e.to_str()) != Some("wav") {
        return Err(HvemError::InvalidInput(
            "Audio file must be '.wav' format. Other filetypes are not supported.".to_string(),
        ));
    }

    let header = read_header(path, 22)?;
    if header.len() < 12 || &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" {
        return Err(HvemError::InvalidInput(format!(
            "{} is not a RIFF/WAVE file",
            path.display()
        )));
    }

    // When the fmt chunk sits in the usual spot, reject non-PCM encodings.
    if header.len() >= 22 && &header[12..16] == b"fmt " {
        let format_tag = u16::from_le_bytes([header[20], header[21]]);
        if format_tag != 1 {
            return Err(HvemError::InvalidInput(format!(
                "{} is not uncompressed PCM (format tag {})",
                path.display(),
                format_tag
            )));
        }
    }

    Ok(())
}

fn read_header(path: &Path, n: usize) -> Result<Vec<u8>> {
    use std::io::Read;
    let mut buf = vec![0u8; n];
    let mut file = std::fs::File::open(path)?;
    let read = file.read(&mut buf)?;
    buf.truncate(read);
    Ok(buf)
}

/// Prepend `spacer_ms` of silence to an audio file.
///
/// Segmentation engines tend to drop the first fraction of a second of
/// audio; padding the front sidesteps that. The padded copy is written to
/// `output_path`.
#[instrument(skip_all, fields(input = %input.display()))]
pub async fn prepend_spacer(input: &Path, output_path: &Path, spacer_ms: u64) -> Result<PathBuf> {
    info!("Prepending {}ms spacer", spacer_ms);

    let filter = format!("adelay={}:all=1", spacer_ms);

    run_ffmpeg(&[
        "-i",
        &input.to_string_lossy(),
        "-af",
        &filter,
        "-y",
        "-loglevel",
        "error",
        &output_path.to_string_lossy(),
    ])
    .await?;

    Ok(output_path.to_path_buf())
}

/// Extract the `[start_ms, end_ms)` span of an audio file into a clip.
#[instrument(skip_all, fields(input = %input.display(), start_ms, end_ms))]
pub async fn extract_clip(
    input: &Path,
    output_path: &Path,
    start_ms: u64,
    end_ms: u64,
) -> Result<PathBuf> {
    debug!("Extracting clip {}..{}ms", start_ms, end_ms);

    let start = format!("{:.3}", start_ms as f64 / 1000.0);
    let end = format!("{:.3}", end_ms as f64 / 1000.0);

    run_ffmpeg(&[
        "-ss",
        &start,
        "-to",
        &end,
        "-i",
        &input.to_string_lossy(),
        "-y",
        "-loglevel",
        "error",
        &output_path.to_string_lossy(),
    ])
    .await?;

    Ok(output_path.to_path_buf())
}

/// Probe the duration of an audio file in seconds.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(HvemError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => return Err(HvemError::ToolFailed(format!("ffprobe: {e}"))),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HvemError::ToolFailed(format!("ffprobe failed: {stderr}")));
    }

    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse::<f64>()
        .map_err(|e| HvemError::ToolFailed(format!("ffprobe returned invalid duration: {e}")))
}

/// Run ffmpeg with the given arguments, mapping failures to tool errors.
async fn run_ffmpeg(args: &[&str]) -> Result<()> {
    let result = Command::new("ffmpeg")
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(HvemError::ToolFailed(format!("ffmpeg failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(HvemError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(HvemError::ToolFailed(format!("ffmpeg error: {e}"))),
    }
}
