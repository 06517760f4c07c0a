//! WebVTT caption tracks.
//!
//! The per-job caption artifact is a VTT file; the aligned pipeline writes
//! one after transcription and reads it back before alignment, so a dumped
//! track from a debug run can be fed straight back into a merge.

use crate::error::{HvemError, Result};
use crate::timecode::{format_timecode, parse_timecode};
use crate::transcription::Caption;

/// Format captions as a WebVTT document.
pub fn format_vtt(captions: &[Caption]) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for (i, caption) in captions.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_timecode(caption.start_ms),
            format_timecode(caption.end_ms)
        ));
        output.push_str(&caption.text);
        output.push_str("\n\n");
    }

    output
}

/// Parse a WebVTT document into captions.
///
/// Accepts the subset this tool writes plus what transcription engines
/// commonly emit: an optional `WEBVTT` header, optional numeric cue
/// identifiers, one `start --> end` line per cue followed by one or more
/// text lines.
pub fn parse_vtt(content: &str) -> Result<Vec<Caption>> {
    let mut captions = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("WEBVTT") || line.starts_with("NOTE") {
            continue;
        }

        // A bare cue identifier precedes the timing line.
        let timing = if line.contains("-->") {
            line
        } else {
            match lines.next() {
                Some(next) if next.contains("-->") => next.trim(),
                _ => continue,
            }
        };

        let (start_str, end_str) = timing
            .split_once("-->")
            .ok_or_else(|| HvemError::TimestampFormat(timing.to_string()))?;

        let start_ms = parse_timecode(start_str.trim())?;
        let end_ms = parse_timecode(end_str.trim())?;

        let mut text = String::new();
        while let Some(&next) = lines.peek() {
            if next.trim().is_empty() {
                break;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(next.trim());
            lines.next();
        }

        captions.push(Caption {
            start_ms,
            end_ms,
            text,
        });
    }

    Ok(captions)
}
