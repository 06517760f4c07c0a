//! Transcript serialization.

use crate::error::Result;
use crate::transcript::MergedLine;
use std::path::Path;

/// Render merged lines as a flat `speaker: text` document.
///
/// One newline-terminated line per entry, input order, no filtering. An
/// empty-text turn still produces its line so turn counts always match.
pub fn render_lines(lines: &[MergedLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.speaker);
        out.push_str(": ");
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Write merged lines to a UTF-8 text file.
pub fn write_transcript(path: &Path, lines: &[MergedLine]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_lines(lines))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_format() {
        let lines = vec![
            MergedLine::new("SPEAKER_00", "hello there"),
            MergedLine::new("SPEAKER_01", "hi"),
        ];

        assert_eq!(
            render_lines(&lines),
            "SPEAKER_00: hello there\nSPEAKER_01: hi\n"
        );
    }

    #[test]
    fn test_render_keeps_empty_text_line() {
        let lines = vec![
            MergedLine::new("SPEAKER_00", "something"),
            MergedLine::new("SPEAKER_01", ""),
        ];

        let rendered = render_lines(&lines);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("SPEAKER_01: \n"));
    }

    #[test]
    fn test_render_preserves_order() {
        let lines = vec![
            MergedLine::new("B", "second speaker first"),
            MergedLine::new("A", "then this"),
        ];

        let rendered = render_lines(&lines);
        let first = rendered.lines().next().unwrap();
        assert!(first.starts_with("B:"));
    }

    #[test]
    fn test_write_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("transcript.txt");

        let lines = vec![MergedLine::new("SPEAKER_00", "written to disk")];
        write_transcript(&path, &lines).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "SPEAKER_00: written to disk\n");
    }
}
