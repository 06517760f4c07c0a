//! Markdown note generation.
//!
//! Wraps a finished transcript as a tagged note for Obsidian-style
//! knowledge bases: a YAML front-matter block with tags, a title heading,
//! then the transcript body.

use crate::error::Result;
use std::path::Path;

/// Render a transcript as a Markdown note.
///
/// `tags` is a comma-separated list; spaces inside a tag become hyphens so
/// the tags stay valid in front matter.
pub fn render_note(title: &str, tags: &str, transcript: &str) -> String {
    let mut note = String::from("---\ntags:");

    for tag in tags.replace(' ', "-").split(',') {
        let tag = tag.trim_matches('-');
        if !tag.is_empty() {
            note.push_str("\n- ");
            note.push_str(tag);
        }
    }

    note.push_str("\n---\n");
    note.push_str(&format!("# {}\n\n", title));
    note.push_str(transcript);
    note
}

/// Write a transcript as a Markdown note next to `path`.
pub fn write_note(path: &Path, title: &str, tags: &str, transcript: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_note(title, tags, transcript))?;
    Ok(())
}
