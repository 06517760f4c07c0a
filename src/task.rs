//! Per-job task directories.
//!
//! Every transcription job gets its own directory of intermediate
//! artifacts: the spacer-padded audio, the raw segmentation dump, one clip
//! per speaker turn, and the caption tracks. The directory is removed when
//! the job finishes unless the job runs with `--keep-temp`, in which case
//! it stays around for troubleshooting.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Layout of one job's intermediate artifacts.
#[derive(Debug, Clone)]
pub struct TaskDir {
    /// Task name, `<event>_<unix_millis>`.
    pub name: String,
    root: PathBuf,
}

impl TaskDir {
    /// Create a task directory under `temp_dir` for the given event name.
    ///
    /// Spaces in the event name are normalized to underscores; the current
    /// unix-millisecond timestamp keeps repeated runs apart.
    pub fn create(temp_dir: &Path, event_name: &str) -> Result<Self> {
        let event = if event_name.trim().is_empty() {
            "transcript".to_string()
        } else {
            event_name.trim().replace(' ', "_")
        };

        let name = format!("{}_{}", event, chrono::Utc::now().timestamp_millis());
        let root = temp_dir.join(&name);

        std::fs::create_dir_all(root.join("clips"))?;
        std::fs::create_dir_all(root.join("captions"))?;

        info!("Created task directory at {}", root.display());
        Ok(Self { name, root })
    }

    /// Root of this task's directory tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for the spacer-padded copy of the input audio.
    pub fn padded_audio(&self) -> PathBuf {
        self.root.join("padded.wav")
    }

    /// Path for the raw segmentation dump.
    pub fn segmentation_dump(&self) -> PathBuf {
        self.root.join("diarization.txt")
    }

    /// Path for the whole-file caption track.
    pub fn caption_track(&self) -> PathBuf {
        self.root.join("captions").join("full.vtt")
    }

    /// Path for the audio clip of turn `index`.
    pub fn clip(&self, index: usize) -> PathBuf {
        self.root.join("clips").join(format!("{}.wav", index))
    }

    /// Path for the per-clip caption text of turn `index`.
    pub fn clip_caption(&self, index: usize) -> PathBuf {
        self.root.join("captions").join(format!("{}.txt", index))
    }

    /// Delete the task directory and everything in it.
    pub fn cleanup(&self) {
        if self.root.exists() {
            info!("Deleting task directory at {}", self.root.display());
            if let Err(e) = std::fs::remove_dir_all(&self.root) {
                warn!("Failed to delete task directory: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_builds_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let task = TaskDir::create(tmp.path(), "standup").unwrap();

        assert!(task.root().exists());
        assert!(task.root().join("clips").exists());
        assert!(task.root().join("captions").exists());
        assert!(task.name.starts_with("standup_"));
    }

    #[test]
    fn test_event_name_normalization() {
        let tmp = tempfile::tempdir().unwrap();
        let task = TaskDir::create(tmp.path(), "weekly sync").unwrap();
        assert!(task.name.starts_with("weekly_sync_"));

        let unnamed = TaskDir::create(tmp.path(), "  ").unwrap();
        assert!(unnamed.name.starts_with("transcript_"));
    }

    #[test]
    fn test_artifact_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let task = TaskDir::create(tmp.path(), "x").unwrap();

        assert_eq!(
            task.clip(3).file_name().unwrap().to_str().unwrap(),
            "3.wav"
        );
        assert!(task.segmentation_dump().ends_with("diarization.txt"));
        assert!(task.padded_audio().starts_with(task.root()));
    }

    #[test]
    fn test_cleanup_removes_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let task = TaskDir::create(tmp.path(), "gone").unwrap();
        std::fs::write(task.segmentation_dump(), "dump").unwrap();

        task.cleanup();
        assert!(!task.root().exists());
    }
}
