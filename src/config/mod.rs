//! Configuration module for Hvem.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    DiarizationProvider, DiarizationSettings, GeneralSettings, NotesSettings, Settings,
    TranscriptionSettings,
};
