//! CLI command implementations.

mod config;
mod doctor;
mod init;
mod transcribe;

pub use config::run_config;
pub use doctor::run_doctor;
pub use init::run_init;
pub use transcribe::run_transcribe;
