//! Configuration loading

pub mod file_config;
pub mod loader;

pub use file_config::{AgentConfig, FileConfig, TranscriptConfig};
pub use loader::ConfigLoader;
