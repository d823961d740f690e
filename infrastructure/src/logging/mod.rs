//! Structured transcript logging

pub mod jsonl_transcript;

pub use jsonl_transcript::JsonlTranscriptLogger;
