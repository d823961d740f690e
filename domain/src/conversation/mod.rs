//! Per-player conversation history

pub mod entities;
