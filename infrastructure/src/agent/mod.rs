//! HTTP adapter for the remote game agent

pub mod http;
pub mod protocol;
