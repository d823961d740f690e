//! Game state — snapshots, scores, and player identity

pub mod entities;
pub mod value_objects;
