//! Interactive duel surface

pub mod repl;
pub mod reveal;
