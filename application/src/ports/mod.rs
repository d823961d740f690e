//! Ports — interfaces the application layer needs the outside world
//! to implement. Adapters live in the infrastructure and presentation
//! layers.

pub mod agent_channel;
pub mod transcript_logger;
pub mod winner_reveal;
