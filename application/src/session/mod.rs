//! Session coordination — the stateful core of the client

pub mod coordinator;
