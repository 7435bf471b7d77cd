//! Subcommand implementations for the `parley` binary.

pub mod serve;
pub mod status;
