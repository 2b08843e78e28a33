//! Subcommand implementations.

pub mod config;
pub mod probe;
pub mod process;
pub mod resize;
pub mod serve;
