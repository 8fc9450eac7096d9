//! CLI module for Sticky Windows.
//!
//! The `sticky` binary replays layout scenarios against the in-memory host
//! and manages the configuration file.

mod commands;
mod output;

pub use commands::{Cli, Commands, ConfigCommands};
