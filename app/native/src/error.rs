//! Error types for the `sticky` command-line tool.
//!
//! Library components return their own typed errors
//! ([`StickyError`](crate::sticky::StickyError),
//! [`ConfigError`](crate::config::ConfigError),
//! [`ScenarioError`](crate::sim::ScenarioError)). This module folds them into
//! one serializable error for the CLI.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::sim::ScenarioError;
use crate::sticky::StickyError;

/// Errors that can occur while running a CLI command.
///
/// Serializes as `{"kind": "...", "message": "..."}` so `--json` output can
/// report failures in the same document shape.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Scenario script could not be loaded.
    #[error("Scenario error: {0}")]
    ScenarioError(String),
    /// A sticky operation failed.
    #[error("Sticky error: {0}")]
    StickyError(String),
    /// A scenario ran with failing steps under `--strict`.
    #[error("{count} step(s) failed")]
    StepsFailed {
        /// Number of failed steps.
        count: usize,
    },
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<ScenarioError> for AppError {
    fn from(err: ScenarioError) -> Self { Self::ScenarioError(err.to_string()) }
}

impl From<StickyError> for AppError {
    fn from(err: StickyError) -> Self { Self::StickyError(err.to_string()) }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
