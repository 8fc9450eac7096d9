//! Configuration types for Sticky Windows.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sim::layout::{DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH};
use crate::sticky::PinSize;

/// Default sticky size: 30% of the frame.
pub const DEFAULT_STICKY_SIZE: f64 = 0.3;

/// Default simulated frame width in columns.
pub const DEFAULT_FRAME_WIDTH: u32 = 160;

/// Default simulated frame height in lines.
pub const DEFAULT_FRAME_HEIGHT: u32 = 48;

/// Sticky region configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StickyConfig {
    /// Whether the sticky subsystem starts enabled.
    /// Default: true
    pub enabled: bool,

    /// Size used when a sticky region is created without one.
    /// Values below 1 are a fraction of the frame, values of 1 or more are
    /// columns/lines.
    /// Default: 0.3
    pub default_size: f64,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_size: DEFAULT_STICKY_SIZE,
        }
    }
}

/// In-memory layout simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatorConfig {
    /// Frame width in columns.
    /// Default: 160
    pub frame_width: u32,

    /// Frame height in lines.
    /// Default: 48
    pub frame_height: u32,

    /// Minimum region width in columns.
    /// Default: 10
    pub min_width: u32,

    /// Minimum region height in lines.
    /// Default: 4
    pub min_height: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
        }
    }
}

/// Root configuration structure for Sticky Windows.
///
/// Every section is optional; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StickyWindowsConfig {
    /// Sticky region settings.
    pub sticky: StickyConfig,

    /// Layout simulator settings used by `sticky run`.
    pub simulator: SimulatorConfig,
}

impl StickyWindowsConfig {
    /// Checks values serde cannot express as types.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        PinSize::new(self.sticky.default_size).map_err(|err| {
            ConfigError::Invalid(format!("sticky.defaultSize: {err}"))
        })?;

        let sim = &self.simulator;
        if sim.min_width == 0 || sim.min_height == 0 {
            return Err(ConfigError::Invalid(
                "simulator.minWidth and simulator.minHeight must be at least 1".to_string(),
            ));
        }
        if sim.frame_width < sim.min_width || sim.frame_height < sim.min_height {
            return Err(ConfigError::Invalid(format!(
                "simulator frame {}x{} is smaller than the minimum region {}x{}",
                sim.frame_width, sim.frame_height, sim.min_width, sim.min_height
            )));
        }

        Ok(())
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
    /// The configuration file parsed but holds an unusable value.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/sticky-windows/config.jsonc \
                or ~/.sticky-windows.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
            Self::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound | Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Directory name used under the configuration roots.
const APP_DIR_NAME: &str = "sticky-windows";

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Dotfile names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".sticky-windows.jsonc", ".sticky-windows.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/sticky-windows/config.jsonc` when the variable is set
/// 2. `~/.config/sticky-windows/config.jsonc`
/// 3. the platform configuration directory (`dirs::config_dir()`)
/// 4. `~/.sticky-windows.jsonc`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    fn push_dir(dir: &Path, paths: &mut Vec<PathBuf>) {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME might be ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        push_dir(&PathBuf::from(xdg_config).join(APP_DIR_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(&home.join(".config").join(APP_DIR_NAME), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(&config_dir.join(APP_DIR_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads and validates the configuration at `path`.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::IoError` if it cannot be read, `ConfigError::ParseError`
/// for invalid JSON and `ConfigError::Invalid` for out-of-range values.
pub fn load_config_from_path(path: &Path) -> Result<(StickyWindowsConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: StickyWindowsConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations. Otherwise see [`load_config_from_path`].
pub fn load_config() -> Result<(StickyWindowsConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}
