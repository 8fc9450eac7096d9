//! Configuration module for Sticky Windows.
//!
//! This module provides configuration types, loading functionality and the
//! JSON Schema of the configuration file.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod template;
pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use types::{
    ConfigError, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_STICKY_SIZE, SimulatorConfig,
    StickyConfig, StickyWindowsConfig, config_paths, load_config as load_config_default,
    load_config_from_path,
};

/// Global configuration instance, loaded once.
static CONFIG: OnceLock<StickyWindowsConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before [`try_init`] or [`get_config`] to take effect.
///
/// Returns `true` if the path was set, `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads the configuration from the custom path or the default search paths.
///
/// A missing file yields the defaults. The path of a loaded file is recorded.
fn load() -> Result<StickyWindowsConfig, ConfigError> {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            let _ = CONFIG_PATH.set(path);
            Ok(config)
        }
        Err(ConfigError::NotFound) => Ok(StickyWindowsConfig::default()),
        Err(err) => Err(err),
    }
}

/// Loads the configuration, falling back to defaults on any failure.
fn load_or_default() -> StickyWindowsConfig {
    load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load configuration, using defaults");
        StickyWindowsConfig::default()
    })
}

/// Initializes the global configuration, reporting load failures.
///
/// A missing configuration file is not an error; defaults are used.
///
/// # Errors
///
/// Returns the load error if a configuration file exists but cannot be
/// read, parsed or validated. The global configuration is left unset.
pub fn try_init() -> Result<&'static StickyWindowsConfig, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = load()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Returns the global configuration instance, initializing it if necessary.
///
/// If no configuration file is found or it fails to load, returns the
/// default configuration.
pub fn get_config() -> &'static StickyWindowsConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

/// Location of the published configuration schema.
const SCHEMA_ID: &str =
    "https://raw.githubusercontent.com/sticky-windows/sticky-windows/main/sticky-windows.schema.json";

/// Generates a JSON Schema for the configuration file.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(StickyWindowsConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
    }

    schema
}

/// Generates the configuration JSON Schema as a pretty-printed string.
#[must_use]
pub fn generate_schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}
